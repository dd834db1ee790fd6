use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    Menu, MenuGroup, MenuProduct, Order, OrderLineItem, OrderStatus, OrderTable, Product,
    RepositoryError, RepositoryResult, TableGroup,
};

use super::{
    MenuGroupRepository, MenuRepository, OrderRepository, OrderTableRepository,
    ProductRepository, TableGroupRepository,
};

fn row_to_order(row: &PgRow) -> RepositoryResult<Order> {
    let status: String = row.try_get("order_status")?;
    Ok(Order {
        id: row.try_get("id")?,
        order_table_id: row.try_get("order_table_id")?,
        order_status: status
            .parse::<OrderStatus>()
            .map_err(|message| RepositoryError::Database { message })?,
        ordered_at: row.try_get("ordered_at")?,
        order_line_items: Vec::new(),
    })
}

fn row_to_line_item(row: &PgRow) -> RepositoryResult<OrderLineItem> {
    Ok(OrderLineItem {
        seq: row.try_get("seq")?,
        order_id: row.try_get("order_id")?,
        menu_id: row.try_get("menu_id")?,
        quantity: row.try_get("quantity")?,
    })
}

fn row_to_table(row: &PgRow) -> RepositoryResult<OrderTable> {
    Ok(OrderTable {
        id: row.try_get("id")?,
        table_group_id: row.try_get("table_group_id")?,
        number_of_guests: row.try_get("number_of_guests")?,
        empty: row.try_get("empty")?,
    })
}

fn row_to_menu(row: &PgRow) -> RepositoryResult<Menu> {
    Ok(Menu {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        menu_group_id: row.try_get("menu_group_id")?,
        menu_products: Vec::new(),
    })
}

fn row_to_menu_product(row: &PgRow) -> RepositoryResult<MenuProduct> {
    Ok(MenuProduct {
        seq: row.try_get("seq")?,
        menu_id: row.try_get("menu_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
    })
}

fn status_names(statuses: &[OrderStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

/// Postgres-backed order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(
        &self,
        order: Order,
        line_items: Vec<OrderLineItem>,
    ) -> RepositoryResult<Order> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, order_table_id, order_status, ordered_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(order.order_table_id)
        .bind(order.order_status.to_string())
        .bind(order.ordered_at)
        .execute(&mut *tx)
        .await?;

        for item in &line_items {
            sqlx::query(
                "INSERT INTO order_line_items (seq, order_id, menu_id, quantity) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(item.seq)
            .bind(item.order_id)
            .bind(item.menu_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut created = order;
        created.order_line_items = line_items;
        Ok(created)
    }

    async fn save(&self, order: Order) -> RepositoryResult<Order> {
        sqlx::query(
            "UPDATE orders SET order_table_id = $2, order_status = $3, ordered_at = $4 \
             WHERE id = $1",
        )
        .bind(order.id)
        .bind(order.order_table_id)
        .bind(order.order_status.to_string())
        .bind(order.ordered_at)
        .execute(&self.pool)
        .await?;
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, order_table_id, order_status, ordered_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_order).transpose()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT id, order_table_id, order_status, ordered_at FROM orders \
             ORDER BY ordered_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    async fn find_line_items(&self, order_id: Uuid) -> RepositoryResult<Vec<OrderLineItem>> {
        let rows = sqlx::query(
            "SELECT seq, order_id, menu_id, quantity FROM order_line_items \
             WHERE order_id = $1 ORDER BY seq",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_line_item).collect()
    }

    async fn exists_by_table_and_status_in(
        &self,
        order_table_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders \
             WHERE order_table_id = $1 AND order_status = ANY($2))",
        )
        .bind(order_table_id)
        .bind(status_names(statuses))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_by_tables_and_status_in(
        &self,
        order_table_ids: &[Uuid],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM orders \
             WHERE order_table_id = ANY($1) AND order_status = ANY($2))",
        )
        .bind(order_table_ids.to_vec())
        .bind(status_names(statuses))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

/// Postgres-backed order-table repository.
#[derive(Clone)]
pub struct PostgresOrderTableRepository {
    pool: PgPool,
}

impl PostgresOrderTableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderTableRepository for PostgresOrderTableRepository {
    async fn save(&self, table: OrderTable) -> RepositoryResult<OrderTable> {
        sqlx::query(
            "INSERT INTO order_tables (id, table_group_id, number_of_guests, empty) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE \
             SET table_group_id = $2, number_of_guests = $3, empty = $4",
        )
        .bind(table.id)
        .bind(table.table_group_id)
        .bind(table.number_of_guests)
        .bind(table.empty)
        .execute(&self.pool)
        .await?;
        Ok(table)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OrderTable>> {
        let row = sqlx::query(
            "SELECT id, table_group_id, number_of_guests, empty FROM order_tables \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_table).transpose()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<OrderTable>> {
        let rows = sqlx::query(
            "SELECT id, table_group_id, number_of_guests, empty FROM order_tables",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_table).collect()
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OrderTable>> {
        let rows = sqlx::query(
            "SELECT id, table_group_id, number_of_guests, empty FROM order_tables \
             WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_table).collect()
    }

    async fn find_all_by_table_group(
        &self,
        table_group_id: Uuid,
    ) -> RepositoryResult<Vec<OrderTable>> {
        let rows = sqlx::query(
            "SELECT id, table_group_id, number_of_guests, empty FROM order_tables \
             WHERE table_group_id = $1",
        )
        .bind(table_group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_table).collect()
    }
}

/// Postgres-backed table-group repository.
#[derive(Clone)]
pub struct PostgresTableGroupRepository {
    pool: PgPool,
}

impl PostgresTableGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableGroupRepository for PostgresTableGroupRepository {
    async fn create(
        &self,
        group: TableGroup,
        member_ids: &[Uuid],
    ) -> RepositoryResult<Vec<OrderTable>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO table_groups (id, created_date) VALUES ($1, $2)")
            .bind(group.id)
            .bind(group.created_date)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query(
            "UPDATE order_tables SET table_group_id = $1, empty = FALSE \
             WHERE id = ANY($2) \
             RETURNING id, table_group_id, number_of_guests, empty",
        )
        .bind(group.id)
        .bind(member_ids.to_vec())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        rows.iter().map(row_to_table).collect()
    }

    async fn ungroup(&self, table_group_id: Uuid) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE order_tables SET table_group_id = NULL WHERE table_group_id = $1",
        )
        .bind(table_group_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM table_groups WHERE id = $1")
            .bind(table_group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TableGroup>> {
        let row = sqlx::query("SELECT id, created_date FROM table_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(TableGroup {
                id: row.try_get("id")?,
                created_date: row.try_get("created_date")?,
            }),
            None => None,
        })
    }
}

/// Postgres-backed menu repository.
#[derive(Clone)]
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn menu_products_for(&self, menu_id: Uuid) -> RepositoryResult<Vec<MenuProduct>> {
        let rows = sqlx::query(
            "SELECT seq, menu_id, product_id, quantity FROM menu_products \
             WHERE menu_id = $1 ORDER BY seq",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_menu_product).collect()
    }
}

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    async fn save(&self, menu: Menu) -> RepositoryResult<Menu> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO menus (id, name, price, menu_group_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(menu.id)
        .bind(&menu.name)
        .bind(menu.price)
        .bind(menu.menu_group_id)
        .execute(&mut *tx)
        .await?;

        for mp in &menu.menu_products {
            sqlx::query(
                "INSERT INTO menu_products (seq, menu_id, product_id, quantity) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(mp.seq)
            .bind(mp.menu_id)
            .bind(mp.product_id)
            .bind(mp.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(menu)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>> {
        let row = sqlx::query(
            "SELECT id, name, price, menu_group_id FROM menus WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut menu = row_to_menu(&row)?;
                menu.menu_products = self.menu_products_for(menu.id).await?;
                Ok(Some(menu))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Menu>> {
        let rows = sqlx::query("SELECT id, name, price, menu_group_id FROM menus")
            .fetch_all(&self.pool)
            .await?;

        let mut menus = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut menu = row_to_menu(row)?;
            menu.menu_products = self.menu_products_for(menu.id).await?;
            menus.push(menu);
        }
        Ok(menus)
    }

    async fn count_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Postgres-backed product repository.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        sqlx::query("INSERT INTO products (id, name, price) VALUES ($1, $2, $3)")
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(Product {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                price: row.try_get("price")?,
            }),
            None => None,
        })
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, price FROM products")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(Product {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    price: row.try_get("price")?,
                })
            })
            .collect()
    }
}

/// Postgres-backed menu-group repository.
#[derive(Clone)]
pub struct PostgresMenuGroupRepository {
    pool: PgPool,
}

impl PostgresMenuGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuGroupRepository for PostgresMenuGroupRepository {
    async fn save(&self, group: MenuGroup) -> RepositoryResult<MenuGroup> {
        sqlx::query("INSERT INTO menu_groups (id, name) VALUES ($1, $2)")
            .bind(group.id)
            .bind(&group.name)
            .execute(&self.pool)
            .await?;
        Ok(group)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<MenuGroup>> {
        let row = sqlx::query("SELECT id, name FROM menu_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(MenuGroup {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            }),
            None => None,
        })
    }

    async fn find_all(&self) -> RepositoryResult<Vec<MenuGroup>> {
        let rows = sqlx::query("SELECT id, name FROM menu_groups")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(MenuGroup {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu_groups WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
