use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Menu, MenuGroup, Order, OrderLineItem, OrderStatus, OrderTable, Product, RepositoryResult,
    TableGroup,
};

use super::{
    MenuGroupRepository, MenuRepository, OrderRepository, OrderTableRepository,
    ProductRepository, TableGroupRepository,
};

/// Shared in-memory tables backing the in-memory repositories.
///
/// Every repository holds a clone of this handle, so all of them see the same
/// rows, the way the Postgres repositories share one pool. Composite writes
/// take the write locks they need for the whole operation, which gives the
/// same no-partial-write contract as a database transaction.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    order_line_items: Arc<RwLock<Vec<OrderLineItem>>>,
    order_tables: Arc<RwLock<HashMap<Uuid, OrderTable>>>,
    table_groups: Arc<RwLock<HashMap<Uuid, TableGroup>>>,
    menus: Arc<RwLock<HashMap<Uuid, Menu>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    menu_groups: Arc<RwLock<HashMap<Uuid, MenuGroup>>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_repository(&self) -> InMemoryOrderRepository {
        InMemoryOrderRepository { db: self.clone() }
    }

    pub fn order_table_repository(&self) -> InMemoryOrderTableRepository {
        InMemoryOrderTableRepository { db: self.clone() }
    }

    pub fn table_group_repository(&self) -> InMemoryTableGroupRepository {
        InMemoryTableGroupRepository { db: self.clone() }
    }

    pub fn menu_repository(&self) -> InMemoryMenuRepository {
        InMemoryMenuRepository { db: self.clone() }
    }

    pub fn product_repository(&self) -> InMemoryProductRepository {
        InMemoryProductRepository { db: self.clone() }
    }

    pub fn menu_group_repository(&self) -> InMemoryMenuGroupRepository {
        InMemoryMenuGroupRepository { db: self.clone() }
    }
}

pub struct InMemoryOrderRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(
        &self,
        order: Order,
        line_items: Vec<OrderLineItem>,
    ) -> RepositoryResult<Order> {
        let mut orders = self.db.orders.write().await;
        let mut items = self.db.order_line_items.write().await;

        // Order rows are stored without their line items; the join happens
        // at read time.
        let mut row = order.clone();
        row.order_line_items = Vec::new();
        orders.insert(row.id, row);
        items.extend(line_items.clone());

        let mut created = order;
        created.order_line_items = line_items;
        Ok(created)
    }

    async fn save(&self, order: Order) -> RepositoryResult<Order> {
        let mut orders = self.db.orders.write().await;
        let mut row = order.clone();
        row.order_line_items = Vec::new();
        orders.insert(row.id, row);
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>> {
        Ok(self.db.orders.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.db.orders.read().await.values().cloned().collect();
        orders.sort_by_key(|o| o.ordered_at);
        Ok(orders)
    }

    async fn find_line_items(&self, order_id: Uuid) -> RepositoryResult<Vec<OrderLineItem>> {
        let items = self.db.order_line_items.read().await;
        let mut result: Vec<OrderLineItem> = items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect();
        result.sort_by_key(|item| item.seq);
        Ok(result)
    }

    async fn exists_by_table_and_status_in(
        &self,
        order_table_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        let orders = self.db.orders.read().await;
        Ok(orders
            .values()
            .any(|o| o.order_table_id == order_table_id && statuses.contains(&o.order_status)))
    }

    async fn exists_by_tables_and_status_in(
        &self,
        order_table_ids: &[Uuid],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool> {
        let orders = self.db.orders.read().await;
        Ok(orders.values().any(|o| {
            order_table_ids.contains(&o.order_table_id) && statuses.contains(&o.order_status)
        }))
    }
}

pub struct InMemoryOrderTableRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl OrderTableRepository for InMemoryOrderTableRepository {
    async fn save(&self, table: OrderTable) -> RepositoryResult<OrderTable> {
        self.db
            .order_tables
            .write()
            .await
            .insert(table.id, table.clone());
        Ok(table)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OrderTable>> {
        Ok(self.db.order_tables.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<OrderTable>> {
        Ok(self.db.order_tables.read().await.values().cloned().collect())
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OrderTable>> {
        let tables = self.db.order_tables.read().await;
        Ok(tables
            .values()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn find_all_by_table_group(
        &self,
        table_group_id: Uuid,
    ) -> RepositoryResult<Vec<OrderTable>> {
        let tables = self.db.order_tables.read().await;
        Ok(tables
            .values()
            .filter(|t| t.table_group_id == Some(table_group_id))
            .cloned()
            .collect())
    }
}

pub struct InMemoryTableGroupRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl TableGroupRepository for InMemoryTableGroupRepository {
    async fn create(
        &self,
        group: TableGroup,
        member_ids: &[Uuid],
    ) -> RepositoryResult<Vec<OrderTable>> {
        let mut groups = self.db.table_groups.write().await;
        let mut tables = self.db.order_tables.write().await;

        groups.insert(group.id, group.clone());

        let mut members = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            if let Some(table) = tables.get_mut(id) {
                table.join_group(group.id);
                members.push(table.clone());
            }
        }
        Ok(members)
    }

    async fn ungroup(&self, table_group_id: Uuid) -> RepositoryResult<()> {
        let mut groups = self.db.table_groups.write().await;
        let mut tables = self.db.order_tables.write().await;

        for table in tables.values_mut() {
            if table.table_group_id == Some(table_group_id) {
                table.leave_group();
            }
        }
        groups.remove(&table_group_id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TableGroup>> {
        Ok(self.db.table_groups.read().await.get(&id).cloned())
    }
}

pub struct InMemoryMenuRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn save(&self, menu: Menu) -> RepositoryResult<Menu> {
        self.db.menus.write().await.insert(menu.id, menu.clone());
        Ok(menu)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>> {
        Ok(self.db.menus.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Menu>> {
        Ok(self.db.menus.read().await.values().cloned().collect())
    }

    async fn count_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<u64> {
        let menus = self.db.menus.read().await;
        Ok(menus.keys().filter(|id| ids.contains(id)).count() as u64)
    }
}

pub struct InMemoryProductRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        self.db
            .products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>> {
        Ok(self.db.products.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.db.products.read().await.values().cloned().collect())
    }
}

pub struct InMemoryMenuGroupRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl MenuGroupRepository for InMemoryMenuGroupRepository {
    async fn save(&self, group: MenuGroup) -> RepositoryResult<MenuGroup> {
        self.db
            .menu_groups
            .write()
            .await
            .insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<MenuGroup>> {
        Ok(self.db.menu_groups.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<MenuGroup>> {
        Ok(self.db.menu_groups.read().await.values().cloned().collect())
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(self.db.menu_groups.read().await.contains_key(&id))
    }
}
