// Repositories module - data access layer

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Menu, MenuGroup, Order, OrderLineItem, OrderStatus, OrderTable, Product, RepositoryResult,
    TableGroup,
};

pub mod memory;
pub mod postgres;

pub use memory::{
    InMemoryDatabase, InMemoryMenuGroupRepository, InMemoryMenuRepository,
    InMemoryOrderRepository, InMemoryOrderTableRepository, InMemoryProductRepository,
    InMemoryTableGroupRepository,
};
pub use postgres::{
    PostgresMenuGroupRepository, PostgresMenuRepository, PostgresOrderRepository,
    PostgresOrderTableRepository, PostgresProductRepository, PostgresTableGroupRepository,
};

/// Data access operations for orders and their line items.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order together with its line items as one atomic write.
    async fn create(
        &self,
        order: Order,
        line_items: Vec<OrderLineItem>,
    ) -> RepositoryResult<Order>;

    /// Persist changes to an existing order row.
    async fn save(&self, order: Order) -> RepositoryResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Order>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Order>>;

    /// Line items for one order, in sequence order.
    async fn find_line_items(&self, order_id: Uuid) -> RepositoryResult<Vec<OrderLineItem>>;

    /// Whether the table has an order in any of the given statuses.
    async fn exists_by_table_and_status_in(
        &self,
        order_table_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool>;

    /// Whether any of the tables has an order in any of the given statuses.
    async fn exists_by_tables_and_status_in(
        &self,
        order_table_ids: &[Uuid],
        statuses: &[OrderStatus],
    ) -> RepositoryResult<bool>;
}

/// Data access operations for order tables.
#[async_trait]
pub trait OrderTableRepository: Send + Sync {
    async fn save(&self, table: OrderTable) -> RepositoryResult<OrderTable>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OrderTable>>;

    async fn find_all(&self) -> RepositoryResult<Vec<OrderTable>>;

    /// Tables matching the given ids; ids that resolve to nothing are
    /// simply absent from the result.
    async fn find_all_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OrderTable>>;

    async fn find_all_by_table_group(
        &self,
        table_group_id: Uuid,
    ) -> RepositoryResult<Vec<OrderTable>>;
}

/// Data access operations for table groups.
#[async_trait]
pub trait TableGroupRepository: Send + Sync {
    /// Persist a new group and mark every member table occupied and owned by
    /// it, as one atomic write. Returns the updated member tables.
    async fn create(
        &self,
        group: TableGroup,
        member_ids: &[Uuid],
    ) -> RepositoryResult<Vec<OrderTable>>;

    /// Clear group membership on every member table and remove the group,
    /// as one atomic write. Unknown group ids clear nothing.
    async fn ungroup(&self, table_group_id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TableGroup>>;
}

/// Data access operations for menus.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Persist a menu together with its product components.
    async fn save(&self, menu: Menu) -> RepositoryResult<Menu>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Menu>>;

    /// Number of stored menus whose id appears in `ids`. Duplicate ids in the
    /// input do not inflate the count.
    async fn count_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<u64>;
}

/// Data access operations for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: Product) -> RepositoryResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Product>>;
}

/// Data access operations for menu groups.
#[async_trait]
pub trait MenuGroupRepository: Send + Sync {
    async fn save(&self, group: MenuGroup) -> RepositoryResult<MenuGroup>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<MenuGroup>>;

    async fn find_all(&self) -> RepositoryResult<Vec<MenuGroup>>;

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool>;
}
