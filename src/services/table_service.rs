use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{OrderStatus, OrderTable, ServiceError, ServiceResult};
use crate::repositories::{OrderRepository, OrderTableRepository};

/// Service orchestrating table occupancy and guest-count changes.
pub struct TableService {
    order_repository: Arc<dyn OrderRepository>,
    order_table_repository: Arc<dyn OrderTableRepository>,
}

impl TableService {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        order_table_repository: Arc<dyn OrderTableRepository>,
    ) -> Self {
        Self {
            order_repository,
            order_table_repository,
        }
    }

    /// Register a new table. No validation beyond the request shape.
    #[instrument(skip(self))]
    pub async fn create(&self, number_of_guests: i32, empty: bool) -> ServiceResult<OrderTable> {
        info!("Creating order table");

        let table = self
            .order_table_repository
            .save(OrderTable::new(number_of_guests, empty))
            .await?;

        info!("Order table created");
        Ok(table)
    }

    /// List all tables.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<OrderTable>> {
        Ok(self.order_table_repository.find_all().await?)
    }

    /// Toggle a table's empty flag.
    ///
    /// Grouped tables cannot toggle independently, and an order in COOKING
    /// or MEAL pins the table as-is.
    #[instrument(skip(self), fields(table_id = %order_table_id, empty = empty))]
    pub async fn change_empty(
        &self,
        order_table_id: Uuid,
        empty: bool,
    ) -> ServiceResult<OrderTable> {
        info!("Changing table empty flag");

        let mut table = self
            .order_table_repository
            .find_by_id(order_table_id)
            .await?
            .ok_or(ServiceError::TableNotFound { id: order_table_id })?;

        if table.has_table_group() {
            return Err(ServiceError::validation(format!(
                "table {} belongs to a table group",
                order_table_id
            )));
        }

        if self
            .order_repository
            .exists_by_table_and_status_in(order_table_id, &OrderStatus::ACTIVE)
            .await?
        {
            return Err(ServiceError::validation(format!(
                "table {} has an active order",
                order_table_id
            )));
        }

        table.empty = empty;
        let saved = self.order_table_repository.save(table).await?;

        info!("Table empty flag changed");
        Ok(saved)
    }

    /// Change the guest count on an occupied table.
    #[instrument(skip(self), fields(table_id = %order_table_id, guests = number_of_guests))]
    pub async fn change_number_of_guests(
        &self,
        order_table_id: Uuid,
        number_of_guests: i32,
    ) -> ServiceResult<OrderTable> {
        info!("Changing number of guests");

        if number_of_guests < 0 {
            return Err(ServiceError::validation(
                "number of guests must not be negative",
            ));
        }

        let mut table = self
            .order_table_repository
            .find_by_id(order_table_id)
            .await?
            .ok_or(ServiceError::TableNotFound { id: order_table_id })?;

        if table.empty {
            return Err(ServiceError::validation(format!(
                "guest count cannot be set on empty table {}",
                order_table_id
            )));
        }

        table.number_of_guests = number_of_guests;
        let saved = self.order_table_repository.save(table).await?;

        info!("Number of guests changed");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::{MockTestOrderRepository, MockTestOrderTableRepository};
    use mockall::predicate;

    fn service(
        order_repo: MockTestOrderRepository,
        table_repo: MockTestOrderTableRepository,
    ) -> TableService {
        TableService::new(Arc::new(order_repo), Arc::new(table_repo))
    }

    #[tokio::test]
    async fn test_create_accepts_any_guest_count() {
        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_save()
            .times(1)
            .returning(|table: OrderTable| Ok(table));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let table = service.create(4, false).await.unwrap();
        assert_eq!(table.number_of_guests, 4);
        assert!(!table.empty);
        assert!(table.table_group_id.is_none());
    }

    #[tokio::test]
    async fn test_change_empty_of_missing_table_fails_with_404() {
        let table_id = Uuid::new_v4();

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .with(predicate::eq(table_id))
            .times(1)
            .returning(|_| Ok(None));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let result = service.change_empty(table_id, true).await;
        match result.unwrap_err() {
            ServiceError::TableNotFound { id } => assert_eq!(id, table_id),
            other => panic!("Expected TableNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_change_empty_of_grouped_table_fails() {
        let mut table = OrderTable::new(2, false);
        table.join_group(Uuid::new_v4());
        let table_id = table.id;

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(table.clone())));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let result = service.change_empty(table_id, true).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_change_empty_blocked_by_active_order() {
        let table = OrderTable::new(2, false);
        let table_id = table.id;

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(table.clone())));

        let mut order_repo = MockTestOrderRepository::new();
        order_repo
            .expect_exists_by_table_and_status_in()
            .withf(move |id, statuses| *id == table_id && statuses == OrderStatus::ACTIVE)
            .times(1)
            .returning(|_, _| Ok(true));

        let service = service(order_repo, table_repo);

        let result = service.change_empty(table_id, true).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_change_empty_success() {
        let table = OrderTable::new(2, false);
        let table_id = table.id;

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(table.clone())));
        table_repo
            .expect_save()
            .times(1)
            .returning(|table: OrderTable| Ok(table));

        let mut order_repo = MockTestOrderRepository::new();
        order_repo
            .expect_exists_by_table_and_status_in()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = service(order_repo, table_repo);

        let saved = service.change_empty(table_id, true).await.unwrap();
        assert!(saved.empty);
    }

    #[tokio::test]
    async fn test_negative_guest_count_always_fails() {
        // Checked before the lookup: no repository expectations needed.
        let service = service(
            MockTestOrderRepository::new(),
            MockTestOrderTableRepository::new(),
        );

        let result = service.change_number_of_guests(Uuid::new_v4(), -1).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_guest_count_on_missing_table_fails_with_404() {
        let table_id = Uuid::new_v4();

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let result = service.change_number_of_guests(table_id, 3).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::TableNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_guest_count_on_empty_table_fails() {
        let table = OrderTable::new(0, true);
        let table_id = table.id;

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(table.clone())));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let result = service.change_number_of_guests(table_id, 3).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_guest_count_success() {
        let table = OrderTable::new(2, false);
        let table_id = table.id;

        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(table.clone())));
        table_repo
            .expect_save()
            .times(1)
            .returning(|table: OrderTable| Ok(table));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let saved = service.change_number_of_guests(table_id, 6).await.unwrap();
        assert_eq!(saved.number_of_guests, 6);
    }

    #[tokio::test]
    async fn test_list_returns_all_tables() {
        let mut table_repo = MockTestOrderTableRepository::new();
        table_repo
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![OrderTable::new(2, false), OrderTable::new(0, true)]));

        let service = service(MockTestOrderRepository::new(), table_repo);

        let tables = service.list().await.unwrap();
        assert_eq!(tables.len(), 2);
    }
}
