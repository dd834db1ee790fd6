use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    CreateOrderRequest, Order, OrderLineItemRequest, OrderStatus, ServiceError, ServiceResult,
};
use crate::repositories::{MenuRepository, OrderRepository, OrderTableRepository};

/// Service orchestrating order creation and status transitions.
pub struct OrderService {
    menu_repository: Arc<dyn MenuRepository>,
    order_repository: Arc<dyn OrderRepository>,
    order_table_repository: Arc<dyn OrderTableRepository>,
}

impl OrderService {
    pub fn new(
        menu_repository: Arc<dyn MenuRepository>,
        order_repository: Arc<dyn OrderRepository>,
        order_table_repository: Arc<dyn OrderTableRepository>,
    ) -> Self {
        Self {
            menu_repository,
            order_repository,
            order_table_repository,
        }
    }

    /// Create a new order in COOKING status.
    ///
    /// All validation happens before anything is written, so a failed call
    /// persists nothing.
    #[instrument(skip(self, request), fields(order_table_id = %request.order_table_id))]
    pub async fn create(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        info!("Creating order");

        self.validate_line_items(&request.order_line_items)?;
        self.check_menus_exist(&request.order_line_items).await?;
        self.check_table_occupied(request.order_table_id).await?;

        let order = Order::new(request.order_table_id);
        let line_items = order.line_items_from(&request.order_line_items);

        let created = self.order_repository.create(order, line_items).await?;

        info!(
            "Order created with {} line items",
            created.order_line_items.len()
        );
        Ok(created)
    }

    /// Change an order's status.
    ///
    /// COMPLETION is terminal; any other transition is allowed, including
    /// moving backwards. That permissiveness is intentional.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn change_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> ServiceResult<Order> {
        info!("Changing order status");

        let mut order = self
            .order_repository
            .find_by_id(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound { id: order_id })?;

        if order.order_status.is_terminal() {
            return Err(ServiceError::validation(format!(
                "order {} is completed and its status cannot change",
                order_id
            )));
        }

        order.order_status = status;
        let mut saved = self.order_repository.save(order).await?;
        saved.order_line_items = self.order_repository.find_line_items(order_id).await?;

        info!("Order status changed");
        Ok(saved)
    }

    /// List all orders with their line items joined in.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<Order>> {
        let mut orders = self.order_repository.find_all().await?;

        for order in &mut orders {
            order.order_line_items = self.order_repository.find_line_items(order.id).await?;
        }

        info!("Listed {} orders", orders.len());
        Ok(orders)
    }

    fn validate_line_items(&self, line_items: &[OrderLineItemRequest]) -> ServiceResult<()> {
        if line_items.is_empty() {
            return Err(ServiceError::validation(
                "order line items must not be empty",
            ));
        }
        if line_items.iter().any(|item| item.quantity <= 0) {
            return Err(ServiceError::validation(
                "order line item quantity must be positive",
            ));
        }
        Ok(())
    }

    /// Count-based menu existence check: the number of stored menus matching
    /// the requested ids must equal the number of line items. Duplicate menu
    /// ids within one order deflate the count and are rejected.
    async fn check_menus_exist(&self, line_items: &[OrderLineItemRequest]) -> ServiceResult<()> {
        let menu_ids: Vec<Uuid> = line_items.iter().map(|item| item.menu_id).collect();

        let found = self.menu_repository.count_by_ids(&menu_ids).await?;
        if found != line_items.len() as u64 {
            return Err(ServiceError::validation(
                "every order line item must reference an existing menu",
            ));
        }
        Ok(())
    }

    async fn check_table_occupied(&self, order_table_id: Uuid) -> ServiceResult<()> {
        let table = self
            .order_table_repository
            .find_by_id(order_table_id)
            .await?
            .ok_or_else(|| {
                ServiceError::validation(format!(
                    "order table does not exist: {}",
                    order_table_id
                ))
            })?;

        if table.empty {
            return Err(ServiceError::validation(format!(
                "orders cannot be placed against empty table {}",
                order_table_id
            )));
        }
        Ok(())
    }
}
