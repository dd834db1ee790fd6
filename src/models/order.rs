use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderStatus;

/// An order placed against a table.
///
/// Line items are attached once at creation and never modified afterwards;
/// they are stored separately and joined by order id at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_table_id: Uuid,
    pub order_status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    #[serde(default)]
    pub order_line_items: Vec<OrderLineItem>,
}

/// One (menu, quantity) pair within an order, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub seq: i64,
    pub order_id: Uuid,
    pub menu_id: Uuid,
    pub quantity: i64,
}

/// Request model for creating a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub order_table_id: Uuid,
    pub order_line_items: Vec<OrderLineItemRequest>,
}

/// One line item within an order-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItemRequest {
    pub menu_id: Uuid,
    pub quantity: i64,
}

/// Request model for changing an order's status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOrderStatusRequest {
    pub order_status: OrderStatus,
}

impl Order {
    /// Create a new order in COOKING status with the current timestamp.
    pub fn new(order_table_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_table_id,
            order_status: OrderStatus::Cooking,
            ordered_at: Utc::now(),
            order_line_items: Vec::new(),
        }
    }

    /// Build the line items for this order, assigning 1-based sequence
    /// numbers in request order.
    pub fn line_items_from(&self, items: &[OrderLineItemRequest]) -> Vec<OrderLineItem> {
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| OrderLineItem {
                seq: (idx + 1) as i64,
                order_id: self.id,
                menu_id: item.menu_id,
                quantity: item.quantity,
            })
            .collect()
    }
}
