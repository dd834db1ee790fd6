use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderTable;

/// A set of tables merged for shared billing/occupancy purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGroup {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
}

/// Request model for grouping tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableGroupRequest {
    pub order_table_ids: Vec<Uuid>,
}

/// View of a created group together with its member tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGroupResponse {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    pub order_tables: Vec<OrderTable>,
}

impl TableGroup {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_date: Utc::now(),
        }
    }
}

impl Default for TableGroup {
    fn default() -> Self {
        Self::new()
    }
}
