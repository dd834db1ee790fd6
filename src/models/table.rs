use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical seating unit that orders are placed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTable {
    pub id: Uuid,
    pub table_group_id: Option<Uuid>,
    pub number_of_guests: i32,
    pub empty: bool,
}

/// Request model for creating a new table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub number_of_guests: i32,
    pub empty: bool,
}

/// Request model for toggling a table's empty flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEmptyRequest {
    pub empty: bool,
}

/// Request model for changing a table's guest count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeNumberOfGuestsRequest {
    pub number_of_guests: i32,
}

impl OrderTable {
    pub fn new(number_of_guests: i32, empty: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            table_group_id: None,
            number_of_guests,
            empty,
        }
    }

    pub fn has_table_group(&self) -> bool {
        self.table_group_id.is_some()
    }

    /// Mark the table as belonging to a group. Grouped tables are occupied.
    pub fn join_group(&mut self, table_group_id: Uuid) {
        self.table_group_id = Some(table_group_id);
        self.empty = false;
    }

    /// Detach the table from its group; the empty flag is left unchanged.
    pub fn leave_group(&mut self) {
        self.table_group_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_creation() {
        let table = OrderTable::new(4, false);
        assert_eq!(table.number_of_guests, 4);
        assert!(!table.empty);
        assert!(!table.has_table_group());
    }

    #[test]
    fn test_join_group_marks_occupied() {
        let mut table = OrderTable::new(0, true);
        let group_id = Uuid::new_v4();

        table.join_group(group_id);

        assert_eq!(table.table_group_id, Some(group_id));
        assert!(!table.empty);
    }

    #[test]
    fn test_leave_group_keeps_empty_flag() {
        let mut table = OrderTable::new(0, true);
        table.join_group(Uuid::new_v4());

        table.leave_group();

        assert!(table.table_group_id.is_none());
        assert!(!table.empty);
    }
}
