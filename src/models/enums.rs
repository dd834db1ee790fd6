use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order.
///
/// Transitions are deliberately permissive: any non-terminal status may move
/// to any other status. Only COMPLETION is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Cooking,
    Meal,
    Completion,
}

impl OrderStatus {
    /// Statuses during which the order still occupies its table.
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Cooking, OrderStatus::Meal];

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completion)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Cooking => write!(f, "COOKING"),
            OrderStatus::Meal => write!(f, "MEAL"),
            OrderStatus::Completion => write!(f, "COMPLETION"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COOKING" => Ok(OrderStatus::Cooking),
            "MEAL" => Ok(OrderStatus::Meal),
            "COMPLETION" => Ok(OrderStatus::Completion),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_string_conversion() {
        assert_eq!(OrderStatus::Cooking.to_string(), "COOKING");
        assert_eq!(OrderStatus::Meal.to_string(), "MEAL");
        assert_eq!(OrderStatus::Completion.to_string(), "COMPLETION");

        assert_eq!("COOKING".parse::<OrderStatus>().unwrap(), OrderStatus::Cooking);
        assert_eq!("meal".parse::<OrderStatus>().unwrap(), OrderStatus::Meal);
        assert_eq!(
            "Completion".parse::<OrderStatus>().unwrap(),
            OrderStatus::Completion
        );
        assert!("SERVED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Cooking).unwrap();
        assert_eq!(json, "\"COOKING\"");

        let status: OrderStatus = serde_json::from_str("\"MEAL\"").unwrap();
        assert_eq!(status, OrderStatus::Meal);
    }

    #[test]
    fn test_terminal_status() {
        assert!(!OrderStatus::Cooking.is_terminal());
        assert!(!OrderStatus::Meal.is_terminal());
        assert!(OrderStatus::Completion.is_terminal());
    }
}
