use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable item on the menu board. Read-only reference data from the
/// order core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub menu_group_id: Uuid,
    #[serde(default)]
    pub menu_products: Vec<MenuProduct>,
}

/// One (product, quantity) component of a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuProduct {
    pub seq: i64,
    pub menu_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
}

/// A single purchasable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

/// A named grouping of menus (e.g. "set menus", "seasonal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub id: Uuid,
    pub name: String,
}

/// Request model for creating a menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    pub price: Decimal,
    pub menu_group_id: Uuid,
    pub menu_products: Vec<MenuProductRequest>,
}

/// One product component within a menu-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuProductRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Request model for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
}

/// Request model for creating a menu group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuGroupRequest {
    pub name: String,
}

impl Menu {
    pub fn new(name: String, price: Decimal, menu_group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            menu_group_id,
            menu_products: Vec::new(),
        }
    }

    /// Build the menu's product components, assigning 1-based sequence
    /// numbers in request order.
    pub fn menu_products_from(&self, products: &[MenuProductRequest]) -> Vec<MenuProduct> {
        products
            .iter()
            .enumerate()
            .map(|(idx, mp)| MenuProduct {
                seq: (idx + 1) as i64,
                menu_id: self.id,
                product_id: mp.product_id,
                quantity: mp.quantity,
            })
            .collect()
    }
}

impl Product {
    pub fn new(name: String, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
        }
    }
}

impl MenuGroup {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_menu_creation() {
        let group_id = Uuid::new_v4();
        let menu = Menu::new("Fried chicken set".to_string(), dec!(30000), group_id);

        assert_eq!(menu.name, "Fried chicken set");
        assert_eq!(menu.price, dec!(30000));
        assert_eq!(menu.menu_group_id, group_id);
        assert!(menu.menu_products.is_empty());
    }

    #[test]
    fn test_menu_products_sequence() {
        let menu = Menu::new("Combo".to_string(), dec!(10000), Uuid::new_v4());
        let product_a = Uuid::new_v4();
        let product_b = Uuid::new_v4();

        let components = menu.menu_products_from(&[
            MenuProductRequest {
                product_id: product_a,
                quantity: 2,
            },
            MenuProductRequest {
                product_id: product_b,
                quantity: 1,
            },
        ]);

        assert_eq!(components[0].seq, 1);
        assert_eq!(components[0].product_id, product_a);
        assert_eq!(components[0].menu_id, menu.id);
        assert_eq!(components[1].seq, 2);
    }

    #[test]
    fn test_product_serde() {
        let product = Product::new("Cola".to_string(), dec!(1000));
        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }
}
