pub mod menu_group_service;
pub mod menu_service;
pub mod order_service;
pub mod product_service;
pub mod table_group_service;
pub mod table_service;

pub use menu_group_service::MenuGroupService;
pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use table_group_service::TableGroupService;
pub use table_service::TableService;
