// Re-export all model types
pub use self::enums::*;
pub use self::errors::*;
pub use self::menu::*;
pub use self::order::*;
pub use self::table::*;
pub use self::table_group::*;

mod enums;
mod errors;
mod menu;
mod order;
mod table;
mod table_group;
