mod category;
mod item;
mod list;

pub use category::Category;
pub use item::{NewItem, ShoppingItem};
pub use list::ShoppingList;
