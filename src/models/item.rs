use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::Category;

/// A purchasable entry on a shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    /// Always a positive integer; invalid input normalizes to 1.
    pub quantity: i64,
    pub bought: bool,
    pub list_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, category: Category, list_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            quantity: 1,
            bought: false,
            list_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_bought(mut self, bought: bool) -> Self {
        self.bought = bought;
        self
    }
}

impl fmt::Display for ShoppingItem {
    /// Renders as shown in the list view, e.g. "2x Leite".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.quantity, self.name)
    }
}

/// Fields the client supplies when creating an item.
///
/// `bought` is not part of the payload: new items are always unbought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub quantity: i64,
    pub list_id: Uuid,
}
