use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of shopping items.
///
/// Lists are fully collaborative: anyone connected to the same backend sees
/// and edits the same lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingList {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_has_unique_id() {
        let a = ShoppingList::new("Mercado");
        let b = ShoppingList::new("Mercado");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Mercado");
    }

    #[test]
    fn test_list_json_round_trip() {
        let list = ShoppingList::new("Churrasco");
        let json = serde_json::to_string(&list).unwrap();
        let parsed: ShoppingList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, list);
    }
}
