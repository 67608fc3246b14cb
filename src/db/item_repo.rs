use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Category, ShoppingItem};

pub struct ItemRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    category: String,
    quantity: i64,
    bought: bool,
    list_id: String,
    created_at: String,
    updated_at: String,
}

impl ItemRow {
    fn into_item(self) -> ShoppingItem {
        ShoppingItem {
            id: Uuid::parse_str(&self.id).unwrap_or_else(|_| Uuid::nil()),
            name: self.name,
            // The data layer does not enforce the category set; anything
            // unknown lands in Outros.
            category: Category::from_str(&self.category).unwrap_or(Category::Outros),
            quantity: self.quantity,
            bought: self.bought,
            list_id: Uuid::parse_str(&self.list_id).unwrap_or_else(|_| Uuid::nil()),
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        }
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, item: &ShoppingItem) -> Result<ShoppingItem, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO shopping_items (id, name, category, quantity, bought, list_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(item.category.label())
        .bind(item.quantity)
        .bind(item.bought)
        .bind(item.list_id.to_string())
        .bind(item.created_at.to_rfc3339())
        .bind(item.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_by_id(item.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ShoppingItem>, sqlx::Error> {
        let row: Option<ItemRow> = sqlx::query_as("SELECT * FROM shopping_items WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ItemRow::into_item))
    }

    /// Items of one list, newest first.
    pub async fn list_for(&self, list_id: Uuid) -> Result<Vec<ShoppingItem>, sqlx::Error> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT * FROM shopping_items WHERE list_id = ? ORDER BY created_at DESC",
        )
        .bind(list_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemRow::into_item).collect())
    }

    pub async fn set_bought(&self, id: Uuid, bought: bool) -> Result<ShoppingItem, sqlx::Error> {
        let result = sqlx::query("UPDATE shopping_items SET bought = ? WHERE id = ?")
            .bind(bought)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        self.get_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM shopping_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes every item of a list, returning the removed rows so the feed
    /// can announce each one.
    pub async fn delete_for_list(&self, list_id: Uuid) -> Result<Vec<ShoppingItem>, sqlx::Error> {
        let removed = self.list_for(list_id).await?;

        sqlx::query("DELETE FROM shopping_items WHERE list_id = ?")
            .bind(list_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(removed)
    }
}
