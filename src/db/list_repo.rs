use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::ShoppingList;

pub struct ListRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ListRow {
    id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl ListRow {
    fn into_list(self) -> ShoppingList {
        ShoppingList {
            id: Uuid::parse_str(&self.id).unwrap_or_else(|_| Uuid::nil()),
            name: self.name,
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

impl ListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, list: &ShoppingList) -> Result<ShoppingList, sqlx::Error> {
        sqlx::query(
            "INSERT INTO shopping_lists (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(list.id.to_string())
        .bind(&list.name)
        .bind(list.created_at.to_rfc3339())
        .bind(list.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_by_id(list.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ShoppingList>, sqlx::Error> {
        let row: Option<ListRow> = sqlx::query_as("SELECT * FROM shopping_lists WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ListRow::into_list))
    }

    /// All lists, newest first.
    pub async fn list(&self) -> Result<Vec<ShoppingList>, sqlx::Error> {
        let rows: Vec<ListRow> =
            sqlx::query_as("SELECT * FROM shopping_lists ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(ListRow::into_list).collect())
    }

    /// Renames a list and returns the updated row (updated_at comes from the
    /// table trigger, so it is re-read rather than computed here).
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<ShoppingList, sqlx::Error> {
        let result = sqlx::query("UPDATE shopping_lists SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        self.get_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM shopping_lists WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: ListRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: ListRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_list() {
        let ctx = setup_repo().await;

        let list = ShoppingList::new("Mercado");
        let created = ctx.repo.create(&list).await.unwrap();
        assert_eq!(created.name, "Mercado");
        assert_eq!(created.id, list.id);

        let fetched = ctx.repo.get_by_id(list.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Mercado");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let ctx = setup_repo().await;

        let mut older = ShoppingList::new("Antiga");
        older.created_at = older.created_at - chrono::Duration::hours(1);
        ctx.repo.create(&older).await.unwrap();
        ctx.repo.create(&ShoppingList::new("Nova")).await.unwrap();

        let lists = ctx.repo.list().await.unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].name, "Nova");
        assert_eq!(lists[1].name, "Antiga");
    }

    #[tokio::test]
    async fn test_rename_list() {
        let ctx = setup_repo().await;

        let list = ShoppingList::new("Feira");
        ctx.repo.create(&list).await.unwrap();

        let renamed = ctx.repo.rename(list.id, "Feira da semana").await.unwrap();
        assert_eq!(renamed.name, "Feira da semana");
        assert!(renamed.updated_at >= renamed.created_at);
    }

    #[tokio::test]
    async fn test_rename_missing_list() {
        let ctx = setup_repo().await;
        let result = ctx.repo.rename(Uuid::new_v4(), "Nada").await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn test_delete_list() {
        let ctx = setup_repo().await;

        let list = ShoppingList::new("Temporária");
        ctx.repo.create(&list).await.unwrap();
        ctx.repo.delete(list.id).await.unwrap();

        assert!(ctx.repo.get_by_id(list.id).await.unwrap().is_none());
    }
}
