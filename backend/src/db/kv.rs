//! String key-value table standing in for browser local storage.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Insert or overwrite `key`.
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns whether a row was actually deleted.
pub async fn remove(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<KvEntry>> {
    let rows = sqlx::query("SELECT key, value, updated_at FROM kv_store ORDER BY key")
        .fetch_all(pool)
        .await?;

    let entries = rows
        .into_iter()
        .map(|row| KvEntry {
            key: row.get("key"),
            value: row.get("value"),
            updated_at: row.get("updated_at"),
        })
        .collect();

    Ok(entries)
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kv_store")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn clear(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM kv_store").execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_db_pool, migrations::run_migrations, DatabaseConfig};

    async fn test_pool() -> SqlitePool {
        let pool = get_db_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let pool = test_pool().await;

        set(&pool, "reflectaUser", "first").await.unwrap();
        set(&pool, "reflectaUser", "second").await.unwrap();

        assert_eq!(get(&pool, "reflectaUser").await.unwrap().as_deref(), Some("second"));
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_reports_whether_key_existed() {
        let pool = test_pool().await;
        set(&pool, "Me-pic", "pic.jpg").await.unwrap();

        assert!(remove(&pool, "Me-pic").await.unwrap());
        assert!(!remove(&pool, "Me-pic").await.unwrap());
        assert_eq!(get(&pool, "Me-pic").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_and_clear() {
        let pool = test_pool().await;
        set(&pool, "b", "2").await.unwrap();
        set(&pool, "a", "1").await.unwrap();

        let keys: Vec<String> = list(&pool).await.unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(clear(&pool).await.unwrap(), 2);
        assert_eq!(count(&pool).await.unwrap(), 0);
    }
}
