//! Turso-backed subscription store.
//!
//! Edges live in a single `subscriptions` table keyed by
//! `(subscriber_id, publisher_id)`. The connection is shared behind an async
//! mutex; every call is a single statement.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use turso::params::Params;
use turso::{Builder, Connection, Database, Value};

use crate::application::ports::SubscriptionStore;
use crate::domain::errors::RepositoryError;
use crate::domain::shared::{ProfileId, Timestamp};
use crate::domain::social::Subscription;

const TABLE: &str = "subscriptions";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS subscriptions (
    subscriber_id TEXT NOT NULL,
    publisher_id TEXT NOT NULL,
    subscribed_at TEXT NOT NULL,
    PRIMARY KEY (subscriber_id, publisher_id)
)";

const SELECT_COLUMNS: &str = "SELECT subscriber_id, publisher_id, subscribed_at FROM subscriptions";

/// Durable [`SubscriptionStore`] on a local Turso database.
pub struct TursoSubscriptionStore {
    // Keeps the database handle alive for the connection's lifetime.
    _db: Database,
    conn: Mutex<Connection>,
}

impl TursoSubscriptionStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the database cannot be opened
    /// or migrated.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(RepositoryError::storage)?;
        }
        Self::open_at(&path.to_string_lossy()).await
    }

    /// Open a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the database cannot be created.
    pub async fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::open_at(":memory:").await
    }

    async fn open_at(location: &str) -> Result<Self, RepositoryError> {
        let db = Builder::new_local(location)
            .build()
            .await
            .map_err(RepositoryError::storage)?;
        let conn = db.connect().map_err(RepositoryError::storage)?;
        conn.execute(CREATE_TABLE, ())
            .await
            .map_err(RepositoryError::storage)?;

        tracing::debug!(location, "Subscription store ready");

        Ok(Self {
            _db: db,
            conn: Mutex::new(conn),
        })
    }

    async fn select(
        &self,
        sql: &str,
        params: Params,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(RepositoryError::storage)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(RepositoryError::storage)? {
            let subscriber = text_column(row.get_value(0), "subscriber_id")?;
            let publisher = text_column(row.get_value(1), "publisher_id")?;
            let subscribed_at = text_column(row.get_value(2), "subscribed_at")?;
            let subscribed_at =
                Timestamp::parse(&subscribed_at).map_err(|e| RepositoryError::Corrupt {
                    table: TABLE,
                    message: format!("subscribed_at: {e}"),
                })?;

            out.push(Subscription {
                subscriber_id: ProfileId::new(subscriber),
                publisher_id: ProfileId::new(publisher),
                subscribed_at,
            });
        }
        Ok(out)
    }
}

fn text_column(value: turso::Result<Value>, column: &str) -> Result<String, RepositoryError> {
    match value.map_err(RepositoryError::storage)? {
        Value::Text(text) => Ok(text),
        other => Err(RepositoryError::Corrupt {
            table: TABLE,
            message: format!("{column}: expected text, got {other:?}"),
        }),
    }
}

#[async_trait]
impl SubscriptionStore for TursoSubscriptionStore {
    async fn add(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR IGNORE INTO subscriptions (subscriber_id, publisher_id, subscribed_at) \
             VALUES (?1, ?2, ?3)",
            [
                subscription.subscriber_id.to_string(),
                subscription.publisher_id.to_string(),
                subscription.subscribed_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(RepositoryError::storage)?;
        Ok(())
    }

    async fn remove(
        &self,
        subscriber_id: &ProfileId,
        publisher_id: &ProfileId,
    ) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM subscriptions WHERE subscriber_id = ?1 AND publisher_id = ?2",
            [subscriber_id.to_string(), publisher_id.to_string()],
        )
        .await
        .map_err(RepositoryError::storage)?;
        Ok(())
    }

    async fn list_by_subscriber(
        &self,
        subscriber_id: &ProfileId,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        self.select(
            &format!("{SELECT_COLUMNS} WHERE subscriber_id = ?1"),
            Params::Positional(vec![Value::Text(subscriber_id.to_string())]),
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, RepositoryError> {
        self.select(SELECT_COLUMNS, Params::None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(sub: &str, publisher: &str) -> Subscription {
        Subscription::new(ProfileId::new(sub), ProfileId::new(publisher))
    }

    #[tokio::test]
    async fn add_list_remove() {
        let store = TursoSubscriptionStore::open_in_memory().await.unwrap();

        store.add(&edge("alice", "bob")).await.unwrap();
        store.add(&edge("alice", "diana")).await.unwrap();
        store.add(&edge("carol", "bob")).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 3);
        assert_eq!(
            store
                .list_by_subscriber(&ProfileId::new("alice"))
                .await
                .unwrap()
                .len(),
            2
        );

        store
            .remove(&ProfileId::new("alice"), &ProfileId::new("bob"))
            .await
            .unwrap();

        let remaining = store
            .list_by_subscriber(&ProfileId::new("alice"))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].publisher_id.as_str(), "diana");
    }

    #[tokio::test]
    async fn duplicate_add_keeps_one_row() {
        let store = TursoSubscriptionStore::open_in_memory().await.unwrap();

        store.add(&edge("alice", "bob")).await.unwrap();
        store.add(&edge("alice", "bob")).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribed_at_round_trips() {
        let store = TursoSubscriptionStore::open_in_memory().await.unwrap();
        let original = edge("alice", "bob");

        store.add(&original).await.unwrap();
        let loaded = store.list_all().await.unwrap();

        assert_eq!(loaded[0].subscribed_at, original.subscribed_at);
    }
}
