//! Entity persistence: one opaque payload per `(kind, string_id)`.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::store::{DurableStore, EntityKey};
use crate::Error;

/// A stored entity with its last write time.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub payload: Vec<u8>,
    pub updated_at: String,
}

impl CacheDb {
    /// Insert or overwrite the entity under `key`.
    ///
    /// UPSERT semantics; concurrent writers race and the last one wins.
    pub async fn put_entity(&self, key: &EntityKey, payload: &[u8]) -> Result<(), Error> {
        let key = key.clone();
        let payload = payload.to_vec();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entities (kind, string_id, payload, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(kind, string_id) DO UPDATE SET
                        payload = excluded.payload,
                        updated_at = excluded.updated_at",
                    params![key.kind, key.string_id, payload, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the entity under `key`.
    ///
    /// Returns None if no entity has been written.
    pub async fn get_entity(&self, key: &EntityKey) -> Result<Option<Entity>, Error> {
        let key = key.clone();
        self.conn
            .call(move |conn| -> Result<Option<Entity>, Error> {
                let mut stmt =
                    conn.prepare("SELECT payload, updated_at FROM entities WHERE kind = ?1 AND string_id = ?2")?;

                let result = stmt.query_row(params![key.kind, key.string_id], |row| {
                    Ok(Entity { payload: row.get(0)?, updated_at: row.get(1)? })
                });

                match result {
                    Ok(entity) => Ok(Some(entity)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl DurableStore for CacheDb {
    async fn get(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.get_entity(key).await?.map(|entity| entity.payload))
    }

    async fn put(&self, key: &EntityKey, payload: &[u8]) -> Result<(), Error> {
        self.put_entity(key, payload).await
    }
}
