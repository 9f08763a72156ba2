use crate::model::{AlternativeCandidate, RankedCandidate, SavedAlternative, StorageError};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

pub struct SqliteStorage {
    conn: Connection,
    retention: Duration,
}

impl SqliteStorage {
    /// Opens the database and creates the tables if needed.
    /// Cached product results older than `retention` are purged on every write.
    pub fn new(db_path: &str, retention: Duration) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS product_alternatives (
                product_id TEXT PRIMARY KEY,
                alternatives TEXT NOT NULL,
                stored_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS saved_alternatives (
                id TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );
            ",
        )?;

        Ok(Self { conn, retention })
    }

    /// Stores the ranked alternatives for a product. Empty ids are ignored.
    pub fn store_alternatives(
        &self,
        product_id: &str,
        alternatives: &[RankedCandidate],
    ) -> Result<(), StorageError> {
        self.store_alternatives_at(product_id, alternatives, Utc::now())
    }

    pub fn store_alternatives_at(
        &self,
        product_id: &str,
        alternatives: &[RankedCandidate],
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        if product_id.is_empty() {
            return Ok(());
        }

        let payload = serde_json::to_string(alternatives)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO product_alternatives (product_id, alternatives, stored_at)
             VALUES (?1, ?2, ?3)",
            params![product_id, payload, now.timestamp_millis()],
        )?;
        debug!("Stored {} alternatives for {}", alternatives.len(), product_id);

        self.clear_old_product_data_at(now)?;
        Ok(())
    }

    /// Ranked alternatives last stored for the product, if any.
    pub fn get_stored_alternatives(
        &self,
        product_id: &str,
    ) -> Result<Option<Vec<RankedCandidate>>, StorageError> {
        if product_id.is_empty() {
            return Ok(None);
        }

        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT alternatives FROM product_alternatives WHERE product_id = ?1",
                params![product_id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Deletes cached product results older than the retention window.
    pub fn clear_old_product_data(&self) -> Result<usize, StorageError> {
        self.clear_old_product_data_at(Utc::now())
    }

    fn clear_old_product_data_at(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        // A window reaching past the representable range, or into the future, purges nothing.
        let Some(cutoff) = now
            .checked_sub_signed(self.retention)
            .filter(|cutoff| *cutoff <= now)
        else {
            return Ok(0);
        };
        let deleted = self.conn.execute(
            "DELETE FROM product_alternatives WHERE stored_at < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        if deleted > 0 {
            info!("Purged {} cached product entries", deleted);
        }
        Ok(deleted)
    }

    /// Adds an alternative to the saved list. Returns false if it was already saved.
    pub fn save_alternative(&self, alternative: &AlternativeCandidate) -> Result<bool, StorageError> {
        let payload = serde_json::to_string(alternative)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO saved_alternatives (id, payload, saved_at) VALUES (?1, ?2, ?3)",
            params![alternative.id, payload, Utc::now().timestamp_millis()],
        )?;
        Ok(inserted > 0)
    }

    /// Saved alternatives in the order they were saved.
    pub fn get_saved_alternatives(&self) -> Result<Vec<SavedAlternative>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload, saved_at FROM saved_alternatives ORDER BY rowid ASC")?;

        let rows = stmt.query_map([], |row| {
            let payload: String = row.get(0)?;
            let saved_at: i64 = row.get(1)?;
            Ok((payload, saved_at))
        })?;

        let mut saved = Vec::new();
        for row in rows {
            let (payload, saved_at) = row?;
            let candidate: AlternativeCandidate = serde_json::from_str(&payload)?;
            let saved_at = DateTime::from_timestamp_millis(saved_at)
                .ok_or(StorageError::InvalidTimestamp(saved_at))?;
            saved.push(SavedAlternative {
                candidate,
                saved_at,
            });
        }

        Ok(saved)
    }

    /// Removes an alternative from the saved list. Returns false if it was not saved.
    pub fn remove_saved_alternative(&self, id: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM saved_alternatives WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::new(":memory:", Duration::days(7)).unwrap()
    }

    fn candidate(id: &str) -> AlternativeCandidate {
        AlternativeCandidate {
            id: id.into(),
            name: format!("Eco {}", id),
            brand: "Leaf".into(),
            price: Some("$10.00".into()),
            description: String::new(),
            eco_features: vec!["Compostable".into()],
            image_url: None,
            purchase_url: Some("https://shop.example/item".into()),
            replaces: vec!["Kitchen".into()],
            keywords: vec!["sponge".into()],
            eco_score: 8.5,
        }
    }

    fn ranked(id: &str, score: u32) -> RankedCandidate {
        RankedCandidate {
            candidate: candidate(id),
            relevance_score: score,
        }
    }

    #[test]
    fn stores_and_reads_back_alternatives() {
        let storage = storage();
        let alternatives = vec![ranked("a", 5), ranked("b", 3)];
        storage.store_alternatives("B0001", &alternatives).unwrap();

        let stored = storage.get_stored_alternatives("B0001").unwrap().unwrap();
        assert_eq!(stored, alternatives);
        assert!(storage.get_stored_alternatives("B0002").unwrap().is_none());
    }

    #[test]
    fn empty_product_id_is_ignored() {
        let storage = storage();
        storage.store_alternatives("", &[ranked("a", 1)]).unwrap();
        assert!(storage.get_stored_alternatives("").unwrap().is_none());
    }

    #[test]
    fn old_entries_are_purged_on_write() {
        let storage = storage();
        let now = Utc::now();
        storage
            .store_alternatives_at("old", &[ranked("a", 1)], now - Duration::days(8))
            .unwrap();
        storage
            .store_alternatives_at("recent", &[ranked("a", 1)], now - Duration::days(2))
            .unwrap();
        assert!(storage.get_stored_alternatives("old").unwrap().is_some());

        storage.store_alternatives_at("new", &[], now).unwrap();
        assert!(storage.get_stored_alternatives("old").unwrap().is_none());
        assert!(storage.get_stored_alternatives("recent").unwrap().is_some());
        assert_eq!(storage.get_stored_alternatives("new").unwrap(), Some(vec![]));
    }

    #[test]
    fn huge_retention_window_keeps_everything() {
        let storage = SqliteStorage::new(":memory:", Duration::days(1_000_000_000)).unwrap();
        storage.store_alternatives("P1", &[ranked("a", 1)]).unwrap();
        assert!(storage.get_stored_alternatives("P1").unwrap().is_some());
        assert_eq!(storage.clear_old_product_data().unwrap(), 0);
    }

    #[test]
    fn negative_retention_window_keeps_fresh_write() {
        let storage = SqliteStorage::new(":memory:", Duration::days(-1)).unwrap();
        storage.store_alternatives("P1", &[ranked("a", 1)]).unwrap();
        assert!(storage.get_stored_alternatives("P1").unwrap().is_some());
    }

    #[test]
    fn saving_is_idempotent_and_ordered() {
        let storage = storage();
        assert!(storage.save_alternative(&candidate("b")).unwrap());
        assert!(storage.save_alternative(&candidate("a")).unwrap());
        assert!(!storage.save_alternative(&candidate("b")).unwrap());

        let saved = storage.get_saved_alternatives().unwrap();
        let ids: Vec<_> = saved.iter().map(|s| s.candidate.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(saved[0].candidate, candidate("b"));
    }

    #[test]
    fn removing_saved_alternative() {
        let storage = storage();
        storage.save_alternative(&candidate("a")).unwrap();
        assert!(storage.remove_saved_alternative("a").unwrap());
        assert!(!storage.remove_saved_alternative("a").unwrap());
        assert!(storage.get_saved_alternatives().unwrap().is_empty());
    }
}
