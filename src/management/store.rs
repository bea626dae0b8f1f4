use std::{
    collections::HashMap,
    io::{Error, ErrorKind},
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::RwLock;

use crate::{
    error::StoreError,
    types::{TokenRecord, TokenUpdate},
};

/// Durable source of truth for user tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError>;

    /// Full upsert, used when a user authorizes.
    async fn set(&self, record: &TokenRecord) -> Result<(), StoreError>;

    /// Partial update after a refresh; the refresh token is left untouched.
    async fn update(&self, user_id: &str, update: &TokenUpdate) -> Result<(), StoreError>;

    /// Removing an unknown user is not an error.
    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<TokenRecord>, StoreError>;
}

/// Stores one JSON document per user under a directory.
///
/// Records are written to a temporary file and renamed into place, so a
/// concurrent reader sees either the old or the new document.
pub struct FileTokenStore {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tmp_seq: AtomicU64::new(0),
        }
    }

    fn record_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(user_id)))
    }

    async fn write(&self, record: &TokenRecord) -> Result<(), StoreError> {
        async_fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(record)?;

        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self.dir.join(format!(
            "{}.{}-{}.tmp",
            file_stem(&record.user_id),
            std::process::id(),
            seq
        ));
        async_fs::write(&tmp_path, json).await?;
        if let Err(e) = async_fs::rename(&tmp_path, self.record_path(&record.user_id)).await {
            let _ = async_fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError> {
        let content = match async_fs::read_to_string(self.record_path(user_id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn set(&self, record: &TokenRecord) -> Result<(), StoreError> {
        self.write(record).await
    }

    async fn update(&self, user_id: &str, update: &TokenUpdate) -> Result<(), StoreError> {
        let mut record = self.get(user_id).await?.ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("no token stored for {user_id}"),
            )
        })?;
        record.apply(update);
        self.write(&record).await
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        match async_fs::remove_file(self.record_path(user_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<TokenRecord>, StoreError> {
        let mut entries = match async_fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next().await {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = async_fs::read_to_string(&path).await?;
                records.push(serde_json::from_str::<TokenRecord>(&content)?);
            }
        }
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(records)
    }
}

/// Keeps user ids usable as file names; anything outside `[A-Za-z0-9_-]`
/// is percent encoded so distinct ids never collide.
fn file_stem(user_id: &str) -> String {
    let mut stem = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            _ => stem.push_str(&format!("%{byte:02X}")),
        }
    }
    stem
}

/// Process local store, for ephemeral deployments and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<String, TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, user_id: &str) -> Result<Option<TokenRecord>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn set(&self, record: &TokenRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, user_id: &str, update: &TokenUpdate) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) => {
                record.apply(update);
                Ok(())
            }
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("no token stored for {user_id}"),
            )
            .into()),
        }
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(user_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<TokenRecord>, StoreError> {
        let mut records: Vec<TokenRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(records)
    }
}
