pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub vocabulary: sled::Tree,
    pub daily_sessions: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub vocabulary_by_lang: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let vocabulary = db.open_tree(trees::VOCABULARY)?;
        let daily_sessions = db.open_tree(trees::DAILY_SESSIONS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let vocabulary_by_lang = db.open_tree(trees::VOCABULARY_BY_LANG)?;

        Ok(Self {
            db,
            vocabulary,
            daily_sessions,
            config_versions,
            vocabulary_by_lang,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Deserializes inside a sled transaction, aborting it on failure.
pub(crate) fn tx_deserialize<T: DeserializeOwned>(
    bytes: &[u8],
) -> Result<T, ConflictableTransactionError<StoreError>> {
    serde_json::from_slice(bytes)
        .map_err(|error| ConflictableTransactionError::Abort(StoreError::Serialization(error)))
}

pub(crate) fn tx_serialize<T: Serialize>(
    value: &T,
) -> Result<Vec<u8>, ConflictableTransactionError<StoreError>> {
    serde_json::to_vec(value)
        .map_err(|error| ConflictableTransactionError::Abort(StoreError::Serialization(error)))
}

pub(crate) fn map_tx_error(error: TransactionError<StoreError>) -> StoreError {
    match error {
        TransactionError::Abort(store_error) => store_error,
        TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
    }
}
