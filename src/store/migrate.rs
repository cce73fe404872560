use crate::srs::VocabularyRecord;
use crate::store::keys;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_vocabulary_lang_index", m002_vocabulary_lang_index),
    ]
}

/// 执行所有未应用的数据库迁移。
///
/// - 每个迁移函数必须幂等：进程可能在迁移成功但版本号写入之前崩溃，重启后会重跑。
/// - 版本号在每个迁移成功后立即持久化。
/// - 仅向前：set_version 拒绝降级。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;

    for (index, (name, func)) in migrations().iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.config_versions.get(VERSION_KEY.as_bytes())? {
        Some(raw) => match <[u8; 4]>::try_from(raw.as_ref()) {
            Ok(bytes) => Ok(u32::from_be_bytes(bytes)),
            Err(_) => Err(StoreError::Migration {
                version: 0,
                message: format!("unreadable schema version ({} bytes)", raw.len()),
            }),
        },
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// Rebuilds the language index from the vocabulary tree.
fn m002_vocabulary_lang_index(store: &Store) -> Result<(), StoreError> {
    store.vocabulary_by_lang.clear()?;
    let mut indexed = 0usize;
    for item in store.vocabulary.iter() {
        let (_, value) = item?;
        let record: VocabularyRecord = Store::deserialize(&value)?;
        let index_key = keys::vocabulary_lang_index_key(&record.lang_id, &record.target);
        store.vocabulary_by_lang.insert(index_key.as_bytes(), &[])?;
        indexed += 1;
    }
    tracing::debug!(indexed, "Rebuilt vocabulary language index");
    Ok(())
}
