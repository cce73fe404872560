use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionalTree};
use sled::Transactional;

use crate::srs::{mastery_level, Direction, MasteryLevel, VocabularyRecord};
use crate::store::keys;
use crate::store::{map_tx_error, tx_deserialize, tx_serialize, Store, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    pub new_count: u64,
    pub learning: u64,
    pub mastered: u64,
}

impl LevelCounts {
    fn add(&mut self, level: MasteryLevel) {
        match level {
            MasteryLevel::New => self.new_count += 1,
            MasteryLevel::Learning => self.learning += 1,
            MasteryLevel::Mastered => self.mastered += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryCounts {
    pub total: u64,
    pub forward: LevelCounts,
    pub reverse: LevelCounts,
}

impl Store {
    pub fn get_vocabulary(&self, target: &str) -> Result<Option<VocabularyRecord>, StoreError> {
        let key = keys::vocabulary_key(target);
        match self.vocabulary.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Writes `record` and keeps the language index in step, moving the
    /// index entry if the record changed language.
    pub fn upsert_vocabulary(&self, record: &VocabularyRecord) -> Result<(), StoreError> {
        (&self.vocabulary, &self.vocabulary_by_lang)
            .transaction(|(tx_vocab, tx_index)| tx_put_vocabulary(tx_vocab, tx_index, record))
            .map_err(map_tx_error)
    }

    /// Returns whether a record was removed.
    pub fn delete_vocabulary(&self, target: &str) -> Result<bool, StoreError> {
        let key = keys::vocabulary_key(target);

        let removed = (&self.vocabulary, &self.vocabulary_by_lang)
            .transaction(|(tx_vocab, tx_index)| {
                match tx_vocab.remove(key.as_bytes())? {
                    Some(raw) => {
                        let old: VocabularyRecord = tx_deserialize(&raw)?;
                        let index_key = keys::vocabulary_lang_index_key(&old.lang_id, &old.target);
                        tx_index.remove(index_key.as_bytes())?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .map_err(map_tx_error)?;

        Ok(removed)
    }

    pub fn list_vocabulary_by_lang(
        &self,
        lang_id: &str,
    ) -> Result<Vec<VocabularyRecord>, StoreError> {
        let prefix = keys::vocabulary_lang_index_prefix(lang_id);
        let mut records = Vec::new();
        for item in self.vocabulary_by_lang.scan_prefix(prefix.as_bytes()) {
            let (index_key, _) = item?;
            let Some((_, target)) = keys::parse_vocabulary_lang_index_key(&index_key) else {
                continue;
            };
            match self.get_vocabulary(&target)? {
                Some(record) if record.lang_id == lang_id => records.push(record),
                _ => {
                    tracing::warn!(lang_id, target = %target, "Dangling vocabulary index entry");
                }
            }
        }
        // 按加入顺序返回，新词按此顺序进入复习队列
        records.sort_by(|a, b| {
            a.date_added
                .cmp(&b.date_added)
                .then_with(|| a.target.cmp(&b.target))
        });
        Ok(records)
    }

    pub fn vocabulary_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Upserts every record in one transaction: either the whole batch is
    /// written or none of it. Returns how many were written.
    pub fn import_vocabulary(&self, records: &[VocabularyRecord]) -> Result<usize, StoreError> {
        (&self.vocabulary, &self.vocabulary_by_lang)
            .transaction(|(tx_vocab, tx_index)| {
                for record in records {
                    tx_put_vocabulary(tx_vocab, tx_index, record)?;
                }
                Ok(())
            })
            .map_err(map_tx_error)?;
        tracing::info!(imported = records.len(), "Imported vocabulary");
        Ok(records.len())
    }

    pub fn get_mastery_counts(&self, lang_id: &str) -> Result<MasteryCounts, StoreError> {
        let mut counts = MasteryCounts::default();
        for record in self.list_vocabulary_by_lang(lang_id)? {
            counts.total += 1;
            counts
                .forward
                .add(mastery_level(record.srs(Direction::Forward)));
            counts
                .reverse
                .add(mastery_level(record.srs(Direction::Reverse)));
        }
        Ok(counts)
    }
}

fn tx_put_vocabulary(
    tx_vocab: &TransactionalTree,
    tx_index: &TransactionalTree,
    record: &VocabularyRecord,
) -> Result<(), ConflictableTransactionError<StoreError>> {
    if record.target.is_empty() {
        return Err(ConflictableTransactionError::Abort(StoreError::Validation(
            "vocabulary target is empty".to_string(),
        )));
    }
    let key = keys::vocabulary_key(&record.target);
    if let Some(old_raw) = tx_vocab.get(key.as_bytes())? {
        let old: VocabularyRecord = tx_deserialize(&old_raw)?;
        if old.lang_id != record.lang_id {
            let old_index_key = keys::vocabulary_lang_index_key(&old.lang_id, &old.target);
            tx_index.remove(old_index_key.as_bytes())?;
        }
    }
    tx_vocab.insert(key.as_bytes(), tx_serialize(record)?)?;
    let index_key = keys::vocabulary_lang_index_key(&record.lang_id, &record.target);
    tx_index.insert(index_key.as_bytes(), &[] as &[u8])?;
    Ok(())
}
