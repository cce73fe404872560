use chrono::NaiveDate;
use serde::Serialize;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;

use crate::session::{SessionCard, SessionState};
use crate::srs::clock::{day_string, parse_day};
use crate::srs::{calculate_record_srs, Judgment, VocabularyRecord};
use crate::store::keys;
use crate::store::{map_tx_error, tx_deserialize, tx_serialize, Store, StoreError};

/// Result of applying one judgment to today's session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// The card the judgment was for.
    pub card: SessionCard,
    /// The card's record after the update; `None` if it was deleted mid-session.
    pub record: Option<VocabularyRecord>,
    pub session: SessionState,
    /// False when the judgment was unrecognized and nothing changed.
    pub applied: bool,
}

impl Store {
    pub fn get_daily_session(
        &self,
        lang_id: &str,
        today: NaiveDate,
    ) -> Result<Option<SessionState>, StoreError> {
        let key = keys::daily_session_key(lang_id, &day_string(today));
        match self.daily_sessions.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_daily_session(&self, session: &SessionState) -> Result<(), StoreError> {
        if session.card_keys.len() != session.card_directions.len() {
            return Err(StoreError::Validation(format!(
                "session has {} keys but {} directions",
                session.card_keys.len(),
                session.card_directions.len()
            )));
        }
        let key = keys::daily_session_key(&session.lang_id, &session.date);
        self.daily_sessions
            .insert(key.as_bytes(), Self::serialize(session)?)?;
        Ok(())
    }

    /// Applies `judgment` to the current card of today's `lang_id` session:
    /// reschedules that card's direction and advances the session, both in
    /// one transaction.
    pub fn apply_session_review(
        &self,
        lang_id: &str,
        today: NaiveDate,
        judgment: Judgment,
    ) -> Result<ReviewOutcome, StoreError> {
        let session_key = keys::daily_session_key(lang_id, &day_string(today));

        let outcome = (&self.vocabulary, &self.daily_sessions)
            .transaction(|(tx_vocab, tx_sessions)| {
                let raw = tx_sessions.get(session_key.as_bytes())?.ok_or_else(|| {
                    ConflictableTransactionError::Abort(StoreError::NotFound {
                        entity: "daily_session".to_string(),
                        key: session_key.clone(),
                    })
                })?;
                let mut session: SessionState = tx_deserialize(&raw)?;

                let Some(card) = session.current_card() else {
                    return Err(ConflictableTransactionError::Abort(StoreError::Conflict {
                        entity: "daily_session".to_string(),
                        key: session_key.clone(),
                    }));
                };

                let record_key = keys::vocabulary_key(&card.key);
                let current: Option<VocabularyRecord> = match tx_vocab.get(record_key.as_bytes())? {
                    Some(raw) => Some(tx_deserialize(&raw)?),
                    None => None,
                };

                if !judgment.is_recognized() {
                    return Ok(ReviewOutcome {
                        card,
                        record: current,
                        session,
                        applied: false,
                    });
                }

                let updated = current
                    .map(|record| calculate_record_srs(judgment, &record, card.direction, today));
                if let Some(record) = &updated {
                    tx_vocab.insert(record_key.as_bytes(), tx_serialize(record)?)?;
                }

                session.record_judgment(judgment);
                tx_sessions.insert(session_key.as_bytes(), tx_serialize(&session)?)?;

                Ok(ReviewOutcome {
                    card,
                    record: updated,
                    session,
                    applied: true,
                })
            })
            .map_err(map_tx_error)?;

        tracing::debug!(
            lang_id,
            target = %outcome.card.key,
            direction = outcome.card.direction.as_str(),
            applied = outcome.applied,
            index = outcome.session.index,
            "Applied session review"
        );

        Ok(outcome)
    }

    /// Deletes sessions for days before `today`. Returns how many were removed.
    pub fn cleanup_stale_sessions(&self, today: NaiveDate) -> Result<u64, StoreError> {
        let mut removed = 0u64;
        for item in self.daily_sessions.iter() {
            let (key, _) = item?;
            let stale = match keys::parse_daily_session_key(&key) {
                Some((_, date)) => parse_day(&date).map_or(true, |day| day < today),
                None => true,
            };
            if stale {
                self.daily_sessions.remove(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
