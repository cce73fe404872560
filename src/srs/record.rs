use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::types::{Direction, SrsState};

/// One learned word, keyed by its exact target-language text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    pub target: String,
    pub lang_id: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub romanization: String,
    #[serde(default)]
    pub forward: SrsState,
    #[serde(default)]
    pub reverse: SrsState,
    pub date_added: DateTime<Utc>,
}

impl VocabularyRecord {
    pub fn new(
        target: &str,
        lang_id: &str,
        translation: &str,
        romanization: &str,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.to_string(),
            lang_id: lang_id.to_string(),
            translation: translation.to_string(),
            romanization: romanization.to_string(),
            forward: SrsState::default(),
            reverse: SrsState::default(),
            date_added,
        }
    }

    pub fn srs(&self, direction: Direction) -> &SrsState {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }

    pub fn srs_mut(&mut self, direction: Direction) -> &mut SrsState {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Reverse => &mut self.reverse,
        }
    }
}

/// Flat record shape written by the browser client (`interval`,
/// `reverseInterval`, ...). Every field is optional and a malformed value
/// reads as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredVocabularyRecord {
    pub target: String,
    #[serde(deserialize_with = "lenient")]
    pub lang_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub translation: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub romanization: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub interval: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub ease: Option<f64>,
    #[serde(deserialize_with = "lenient_date")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub review_count: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub lapses: Option<f64>,

    #[serde(deserialize_with = "lenient")]
    pub reverse_interval: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub reverse_ease: Option<f64>,
    #[serde(deserialize_with = "lenient_date")]
    pub reverse_next_review: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub reverse_review_count: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub reverse_lapses: Option<f64>,

    #[serde(deserialize_with = "lenient_date")]
    pub date_added: Option<DateTime<Utc>>,
}

impl StoredVocabularyRecord {
    /// Normalizes into a fully-populated record. `default_lang` is used when
    /// the stored record carries no language; `now` when it has no
    /// `dateAdded`.
    pub fn normalize(self, default_lang: &str, now: DateTime<Utc>) -> VocabularyRecord {
        let forward = SrsState::from_parts(
            self.interval,
            self.ease,
            self.next_review,
            self.review_count,
            self.lapses,
        );
        let reverse = SrsState::from_parts(
            self.reverse_interval,
            self.reverse_ease,
            self.reverse_next_review,
            self.reverse_review_count,
            self.reverse_lapses,
        );
        VocabularyRecord {
            target: self.target,
            lang_id: self
                .lang_id
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| default_lang.to_string()),
            translation: self.translation.unwrap_or_default(),
            romanization: self.romanization.unwrap_or_default(),
            forward,
            reverse,
            date_added: self.date_added.unwrap_or(now),
        }
    }
}

impl From<&VocabularyRecord> for StoredVocabularyRecord {
    fn from(record: &VocabularyRecord) -> Self {
        Self {
            target: record.target.clone(),
            lang_id: Some(record.lang_id.clone()),
            translation: Some(record.translation.clone()),
            romanization: Some(record.romanization.clone()),
            interval: Some(f64::from(record.forward.interval)),
            ease: Some(record.forward.ease),
            next_review: record.forward.next_review,
            review_count: Some(f64::from(record.forward.review_count)),
            lapses: Some(f64::from(record.forward.lapses)),
            reverse_interval: Some(f64::from(record.reverse.interval)),
            reverse_ease: Some(record.reverse.ease),
            reverse_next_review: record.reverse.next_review,
            reverse_review_count: Some(f64::from(record.reverse.review_count)),
            reverse_lapses: Some(f64::from(record.reverse.lapses)),
            date_added: Some(record.date_added),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// Accepts RFC 3339 strings or epoch milliseconds.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(raw) => DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}
