use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::srs::{mastery_level, MasteryLevel, StoredVocabularyRecord, VocabularyRecord};
use crate::state::AppState;
use crate::validation::{validate_lang_id, validate_target};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vocabulary))
        .route("/stats", get(vocabulary_stats))
        .route("/import", post(import_vocabulary))
        .route(
            "/:target",
            get(get_vocabulary)
                .put(put_vocabulary)
                .delete(delete_vocabulary),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LangQuery {
    lang_id: Option<String>,
}

impl LangQuery {
    fn require(self) -> Result<String, AppError> {
        let lang_id = self
            .lang_id
            .ok_or_else(|| AppError::bad_request("INVALID_LANG_ID", "langId is required"))?;
        validate_lang_id(&lang_id).map_err(|m| AppError::bad_request("INVALID_LANG_ID", m))?;
        Ok(lang_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VocabularyView {
    #[serde(flatten)]
    record: VocabularyRecord,
    forward_level: MasteryLevel,
    reverse_level: MasteryLevel,
}

impl From<VocabularyRecord> for VocabularyView {
    fn from(record: VocabularyRecord) -> Self {
        Self {
            forward_level: mastery_level(&record.forward),
            reverse_level: mastery_level(&record.reverse),
            record,
        }
    }
}

async fn list_vocabulary(
    Query(q): Query<LangQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let lang_id = q.require()?;
    let views: Vec<VocabularyView> = state
        .store()
        .list_vocabulary_by_lang(&lang_id)?
        .into_iter()
        .map(VocabularyView::from)
        .collect();
    Ok(ok(views))
}

async fn vocabulary_stats(
    Query(q): Query<LangQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let lang_id = q.require()?;
    let counts = state.store().get_mastery_counts(&lang_id)?;
    Ok(ok(counts))
}

fn checked_target(target: &str) -> Result<(), AppError> {
    validate_target(target).map_err(|m| AppError::bad_request("INVALID_TARGET", m))
}

async fn get_vocabulary(
    Path(target): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    checked_target(&target)?;
    let record = state
        .store()
        .get_vocabulary(&target)?
        .ok_or_else(|| AppError::not_found("VOCABULARY_NOT_FOUND", "Vocabulary not found"))?;
    Ok(ok(VocabularyView::from(record)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PutVocabularyRequest {
    lang_id: String,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    romanization: Option<String>,
}

/// Creates the word with fresh SRS state, or updates its display fields.
/// Scheduling state of an existing word is never touched here.
async fn put_vocabulary(
    Path(target): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PutVocabularyRequest>,
) -> Result<Response, AppError> {
    checked_target(&target)?;
    validate_lang_id(&req.lang_id).map_err(|m| AppError::bad_request("INVALID_LANG_ID", m))?;

    match state.store().get_vocabulary(&target)? {
        Some(mut record) => {
            record.lang_id = req.lang_id;
            if let Some(translation) = req.translation {
                record.translation = translation;
            }
            if let Some(romanization) = req.romanization {
                record.romanization = romanization;
            }
            state.store().upsert_vocabulary(&record)?;
            Ok(ok(VocabularyView::from(record)).into_response())
        }
        None => {
            let record = VocabularyRecord::new(
                &target,
                &req.lang_id,
                req.translation.as_deref().unwrap_or_default(),
                req.romanization.as_deref().unwrap_or_default(),
                Utc::now(),
            );
            state.store().upsert_vocabulary(&record)?;
            tracing::info!(target = %record.target, lang_id = %record.lang_id, "Vocabulary added");
            Ok(created(VocabularyView::from(record)).into_response())
        }
    }
}

async fn delete_vocabulary(
    Path(target): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    checked_target(&target)?;
    if !state.store().delete_vocabulary(&target)? {
        return Err(AppError::not_found(
            "VOCABULARY_NOT_FOUND",
            "Vocabulary not found",
        ));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    /// 记录中缺少 langId 时使用
    lang_id: String,
    records: Vec<StoredVocabularyRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResult {
    imported: usize,
    /// Targets rejected by validation, in input order.
    skipped: Vec<String>,
}

async fn import_vocabulary(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ImportRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_lang_id(&req.lang_id).map_err(|m| AppError::bad_request("INVALID_LANG_ID", m))?;
    let max = state.config().srs.max_import_batch;
    if req.records.len() > max {
        return Err(AppError::bad_request(
            "BATCH_TOO_LARGE",
            &format!("import accepts at most {max} records"),
        ));
    }

    let now = Utc::now();
    let mut skipped = Vec::new();
    let records: Vec<VocabularyRecord> = req
        .records
        .into_iter()
        .map(|stored| stored.normalize(&req.lang_id, now))
        .filter(|record| {
            let valid = validate_target(&record.target).is_ok()
                && validate_lang_id(&record.lang_id).is_ok();
            if !valid {
                skipped.push(record.target.clone());
            }
            valid
        })
        .collect();

    let imported = state.store().import_vocabulary(&records)?;
    if !skipped.is_empty() {
        tracing::warn!(skipped = skipped.len(), "Import skipped invalid records");
    }
    Ok(ok(ImportResult { imported, skipped }))
}
