use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::session::{build_daily_session, BuildOptions, SessionCard, SessionOutcome, SessionState};
use crate::srs::{Judgment, VocabularyRecord};
use crate::state::AppState;
use crate::validation::validate_lang_id;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/today", post(start_today))
        .route("/today/:lang_id", get(get_today))
        .route("/today/:lang_id/current", get(current_card))
        .route("/today/:lang_id/review", post(review_current))
}

fn checked_lang(lang_id: &str) -> Result<(), AppError> {
    validate_lang_id(lang_id).map_err(|m| AppError::bad_request("INVALID_LANG_ID", m))
}

fn session_not_found() -> AppError {
    AppError::not_found("SESSION_NOT_FOUND", "No session for today; create one first")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest {
    lang_id: String,
    new_card_budget: Option<i64>,
    #[serde(default)]
    new_only: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    session: SessionState,
    resumed: bool,
    remaining: usize,
    complete: bool,
}

impl SessionView {
    fn new(session: SessionState, resumed: bool) -> Self {
        Self {
            remaining: session.remaining(),
            complete: session.is_complete(),
            session,
            resumed,
        }
    }
}

/// Builds today's queue for a language, or hands back the one already in
/// progress. Only a freshly built session is written.
async fn start_today(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    checked_lang(&req.lang_id)?;
    let today = state.today();
    let budget = req
        .new_card_budget
        .unwrap_or(state.config().srs.default_new_card_budget);

    let cards = state.store().list_vocabulary_by_lang(&req.lang_id)?;
    let existing = state.store().get_daily_session(&req.lang_id, today)?;
    let outcome = build_daily_session(
        &cards,
        budget,
        existing,
        &req.lang_id,
        BuildOptions {
            new_only: req.new_only,
        },
        today,
    );

    let resumed = outcome.is_resumed();
    if let SessionOutcome::Built(session) = &outcome {
        state.store().save_daily_session(session)?;
        tracing::info!(
            lang_id = %req.lang_id,
            cards = session.len(),
            new_cards_used = session.new_cards_used,
            "Built daily session"
        );
    }
    Ok(ok(SessionView::new(outcome.into_session(), resumed)))
}

async fn get_today(
    Path(lang_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    checked_lang(&lang_id)?;
    let session = state
        .store()
        .get_daily_session(&lang_id, state.today())?
        .ok_or_else(session_not_found)?;
    Ok(ok(SessionView::new(session, true)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentCard {
    card: SessionCard,
    position: usize,
    total: usize,
    /// `None` when the word was deleted after the session was built.
    record: Option<VocabularyRecord>,
}

async fn current_card(
    Path(lang_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    checked_lang(&lang_id)?;
    let session = state
        .store()
        .get_daily_session(&lang_id, state.today())?
        .ok_or_else(session_not_found)?;

    let current = match session.current_card() {
        Some(card) => {
            let record = state.store().get_vocabulary(&card.key)?;
            Some(CurrentCard {
                card,
                position: session.index,
                total: session.len(),
                record,
            })
        }
        None => None,
    };
    Ok(ok(current))
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    judgment: Judgment,
}

async fn review_current(
    Path(lang_id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    checked_lang(&lang_id)?;
    let outcome = state
        .store()
        .apply_session_review(&lang_id, state.today(), req.judgment)?;
    if !outcome.applied {
        tracing::warn!(lang_id = %lang_id, "Ignored unrecognized judgment");
    }
    Ok(ok(outcome))
}
