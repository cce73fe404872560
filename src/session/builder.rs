use std::slice::Iter;

use chrono::NaiveDate;

use super::SessionState;
use crate::srs::{sort_cards_by_srs, Direction, VocabularyRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Leave out every already-reviewed card; only new cards, up to budget.
    pub new_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The existing session was still valid and is returned untouched.
    Resumed(SessionState),
    /// A fresh session was built and needs persisting.
    Built(SessionState),
}

impl SessionOutcome {
    pub fn is_resumed(&self) -> bool {
        matches!(self, Self::Resumed(_))
    }

    pub fn session(&self) -> &SessionState {
        match self {
            Self::Resumed(s) | Self::Built(s) => s,
        }
    }

    pub fn into_session(self) -> SessionState {
        match self {
            Self::Resumed(s) | Self::Built(s) => s,
        }
    }
}

/// Resumes `existing` when it belongs to `today` and `lang_id`, otherwise
/// builds today's queue from `all_cards`.
///
/// `all_cards` must already be filtered to `lang_id`. Due cards (forward,
/// then reverse, most overdue first) always precede new cards; new cards of
/// both directions share `new_card_budget` and alternate starting with
/// forward. Not-due cards are left out.
pub fn build_daily_session(
    all_cards: &[VocabularyRecord],
    new_card_budget: i64,
    existing: Option<SessionState>,
    lang_id: &str,
    options: BuildOptions,
    today: NaiveDate,
) -> SessionOutcome {
    if let Some(session) = existing {
        if session.is_valid_for(today, lang_id) {
            return SessionOutcome::Resumed(session);
        }
        tracing::debug!(
            stale_date = %session.date,
            stale_lang = %session.lang_id,
            lang_id,
            "Discarding stale session"
        );
    }

    let forward = sort_cards_by_srs(all_cards, Direction::Forward, today);
    let reverse = sort_cards_by_srs(all_cards, Direction::Reverse, today);

    let mut session = SessionState::empty(today, lang_id);

    if !options.new_only {
        for card in &forward.due {
            session.push(&card.target, Direction::Forward);
        }
        for card in &reverse.due {
            session.push(&card.target, Direction::Reverse);
        }
    }

    let budget = usize::try_from(new_card_budget).unwrap_or(0);
    let mut forward_new = forward.new.iter();
    let mut reverse_new = reverse.new.iter();
    let mut prefer_forward = true;
    let mut used = 0usize;

    while used < budget {
        let (first, second) = if prefer_forward {
            (Direction::Forward, Direction::Reverse)
        } else {
            (Direction::Reverse, Direction::Forward)
        };
        let pick = next_new(first, &mut forward_new, &mut reverse_new)
            .or_else(|| next_new(second, &mut forward_new, &mut reverse_new));
        let Some((card, direction)) = pick else {
            break;
        };
        session.push(&card.target, direction);
        used += 1;
        prefer_forward = !prefer_forward;
    }

    session.new_cards_used = u32::try_from(used).unwrap_or(u32::MAX);

    tracing::debug!(
        lang_id,
        cards = session.len(),
        new_cards_used = session.new_cards_used,
        new_only = options.new_only,
        "Built daily session"
    );

    SessionOutcome::Built(session)
}

fn next_new<'a, 'b>(
    direction: Direction,
    forward: &mut Iter<'b, &'a VocabularyRecord>,
    reverse: &mut Iter<'b, &'a VocabularyRecord>,
) -> Option<(&'a VocabularyRecord, Direction)> {
    let pool = match direction {
        Direction::Forward => forward,
        Direction::Reverse => reverse,
    };
    pool.next().map(|card| (*card, direction))
}
