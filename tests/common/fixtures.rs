use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use srs_backend::srs::clock::midnight;
use srs_backend::srs::{Direction, SrsState, VocabularyRecord};
use srs_backend::store::Store;

static SEED_SEQ: AtomicI64 = AtomicI64::new(0);

/// 每次调用递增一秒，使同一测试内的加入顺序与播种顺序一致
fn next_added() -> DateTime<Utc> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    base + Duration::seconds(SEED_SEQ.fetch_add(1, Ordering::SeqCst))
}

pub fn seed_new_added(
    store: &Store,
    target: &str,
    lang_id: &str,
    date_added: DateTime<Utc>,
) -> VocabularyRecord {
    let record = VocabularyRecord::new(target, lang_id, &format!("{target}-meaning"), "", date_added);
    store.upsert_vocabulary(&record).expect("upsert seed vocabulary");
    record
}

pub fn seed_new(store: &Store, target: &str, lang_id: &str) -> VocabularyRecord {
    seed_new_added(store, target, lang_id, next_added())
}

/// Seeds a word whose `direction` side was reviewed before and fell due on
/// `due_on`. The other side stays new.
pub fn seed_due(
    store: &Store,
    target: &str,
    lang_id: &str,
    direction: Direction,
    due_on: NaiveDate,
) -> VocabularyRecord {
    let mut record = VocabularyRecord::new(target, lang_id, "", "", next_added());
    *record.srs_mut(direction) = SrsState {
        interval: 3,
        next_review: Some(midnight(due_on)),
        review_count: 2,
        ..SrsState::default()
    };
    store.upsert_vocabulary(&record).expect("upsert seed vocabulary");
    record
}
