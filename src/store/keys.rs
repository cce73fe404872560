pub fn vocabulary_key(target: &str) -> String {
    target.to_string()
}

pub fn vocabulary_lang_index_key(lang_id: &str, target: &str) -> String {
    format!("{}:{}", lang_id, target)
}

pub fn vocabulary_lang_index_prefix(lang_id: &str) -> String {
    format!("{}:", lang_id)
}

/// Target text of a `{lang_id}:{target}` index key. Targets may contain `:`,
/// so only the first separator splits.
pub fn parse_vocabulary_lang_index_key(key: &[u8]) -> Option<(String, String)> {
    let raw = std::str::from_utf8(key).ok()?;
    let (lang_id, target) = raw.split_once(':')?;
    Some((lang_id.to_string(), target.to_string()))
}

pub fn daily_session_key(lang_id: &str, date: &str) -> String {
    format!("{}:{}", lang_id, date)
}

/// `(lang_id, date)` of a session key. Dates never contain `:`, so the last
/// separator splits.
pub fn parse_daily_session_key(key: &[u8]) -> Option<(String, String)> {
    let raw = std::str::from_utf8(key).ok()?;
    let (lang_id, date) = raw.rsplit_once(':')?;
    Some((lang_id.to_string(), date.to_string()))
}
