pub const VOCABULARY: &str = "vocabulary";
pub const DAILY_SESSIONS: &str = "daily_sessions";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Secondary index trees
pub const VOCABULARY_BY_LANG: &str = "vocabulary_by_lang";
