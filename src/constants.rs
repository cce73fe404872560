/// 默认每日新卡片上限（正向与反向共享）
pub const DEFAULT_NEW_CARD_BUDGET: i64 = 20;

/// 单次导入的默认最大记录数
pub const DEFAULT_MAX_IMPORT_BATCH: usize = 500;

/// 词条文本最大字符数
pub const MAX_TARGET_CHARS: usize = 200;

/// 语言标识最大长度
pub const MAX_LANG_ID_LEN: usize = 16;
