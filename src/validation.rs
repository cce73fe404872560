//! 公共输入校验：语言标识与词条文本，供词汇与复习路由共用。

use crate::constants::{MAX_LANG_ID_LEN, MAX_TARGET_CHARS};

/// 语言标识：1-16 个字符，仅允许 ASCII 字母、数字、连字符和下划线（如 zh、ko、yue、zh-TW）
pub fn validate_lang_id(lang_id: &str) -> Result<(), &'static str> {
    if lang_id.is_empty() {
        return Err("langId must not be empty");
    }
    if lang_id.len() > MAX_LANG_ID_LEN {
        return Err("langId must be at most 16 characters");
    }
    if !lang_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err("langId may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

/// 词条文本按原样作为主键（区分大小写和字形），只排除空串、超长和控制字符
pub fn validate_target(target: &str) -> Result<(), &'static str> {
    if target.trim().is_empty() {
        return Err("target must not be empty");
    }
    if target.chars().count() > MAX_TARGET_CHARS {
        return Err("target must be at most 200 characters");
    }
    if target.chars().any(char::is_control) {
        return Err("target must not contain control characters");
    }
    Ok(())
}
