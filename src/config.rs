use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_MAX_IMPORT_BATCH, DEFAULT_NEW_CARD_BUDGET};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub srs: SrsConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Clone)]
pub struct SrsConfig {
    /// Used when a session request does not name its own budget.
    pub default_new_card_budget: i64,
    pub max_import_batch: usize,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub is_leader: bool,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            default_new_card_budget: DEFAULT_NEW_CARD_BUDGET,
            max_import_batch: DEFAULT_MAX_IMPORT_BATCH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/srs.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            srs: SrsConfig {
                default_new_card_budget: env_or_parse(
                    "SRS_NEW_CARD_BUDGET",
                    DEFAULT_NEW_CARD_BUDGET,
                ),
                max_import_batch: env_or_parse("SRS_MAX_IMPORT_BATCH", DEFAULT_MAX_IMPORT_BATCH),
            },
            worker: WorkerConfig {
                is_leader: env_or_bool("WORKER_LEADER", true),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
