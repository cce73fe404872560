use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use tempfile::TempDir;

use srs_backend::config::{Config, SrsConfig, WorkerConfig};
use srs_backend::routes::build_router;
use srs_backend::state::AppState;
use srs_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn store(&self) -> &Store {
        self.state.store()
    }
}

/// 测试固定日期，避免跨午夜时结果漂移
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 4).expect("valid date")
}

fn test_config(sled_path: String, srs: SrsConfig) -> Config {
    // 直接构造 Config，避免 set_var 在多线程测试中的竞态
    Config {
        host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path,
        cors_origin: "http://localhost:5173".to_string(),
        srs,
        worker: WorkerConfig { is_leader: false },
    }
}

pub async fn spawn_on_day(today: NaiveDate, srs: SrsConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("srs-test.sled");
    let config = test_config(sled_path.to_string_lossy().to_string(), srs);

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let state = AppState::new(store, &config).with_today(move || today);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_on_day(test_today(), SrsConfig::default()).await
}

pub async fn spawn_test_server_with_srs(srs: SrsConfig) -> TestApp {
    spawn_on_day(test_today(), srs).await
}
