//! Offline unit tests for dharma-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::{NaiveDate, Utc};
use dharma_core::{AppConfig, Environment, LogFormat};
use dharma_db::{CenterRow, PoolConfig, TalkRow, TeacherUpsert};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        log_format: LogFormat::Json,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        source_base_url: "https://dharmaseed.org".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        sync_page_delay_ms: 1000,
        sync_batch_size: 10,
        sync_batch_delay_ms: 1000,
        sync_max_pages: None,
        retry_max_attempts: 3,
        retry_initial_delay_ms: 1000,
        retry_max_delay_ms: 10_000,
        retry_backoff_factor: 2,
        page_retry_initial_delay_ms: 3000,
        sync_schedule: None,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`TalkRow`] carries nullable audio,
/// center, and retreat references. No database required.
#[test]
fn talk_row_has_expected_fields() {
    let now = Utc::now();
    let row = TalkRow {
        id: 1,
        dharma_seed_id: 101,
        slug: "metta-practice-101".to_string(),
        external_guid: "dharmaseed-talk-101".to_string(),
        title: "Metta Practice".to_string(),
        description: None,
        audio_url: None,
        duration_secs: 2712,
        recorded_on: NaiveDate::from_ymd_opt(2024, 5, 1),
        teacher_id: 7,
        center_id: None,
        retreat_id: None,
        publication_date: now,
        created_at: now,
        updated_at: now,
    };

    assert_eq!(row.external_guid, "dharmaseed-talk-101");
    assert!(row.audio_url.is_none());
    assert!(row.center_id.is_none());
    assert_eq!(row.recorded_on, NaiveDate::from_ymd_opt(2024, 5, 1));
}

#[test]
fn center_row_is_keyed_on_subdomain() {
    let now = Utc::now();
    let row = CenterRow {
        id: 3,
        dharma_seed_subdomain: "imc".to_string(),
        slug: "insight-meditation-center-imc".to_string(),
        name: "Insight Meditation Center".to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    };

    assert_eq!(row.dharma_seed_subdomain, "imc");
    assert!(row.slug.ends_with("-imc"));
}

#[test]
fn teacher_upsert_is_copy_and_comparable() {
    let first = TeacherUpsert {
        id: 5,
        inserted: true,
    };
    let copy = first;
    assert_eq!(first, copy);
    assert_ne!(
        first,
        TeacherUpsert {
            id: 5,
            inserted: false
        }
    );
}
