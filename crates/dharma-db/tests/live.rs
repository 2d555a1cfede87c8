//! Live integration tests for dharma-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the test
//! user may create databases on, so they are ignored by default:
//!
//! ```text
//! cargo test -p dharma-db --test live -- --ignored
//! ```

use chrono::{NaiveDate, TimeZone, Utc};
use dharma_core::{CenterRecord, RetreatDetails, RetreatRecord, TalkRecord, TeacherRecord};
use dharma_db::{
    count_talks, existing_talk_ids, get_center_by_subdomain, get_retreat_by_dharma_seed_id,
    get_talk_by_dharma_seed_id, get_teacher_by_dharma_seed_id, list_retreats,
    update_retreat_details, upsert_center, upsert_retreat, upsert_talk, upsert_teacher,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_teacher(pool: &sqlx::PgPool, dharma_seed_id: i64) -> i64 {
    upsert_teacher(pool, &TeacherRecord::new(dharma_seed_id, "Gil Fronsdal"))
        .await
        .unwrap_or_else(|e| panic!("upsert_teacher failed for {dharma_seed_id}: {e}"))
        .id
}

fn make_talk(dharma_seed_id: i64, teacher_id: i64) -> TalkRecord {
    TalkRecord {
        dharma_seed_id,
        slug: dharma_core::slugify("Metta Practice", dharma_seed_id),
        external_guid: TalkRecord::external_guid_for(dharma_seed_id),
        title: "Metta Practice".to_string(),
        description: Some("Loving-kindness".to_string()),
        audio_url: Some(format!(
            "https://dharmaseed.org/talks/{dharma_seed_id}/talk.mp3"
        )),
        duration_secs: 2712,
        recorded_on: NaiveDate::from_ymd_opt(2024, 5, 1),
        teacher_id,
        center_id: None,
        retreat_id: None,
    }
}

// ---------------------------------------------------------------------------
// Teachers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_teacher_reports_insert_then_update(pool: sqlx::PgPool) {
    let mut record = TeacherRecord::new(96, "Gil Fronsdal");

    let first = upsert_teacher(&pool, &record)
        .await
        .expect("first upsert failed");
    assert!(first.inserted);

    record.description = Some("Guiding teacher at IMC".to_string());
    let second = upsert_teacher(&pool, &record)
        .await
        .expect("second upsert failed");
    assert!(!second.inserted);
    assert_eq!(first.id, second.id);

    let row = get_teacher_by_dharma_seed_id(&pool, 96)
        .await
        .expect("get failed")
        .expect("teacher should exist");
    assert_eq!(row.description.as_deref(), Some("Guiding teacher at IMC"));
    assert_eq!(row.slug, "gil-fronsdal-96");
}

// ---------------------------------------------------------------------------
// Centers and retreats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_center_is_idempotent_on_subdomain(pool: sqlx::PgPool) {
    let center = CenterRecord::new("imc", "imc");
    let first = upsert_center(&pool, &center).await.expect("upsert failed");
    let second = upsert_center(&pool, &center).await.expect("upsert failed");
    assert_eq!(first, second);

    let row = get_center_by_subdomain(&pool, "imc")
        .await
        .expect("get failed")
        .expect("center should exist");
    assert_eq!(row.id, first);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_retreat_defaults_language(pool: sqlx::PgPool) {
    let id = upsert_retreat(&pool, &RetreatRecord::new(4521, "Retreat 4521"))
        .await
        .expect("upsert failed");

    let row = get_retreat_by_dharma_seed_id(&pool, 4521)
        .await
        .expect("get failed")
        .expect("retreat should exist");
    assert_eq!(row.id, id);
    assert_eq!(row.language, "en");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn retreat_details_update_existing_row_only(pool: sqlx::PgPool) {
    upsert_retreat(&pool, &RetreatRecord::new(4521, "Spring Retreat"))
        .await
        .expect("upsert failed");
    let built = Utc.with_ymd_and_hms(2024, 4, 22, 18, 30, 0).single();
    let details = RetreatDetails {
        dharma_seed_id: 4521,
        description: Some("Loving-kindness".to_owned()),
        language: "en-us".to_owned(),
        last_build_date: built,
    };

    assert!(update_retreat_details(&pool, &details)
        .await
        .expect("update failed"));
    let missing = RetreatDetails {
        dharma_seed_id: 9999,
        ..details.clone()
    };
    assert!(!update_retreat_details(&pool, &missing)
        .await
        .expect("update failed"));

    let rows = list_retreats(&pool).await.expect("list failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description.as_deref(), Some("Loving-kindness"));
    assert_eq!(rows[0].language, "en-us");
    assert_eq!(Some(rows[0].last_build_date), built);

    // A later upsert from the talk listing keeps the feed metadata.
    upsert_retreat(&pool, &RetreatRecord::new(4521, "Spring Retreat"))
        .await
        .expect("upsert failed");
    let row = get_retreat_by_dharma_seed_id(&pool, 4521)
        .await
        .expect("get failed")
        .expect("retreat should exist");
    assert_eq!(row.language, "en-us");
}

// ---------------------------------------------------------------------------
// Talks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_talk_updates_mutable_fields_only(pool: sqlx::PgPool) {
    let teacher_id = insert_teacher(&pool, 96).await;
    let mut talk = make_talk(101, teacher_id);

    let first = upsert_talk(&pool, &talk).await.expect("insert failed");

    talk.title = "Metta Practice (revised)".to_string();
    talk.duration_secs = 10;
    let second = upsert_talk(&pool, &talk).await.expect("update failed");
    assert_eq!(first, second);

    let row = get_talk_by_dharma_seed_id(&pool, 101)
        .await
        .expect("get failed")
        .expect("talk should exist");
    assert_eq!(row.title, "Metta Practice (revised)");
    assert_eq!(row.duration_secs, 2712, "duration is insert-only");
    assert_eq!(row.slug, "metta-practice-101", "slug is insert-only");
    assert_eq!(count_talks(&pool).await.expect("count failed"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn existing_talk_ids_returns_only_known_ids(pool: sqlx::PgPool) {
    let teacher_id = insert_teacher(&pool, 96).await;
    upsert_talk(&pool, &make_talk(101, teacher_id))
        .await
        .expect("insert failed");
    upsert_talk(&pool, &make_talk(103, teacher_id))
        .await
        .expect("insert failed");

    let known = existing_talk_ids(&pool, &[101, 102, 103])
        .await
        .expect("lookup failed");
    assert_eq!(known.len(), 2);
    assert!(known.contains(&101));
    assert!(known.contains(&103));
    assert!(!known.contains(&102));

    let empty = existing_talk_ids(&pool, &[]).await.expect("lookup failed");
    assert!(empty.is_empty());
}
