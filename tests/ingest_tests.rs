use chrono::DateTime;
use serde_json::json;

use coastwatch::db::repository::{ErrorLogRepository, FullRepository, PositionRepository};
use coastwatch::db::LocalRepository;
use coastwatch::services::ingest_batch;

fn valid_record(mmsi: i64, unix: i64) -> serde_json::Value {
    json!({
        "mmsi": mmsi,
        "pos": { "type": "Point", "coordinates": [153.27, -27.33] },
        "unix": unix,
        "time": DateTime::from_timestamp(unix, 0).unwrap().to_rfc3339(),
        "cog": 92.5,
        "sog": 5.2
    })
}

async fn stored_positions(repo: &LocalRepository) -> Vec<coastwatch::api::PositionReport> {
    repo.fetch_positions(
        DateTime::from_timestamp(0, 0).unwrap(),
        DateTime::from_timestamp(i32::MAX as i64, 0).unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_batch_with_one_bad_record_keeps_the_rest() {
    let repo = LocalRepository::new();

    let mut bad = valid_record(503_000_002, 200);
    bad["pos"]["coordinates"] = json!([153.27, -95.0]);
    let batch = vec![valid_record(503_000_001, 100), bad, valid_record(503_000_003, 300)];

    let outcome = ingest_batch(&repo, &batch).await.unwrap();
    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.rejected, 1);

    let positions = stored_positions(&repo).await;
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].mmsi.value(), 503_000_001);
    assert_eq!(positions[1].mmsi.value(), 503_000_003);

    let failures = repo.fetch_failures().await.unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("lat is out of range"));
    // The offending record is captured verbatim.
    assert!(failures[0].json.contains("503000002"));
}

#[tokio::test]
async fn test_accepted_records_are_stamped_with_source_tag() {
    let repo = LocalRepository::new();

    let mut record = valid_record(503_000_001, 100);
    record["tag"] = json!("feeder-7");
    ingest_batch(&repo, &[record]).await.unwrap();

    let positions = stored_positions(&repo).await;
    assert_eq!(positions[0].tag.as_deref(), Some("api"));
}

#[tokio::test]
async fn test_fully_rejected_batch_still_succeeds() {
    let repo = LocalRepository::new();

    let batch = vec![json!({}), json!({"mmsi": 1})];
    let outcome = ingest_batch(&repo, &batch).await.unwrap();

    assert_eq!(outcome.accepted, 0);
    assert_eq!(outcome.rejected, 2);
    assert_eq!(repo.position_count(), 0);
    assert_eq!(repo.failure_count(), 2);
}

#[tokio::test]
async fn test_non_object_record_is_rejected_not_fatal() {
    let repo = LocalRepository::new();

    let batch = vec![json!("not a report"), valid_record(503_000_001, 100)];
    let outcome = ingest_batch(&repo, &batch).await.unwrap();

    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.rejected, 1);
    let failures = repo.fetch_failures().await.unwrap();
    assert!(failures[0].message.contains("record is malformed"));
}

#[tokio::test]
async fn test_store_failure_is_surfaced() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let result = ingest_batch(&repo, &[valid_record(503_000_001, 100)]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_concurrent_batches_all_land() {
    let repo = LocalRepository::new();

    let mut handles = Vec::new();
    for batch_index in 0..4i64 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let batch: Vec<_> = (0..25)
                .map(|i| valid_record(503_000_001 + batch_index, 1000 + batch_index * 100 + i))
                .collect();
            ingest_batch(&repo, &batch).await.unwrap()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        accepted += handle.await.unwrap().accepted;
    }

    assert_eq!(accepted, 100);
    assert_eq!(repo.position_count(), 100);
    assert!(repo.health_check().await.unwrap());
}
