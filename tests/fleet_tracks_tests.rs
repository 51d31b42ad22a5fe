use chrono::DateTime;

use coastwatch::api::{FleetParams, Mmsi, VesselInfo};
use coastwatch::db::repository::PositionRepository;
use coastwatch::db::LocalRepository;
use coastwatch::models::{GeoPoint, OrgFilter, PositionReport};
use coastwatch::services::fleet_tracks;
use coastwatch::services::track::{outage_threshold_secs, split_segments};

fn report(mmsi: i64, dt: i64, lat: f64, lon: f64, sog: f64) -> PositionReport {
    PositionReport {
        mmsi: Mmsi::new(mmsi),
        time: DateTime::from_timestamp(dt, 0).unwrap(),
        dt,
        pos: GeoPoint::new(lat, lon),
        cog: Some(90.0),
        sog: Some(sog),
        name: Some(format!("vessel-{}", mmsi)),
        tag: Some("api".to_string()),
    }
}

fn vessel(mmsi: i64, name: &str, org: &str) -> VesselInfo {
    VesselInfo {
        mmsi: Mmsi::new(mmsi),
        name: name.to_string(),
        org: org.to_string(),
        fleet: org.to_string(),
        color: "gold".to_string(),
    }
}

fn all_time() -> FleetParams {
    FleetParams {
        to: DateTime::from_timestamp(10_000_000, 0).unwrap(),
        ..Default::default()
    }
}

async fn seed(repo: &LocalRepository, reports: &[PositionReport]) {
    repo.store_positions(reports).await.unwrap();
}

#[tokio::test]
async fn test_track_is_binned_and_most_recent_first() {
    let repo = LocalRepository::new();
    seed(
        &repo,
        &[
            report(503_000_001, 10, -27.10, 153.10, 3.0),
            report(503_000_001, 40, -27.11, 153.11, 7.0),
            report(503_000_001, 70, -27.12, 153.12, 4.0),
        ],
    )
    .await;

    let data = fleet_tracks(&repo, &all_time(), 3).await.unwrap();

    assert_eq!(data.tracks.len(), 1);
    let track = &data.tracks[0];
    // Two one-minute bins; the newer bin leads.
    assert_eq!(track.track.len(), 2);
    assert_eq!(track.track[0].dt, 60);
    assert_eq!(track.track[1].dt, 0);
    assert_eq!(track.dt, 60);
    // Last-wins position and max speed inside the first bin.
    assert_eq!(track.track[1].lat, -27.11);
    assert_eq!(track.track[1].sog, Some(7.0));
}

#[tokio::test]
async fn test_outage_splits_lines() {
    // Samples at t=0,60,120,600 with one-minute bins and multiplier 3
    // (threshold 180s): the splitter yields [600] and [120,60,0]; only the
    // three-point run survives as a drawable line.
    let repo = LocalRepository::new();
    seed(
        &repo,
        &[
            report(503_000_001, 0, -27.10, 153.10, 3.0),
            report(503_000_001, 60, -27.11, 153.11, 3.0),
            report(503_000_001, 120, -27.12, 153.12, 3.0),
            report(503_000_001, 600, -27.13, 153.13, 3.0),
        ],
    )
    .await;

    let data = fleet_tracks(&repo, &all_time(), 3).await.unwrap();
    let track = &data.tracks[0];

    let segments = split_segments(&track.track, outage_threshold_secs(1, 3));
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].len(), 1);
    assert_eq!(segments[1].len(), 3);

    assert_eq!(track.lines.len(), 1);
    assert_eq!(track.lines[0].len(), 3);
    // Segmentation does not change the current position.
    assert_eq!(track.dt, 600);
    assert_eq!(track.current_position().unwrap().lat, -27.13);
}

#[tokio::test]
async fn test_metadata_join_miss_synthesizes_default() {
    let repo = LocalRepository::new();
    seed(&repo, &[report(503_000_009, 10, -27.1, 153.1, 3.0)]).await;

    let data = fleet_tracks(&repo, &all_time(), 3).await.unwrap();
    let info = &data.tracks[0].info;

    assert_eq!(info.name, "503000009");
    assert_eq!(info.org, "Other");
    assert_eq!(info.fleet, "Other");
    assert_eq!(info.color, "gray");
}

#[tokio::test]
async fn test_metadata_join_hit_uses_registry() {
    let repo = LocalRepository::new();
    repo.insert_vessel_impl(vessel(503_000_001, "Rescue One", "QF2"));
    seed(&repo, &[report(503_000_001, 10, -27.1, 153.1, 3.0)]).await;

    let data = fleet_tracks(&repo, &all_time(), 3).await.unwrap();
    assert_eq!(data.tracks[0].info.name, "Rescue One");
    assert_eq!(data.tracks[0].info.color, "gold");
}

#[tokio::test]
async fn test_org_filters() {
    let repo = LocalRepository::new();
    repo.insert_vessel_impl(vessel(503_000_001, "Rescue One", "QF2"));
    repo.insert_vessel_impl(vessel(503_000_002, "Volunteer Two", "VMR"));
    seed(
        &repo,
        &[
            report(503_000_001, 10, -27.1, 153.1, 3.0),
            report(503_000_002, 10, -27.2, 153.2, 3.0),
            report(503_000_003, 10, -27.3, 153.3, 3.0),
        ],
    )
    .await;

    let primary = FleetParams {
        org: OrgFilter::parse("QF2"),
        ..all_time()
    };
    let data = fleet_tracks(&repo, &primary, 3).await.unwrap();
    assert_eq!(data.tracks.len(), 1);
    assert_eq!(data.tracks[0].mmsi.value(), 503_000_001);
    assert_eq!(data.org.as_deref(), Some("QF2"));

    let rescue = FleetParams {
        org: OrgFilter::parse("SAR"),
        ..all_time()
    };
    let data = fleet_tracks(&repo, &rescue, 3).await.unwrap();
    assert_eq!(data.tracks.len(), 2);

    let unfiltered = fleet_tracks(&repo, &all_time(), 3).await.unwrap();
    assert_eq!(unfiltered.tracks.len(), 3);
    assert_eq!(unfiltered.org, None);
}

#[tokio::test]
async fn test_limit_caps_vessels_after_filter() {
    let repo = LocalRepository::new();
    seed(
        &repo,
        &[
            report(503_000_001, 10, -27.1, 153.1, 3.0),
            report(503_000_002, 10, -27.2, 153.2, 3.0),
            report(503_000_003, 10, -27.3, 153.3, 3.0),
        ],
    )
    .await;

    let params = FleetParams {
        limit: Some(2),
        ..all_time()
    };
    let data = fleet_tracks(&repo, &params, 3).await.unwrap();
    assert_eq!(data.tracks.len(), 2);
    assert_eq!(data.limit, Some(2));
}

#[tokio::test]
async fn test_speed_floor_applies_before_binning() {
    let repo = LocalRepository::new();
    seed(
        &repo,
        &[
            report(503_000_001, 10, -27.1, 153.1, 0.2),
            report(503_000_001, 20, -27.2, 153.2, 6.0),
        ],
    )
    .await;

    let params = FleetParams {
        min_sog: 1.0,
        ..all_time()
    };
    let data = fleet_tracks(&repo, &params, 3).await.unwrap();
    let track = &data.tracks[0];

    // The drifting report is gone, so the moored position never wins.
    assert_eq!(track.track.len(), 1);
    assert_eq!(track.track[0].lat, -27.2);
    assert_eq!(data.sog, 1.0);
}

#[tokio::test]
async fn test_identical_queries_produce_identical_output() {
    let repo = LocalRepository::new();
    seed(
        &repo,
        &[
            report(503_000_001, 10, -27.1, 153.1, 3.0),
            report(503_000_001, 10, -27.15, 153.15, 3.0),
            report(503_000_002, 20, -27.2, 153.2, 4.0),
        ],
    )
    .await;

    let params = all_time();
    let first = fleet_tracks(&repo, &params, 3).await.unwrap();
    let second = fleet_tracks(&repo, &params, 3).await.unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn test_empty_window_yields_no_tracks() {
    let repo = LocalRepository::new();
    seed(&repo, &[report(503_000_001, 500, -27.1, 153.1, 3.0)]).await;

    let params = FleetParams {
        from: DateTime::from_timestamp(1000, 0).unwrap(),
        to: DateTime::from_timestamp(2000, 0).unwrap(),
        ..Default::default()
    };
    let data = fleet_tracks(&repo, &params, 3).await.unwrap();
    assert!(data.tracks.is_empty());
}
