mod common;

use common::ts;
use github_stats_graph::models::{DownloadRecord, Series, StarHistoryPoint};
use github_stats_graph::types::{Release, Stargazer};

#[test]
fn test_series_from_points() {
    let series = Series::from_points(vec![(ts(2024, 1, 1), 0), (ts(2024, 1, 5), 12)]);

    assert_eq!(series.len(), 2);
    assert_eq!(series.dates().len(), series.counts().len());
    assert_eq!(series.first(), Some((ts(2024, 1, 1), 0)));
    assert_eq!(series.last(), Some((ts(2024, 1, 5), 12)));
    assert_eq!(series.max_count(), Some(12));
}

#[test]
fn test_empty_series() {
    let series = Series::new();

    assert!(series.is_empty());
    assert_eq!(series.last(), None);
    assert_eq!(series.max_count(), None);
}

#[test]
fn test_series_from_star_history() {
    let history = vec![
        StarHistoryPoint {
            starred_at: ts(2024, 1, 1),
            count: 1,
        },
        StarHistoryPoint {
            starred_at: ts(2024, 1, 3),
            count: 2,
        },
    ];

    let series = Series::from_star_history(&history);

    assert_eq!(series.dates(), &[ts(2024, 1, 1), ts(2024, 1, 3)]);
    assert_eq!(series.counts(), &[1, 2]);
}

#[test]
fn test_series_push_and_iter() {
    let mut series = Series::new();
    series.push(ts(2024, 1, 1), 3);
    series.push(ts(2024, 1, 2), 5);

    let points: Vec<_> = series.iter().collect();
    assert_eq!(points, vec![(ts(2024, 1, 1), 3), (ts(2024, 1, 2), 5)]);
}

#[test]
fn test_download_record_timestamp_is_utc_instant() {
    let record = DownloadRecord {
        date: ts(2024, 6, 1).fixed_offset(),
        count: 1,
    };
    assert_eq!(record.timestamp(), ts(2024, 6, 1));
}

#[test]
fn test_stargazer_deserialization() {
    let json = r#"{
        "starred_at": "2024-02-03T04:05:06Z",
        "user": {
            "login": "octocat",
            "id": 1,
            "avatar_url": "https://github.com/images/error/octocat_happy.gif",
            "html_url": "https://github.com/octocat"
        }
    }"#;

    let star: Stargazer = serde_json::from_str(json).unwrap();

    assert_eq!(star.starred_at.to_rfc3339(), "2024-02-03T04:05:06+00:00");
    assert_eq!(star.user.unwrap().login, "octocat");
}

#[test]
fn test_stargazer_without_timestamp_is_rejected() {
    let json = r#"{"login": "octocat", "id": 1, "html_url": "https://github.com/octocat"}"#;
    assert!(serde_json::from_str::<Stargazer>(json).is_err());
}

#[test]
fn test_release_deserialization_defaults() {
    let json = r#"[
        {
            "tag_name": "v1.0.0",
            "assets": [{"name": "a.zip", "download_count": 3}, {"name": "b.zip"}]
        },
        {"tag_name": "v0.1.0"}
    ]"#;

    let releases: Vec<Release> = serde_json::from_str(json).unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].assets[1].download_count, 0);
    assert_eq!(releases[0].download_count(), 3);
    assert!(releases[1].assets.is_empty());
    assert_eq!(releases[1].download_count(), 0);
}
