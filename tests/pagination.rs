mod common;

use common::{release, stargazer, stargazers_from, ts, ScriptedPages};
use github_stats_graph::error::StatsError;
use github_stats_graph::github::{
    fetch_star_history, fetch_total_downloads, star_history_from_samples, sum_release_downloads,
    walk_pages, PER_PAGE,
};
use proptest::prelude::*;

#[tokio::test]
async fn test_walk_stops_on_short_page() {
    let source = ScriptedPages::new(vec![vec![0u8; 100], vec![0u8; 100], vec![0u8; 40]]);

    let mut seen = 0;
    let walk = walk_pages(&source, |page| seen += page.len())
        .await
        .expect("walk failed");

    assert_eq!(source.calls(), 3);
    assert_eq!(walk.pages, 3);
    assert_eq!(walk.items, 240);
    assert_eq!(seen, 240);
}

#[tokio::test]
async fn test_walk_stops_on_empty_page() {
    let source = ScriptedPages::new(vec![vec![1u8; 100], vec![]]);

    let walk = walk_pages(&source, |_| {}).await.expect("walk failed");

    assert_eq!(source.calls(), 2);
    assert_eq!(walk.items, 100);
}

#[tokio::test]
async fn test_walk_of_empty_collection() {
    let source: ScriptedPages<u8> = ScriptedPages::new(vec![]);

    let mut pages_seen = 0;
    let walk = walk_pages(&source, |_| pages_seen += 1).await.expect("walk failed");

    assert_eq!(source.calls(), 1);
    assert_eq!(walk.items, 0);
    assert_eq!(pages_seen, 0);
}

#[tokio::test]
async fn test_walk_aborts_on_error() {
    let source =
        ScriptedPages::new(vec![vec![1u8; 100], vec![1u8; 100], vec![1u8; 5]]).failing_on(2);

    let result = walk_pages(&source, |_| {}).await;

    assert!(matches!(result, Err(StatsError::ApiError(_))));
    assert_eq!(source.calls(), 2);
}

#[test]
fn test_page_size() {
    assert_eq!(PER_PAGE, 100);
}

#[test]
fn test_download_aggregation() {
    let releases = vec![release("v1.0.0", &[3, 7]), release("v0.9.0", &[])];
    assert_eq!(sum_release_downloads(&releases), 10);
}

#[tokio::test]
async fn test_fetch_total_downloads_across_pages() {
    let mut first_page: Vec<_> = (0..100).map(|i| release(&format!("v{}", i), &[1])).collect();
    first_page[0] = release("v0", &[3, 7]);
    let source = ScriptedPages::new(vec![
        first_page,
        vec![release("old", &[]), release("older", &[5])],
    ]);

    let total = fetch_total_downloads(&source).await.expect("fetch failed");

    assert_eq!(source.calls(), 2);
    assert_eq!(total, 10 + 99 + 5);
}

#[tokio::test]
async fn test_fetch_star_history_sorts_and_ranks() {
    let source = ScriptedPages::new(vec![vec![
        stargazer(ts(2024, 3, 1)),
        stargazer(ts(2024, 1, 1)),
        stargazer(ts(2024, 2, 1)),
    ]]);

    let history = fetch_star_history(&source).await.expect("fetch failed");

    let dates: Vec<_> = history.iter().map(|p| p.starred_at).collect();
    let counts: Vec<_> = history.iter().map(|p| p.count).collect();
    assert_eq!(dates, vec![ts(2024, 1, 1), ts(2024, 2, 1), ts(2024, 3, 1)]);
    assert_eq!(counts, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_fetch_star_history_multiple_pages() {
    let source = ScriptedPages::new(vec![
        stargazers_from(ts(2023, 1, 1), 100),
        stargazers_from(ts(2023, 6, 1), 100),
        stargazers_from(ts(2024, 1, 1), 17),
    ]);

    let history = fetch_star_history(&source).await.expect("fetch failed");

    assert_eq!(source.calls(), 3);
    assert_eq!(history.len(), 217);
    assert_eq!(history.last().map(|p| p.count), Some(217));
}

#[test]
fn test_star_history_empty() {
    assert!(star_history_from_samples(Vec::new()).is_empty());
}

proptest! {
    #[test]
    fn prop_star_ranks_strictly_increase(
        offsets in proptest::collection::vec(0i64..1_000_000, 0..300)
    ) {
        let samples: Vec<_> = offsets
            .iter()
            .map(|&secs| ts(2020, 1, 1) + chrono::Duration::seconds(secs))
            .collect();

        let history = star_history_from_samples(samples.clone());

        prop_assert_eq!(history.len(), samples.len());
        for pair in history.windows(2) {
            prop_assert!(pair[0].count < pair[1].count);
            prop_assert!(pair[0].starred_at <= pair[1].starred_at);
        }
        if let Some(first) = history.first() {
            prop_assert_eq!(first.count, 1);
        }
    }

    #[test]
    fn prop_walk_fetches_until_short_page(full_pages in 0usize..5, tail in 0usize..100) {
        let mut pages = vec![vec![0u8; 100]; full_pages];
        pages.push(vec![0u8; tail]);
        let source = ScriptedPages::new(pages);

        let walk = tokio_test::block_on(walk_pages(&source, |_| {})).unwrap();

        prop_assert_eq!(source.calls() as usize, full_pages + 1);
        prop_assert_eq!(walk.items, full_pages * 100 + tail);
    }
}
