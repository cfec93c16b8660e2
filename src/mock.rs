//! Synthetic chart data for trying the renderer without touching GitHub.

use crate::models::Series;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

pub const MOCK_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct MockData {
    pub stars: Series,
    pub downloads: Series,
}

impl MockData {
    pub fn generate(rng: &mut fastrand::Rng) -> Self {
        Self::generate_at(rng, Utc::now())
    }

    /// One star sample per day over the last year, never decreasing, and a
    /// two-point download series from zero to a random total.
    pub fn generate_at(rng: &mut fastrand::Rng, now: DateTime<Utc>) -> Self {
        info!("Generating MOCK data...");
        let start = now - Duration::days(MOCK_DAYS);

        let mut stars = Series::new();
        let mut current = 0u64;
        for day in 0..MOCK_DAYS {
            if rng.bool() {
                current += rng.u64(0..=5);
            }
            stars.push(start + Duration::days(day), current);
        }

        let downloads = Series::from_points([(start, 0), (now, rng.u64(1000..=5000))]);

        MockData { stars, downloads }
    }
}
