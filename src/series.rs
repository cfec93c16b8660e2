use crate::models::{DownloadRecord, Series};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Turn the download history into a plottable series.
///
/// When `first_star` predates every record, a `(first_star, 0)` point is put
/// in front so the curve starts from zero instead of mid-air. With no records
/// at all the series is just that anchor, or empty without one.
///
/// Records are ordered by timestamp first; the sort is stable so records with
/// equal stamps keep their file order.
pub fn build_download_series(
    history: &[DownloadRecord],
    first_star: Option<DateTime<Utc>>,
) -> Series {
    let mut points: Vec<(DateTime<Utc>, u64)> = history
        .iter()
        .map(|record| (record.timestamp(), record.count))
        .collect();

    if points.windows(2).any(|pair| pair[0].0 > pair[1].0) {
        warn!("Download history is out of chronological order, sorting it");
        points.sort_by_key(|(date, _)| *date);
    }

    match (points.first(), first_star) {
        (Some(&(earliest, _)), Some(anchor)) if anchor < earliest => {
            points.insert(0, (anchor, 0));
        }
        (None, Some(anchor)) => points.push((anchor, 0)),
        _ => {}
    }

    Series::from_points(points)
}
