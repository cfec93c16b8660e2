use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative star count at the moment a star was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarHistoryPoint {
    pub starred_at: DateTime<Utc>,
    pub count: u64,
}

/// Total release downloads observed by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    #[serde(with = "local_timestamp")]
    pub date: DateTime<FixedOffset>,
    pub count: u64,
}

impl DownloadRecord {
    /// Stamp `count` with the current local wall-clock time.
    pub fn now(count: u64) -> Self {
        Self {
            date: DateTime::<FixedOffset>::from(Local::now()),
            count,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.date.with_timezone(&Utc)
    }
}

/// History timestamps are ISO-8601 local times. Older files carry no offset, so
/// those are read back in the local time zone.
mod local_timestamp {
    use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date);
        }

        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(DateTime::<FixedOffset>::from)
    }
}

/// Parallel `dates` / `counts` arrays ready for plotting.
///
/// Both arrays always have the same length; dates are expected to be
/// non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    dates: Vec<DateTime<Utc>>,
    counts: Vec<u64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, u64)>,
    {
        let (dates, counts) = points.into_iter().unzip();
        Self { dates, counts }
    }

    pub fn from_star_history(history: &[StarHistoryPoint]) -> Self {
        Self::from_points(history.iter().map(|point| (point.starred_at, point.count)))
    }

    pub fn push(&mut self, date: DateTime<Utc>, count: u64) {
        self.dates.push(date);
        self.counts.push(count);
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<(DateTime<Utc>, u64)> {
        Some((*self.dates.first()?, *self.counts.first()?))
    }

    pub fn last(&self) -> Option<(DateTime<Utc>, u64)> {
        Some((*self.dates.last()?, *self.counts.last()?))
    }

    pub fn max_count(&self) -> Option<u64> {
        self.counts.iter().copied().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, u64)> + '_ {
        self.dates.iter().copied().zip(self.counts.iter().copied())
    }
}
