use std::{collections::BTreeSet, fs, path::Path};

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timezone policy applied to every time-bucketed metric.
///
/// The statistics database stores epoch seconds in UTC; bucketing into
/// calendar days, weekdays and months happens after shifting by this
/// offset. One offset is used for all metrics so the 30-day window and the
/// year-in-review aggregates can never disagree about which day a session
/// belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimePolicy {
    /// Seconds east of UTC.
    pub utc_offset_secs: i32,
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self::local()
    }
}

impl TimePolicy {
    /// Policy matching the system timezone at the time of the call.
    pub fn local() -> Self {
        let offset = chrono::Local::now().offset().local_minus_utc();
        Self {
            utc_offset_secs: offset,
        }
    }

    pub fn utc() -> Self {
        Self { utc_offset_secs: 0 }
    }

    pub fn fixed(utc_offset_secs: i32) -> Self {
        Self { utc_offset_secs }
    }

    pub fn offset(&self) -> FixedOffset {
        // Guarded at construction sites; i32 seconds always fits a day.
        FixedOffset::east_opt(self.utc_offset_secs)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Today's calendar date under this policy.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset()).date_naive()
    }

    /// Current year under this policy.
    pub fn current_year(&self) -> i32 {
        use chrono::Datelike;
        self.today().year()
    }

    /// Convert a wall-clock datetime under this policy to epoch seconds.
    pub fn epoch_from_local(&self, local: NaiveDateTime) -> i64 {
        local.and_utc().timestamp() - i64::from(self.utc_offset_secs)
    }
}

/// Sentinel books excluded from every aggregate: reference manuals and
/// similar entries that carry activity data but are not actual reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionFilter {
    #[serde(default)]
    pub ids: BTreeSet<i64>,
    #[serde(default)]
    pub titles: BTreeSet<String>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            ids: BTreeSet::from([10]),
            titles: BTreeSet::from([
                "KOReader Quickstart Guide".to_string(),
                "Necroscope 003: Blutmesse".to_string(),
            ]),
        }
    }
}

impl ExclusionFilter {
    pub fn empty() -> Self {
        Self {
            ids: BTreeSet::new(),
            titles: BTreeSet::new(),
        }
    }

    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            titles: BTreeSet::new(),
        }
    }

    pub fn excludes_title(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Render a `NOT IN` predicate over the given id and title columns,
    /// returning the SQL fragment and its bind values. Always produces a
    /// valid boolean expression, `1=1` when the filter is empty.
    pub fn sql_predicate(
        &self,
        id_column: &str,
        title_column: &str,
    ) -> (String, Vec<rusqlite::types::Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if !self.ids.is_empty() {
            let marks = vec!["?"; self.ids.len()].join(", ");
            clauses.push(format!("{id_column} NOT IN ({marks})"));
            values.extend(self.ids.iter().map(|id| rusqlite::types::Value::from(*id)));
        }

        if !self.titles.is_empty() {
            let marks = vec!["?"; self.titles.len()].join(", ");
            clauses.push(format!("{title_column} NOT IN ({marks})"));
            values.extend(
                self.titles
                    .iter()
                    .map(|t| rusqlite::types::Value::from(t.clone())),
            );
        }

        if clauses.is_empty() {
            ("1=1".to_string(), values)
        } else {
            (clauses.join(" AND "), values)
        }
    }
}

/// User-tunable settings for the summary and utilities flows, persisted as
/// a JSON file next to the hosting application's data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub exclusions: ExclusionFilter,
    #[serde(default)]
    pub time: TimePolicy,
}

impl SummaryConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable as JSON.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|err| Error::validation(format!("failed to serialize config: {err}")))?;
        fs::write(path, serialized)
            .map_err(|err| Error::validation(format!("failed to write config: {err}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exclusions_cover_known_sentinels() {
        let filter = ExclusionFilter::default();
        assert!(filter.ids.contains(&10));
        assert!(filter.excludes_title("KOReader Quickstart Guide"));
    }

    #[test]
    fn empty_filter_renders_tautology() {
        let (sql, values) = ExclusionFilter::empty().sql_predicate("b.id", "b.title");
        assert_eq!(sql, "1=1");
        assert!(values.is_empty());
    }

    #[test]
    fn predicate_binds_one_value_per_entry() {
        let filter = ExclusionFilter::default();
        let (sql, values) = filter.sql_predicate("b.id", "b.title");
        assert!(sql.contains("b.id NOT IN (?)"));
        assert!(sql.contains("b.title NOT IN (?, ?)"));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn epoch_round_trips_through_offset() {
        let policy = TimePolicy::fixed(-5 * 3600);
        let local = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        let epoch = policy.epoch_from_local(local);
        // 19:30 EST is 00:30 UTC the next day.
        assert_eq!(epoch, local.and_utc().timestamp() + 5 * 3600);
    }

    #[test]
    fn config_load_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = SummaryConfig::load(&path);
        assert_eq!(config.exclusions, ExclusionFilter::default());
    }

    #[test]
    fn config_round_trips_through_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = SummaryConfig::default();
        config.time = TimePolicy::utc();
        config.exclusions = ExclusionFilter::with_ids([1, 3, 10]);
        config.save(&path).unwrap();

        let reloaded = SummaryConfig::load(&path);
        assert_eq!(reloaded.time.utc_offset_secs, 0);
        assert_eq!(reloaded.exclusions.ids.len(), 3);
    }
}
