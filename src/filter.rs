// 🔎 Filter Engine
// Exclusion predicates over parsed entries. An entry is dropped if any
// active predicate matches; input order is preserved.

use crate::config::ProcessingTime;
use crate::entry::{Entry, EntryType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Drop entries without an accurate location
    pub accurate_only: bool,
    pub exclude_stolen: bool,
    pub exclude_found: bool,
    pub exclude_sighting: bool,
    pub exclude_burnt: bool,
    /// Maximum age in days; 0 disables the check
    pub max_age_days: u32,
}

impl FilterConfig {
    /// True if `entry_type` is switched off
    pub fn excludes_type(&self, entry_type: EntryType) -> bool {
        match entry_type {
            EntryType::Stolen => self.exclude_stolen,
            EntryType::Found => self.exclude_found,
            EntryType::Sighting => self.exclude_sighting,
            EntryType::Burnt => self.exclude_burnt,
            EntryType::Unknown => false,
        }
    }

    /// True if any active predicate matches `entry`
    pub fn excludes(&self, entry: &Entry, now: ProcessingTime) -> bool {
        if self.accurate_only && !entry.accurate() {
            return true;
        }

        if self.excludes_type(entry.entry_type()) {
            return true;
        }

        self.max_age_days > 0 && now.age_days(entry.date()) > i64::from(self.max_age_days)
    }
}

/// Keep the entries `config` does not exclude, in input order
pub fn apply<'a>(entries: &'a [Entry], config: &FilterConfig, now: ProcessingTime) -> Vec<&'a Entry> {
    let kept: Vec<&Entry> = entries
        .iter()
        .filter(|e| !config.excludes(e, now))
        .collect();

    tracing::info!(
        kept = kept.len(),
        dropped = entries.len() - kept.len(),
        "filtered reports"
    );

    kept
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> ProcessingTime {
        ProcessingTime::on(date(2024, 6, 15))
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new(2, date(2024, 6, 10), 1.0, 2.0, true, EntryType::Stolen),
            Entry::new(3, date(2024, 1, 1), 1.0, 2.0, false, EntryType::Found),
            Entry::new(4, date(2023, 6, 15), 1.0, 2.0, true, EntryType::Sighting),
            Entry::new(5, date(2024, 6, 15), 1.0, 2.0, false, EntryType::Burnt),
            Entry::new(6, date(2020, 2, 2), 1.0, 2.0, true, EntryType::Unknown),
        ]
    }

    fn lines(entries: &[&Entry]) -> Vec<u64> {
        entries.iter().map(|e| e.line()).collect()
    }

    #[test]
    fn test_default_config_keeps_everything() {
        let entries = sample();
        let config = FilterConfig::default();

        assert_eq!(lines(&apply(&entries, &config, now())), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_accurate_only() {
        let entries = sample();
        let config = FilterConfig {
            accurate_only: true,
            ..Default::default()
        };

        let kept = apply(&entries, &config, now());
        assert!(kept.iter().all(|e| e.accurate()));
        assert_eq!(lines(&kept), vec![2, 4, 6]);
    }

    #[test]
    fn test_type_exclusions() {
        let entries = sample();
        let config = FilterConfig {
            exclude_stolen: true,
            exclude_burnt: true,
            ..Default::default()
        };

        assert_eq!(lines(&apply(&entries, &config, now())), vec![3, 4, 6]);
    }

    #[test]
    fn test_unknown_is_never_excluded_by_type() {
        let config = FilterConfig {
            exclude_stolen: true,
            exclude_found: true,
            exclude_sighting: true,
            exclude_burnt: true,
            ..Default::default()
        };

        let entries = sample();
        assert_eq!(lines(&apply(&entries, &config, now())), vec![6]);
    }

    #[test]
    fn test_max_age_days() {
        let entries = sample();
        let config = FilterConfig {
            max_age_days: 30,
            ..Default::default()
        };

        assert_eq!(lines(&apply(&entries, &config, now())), vec![2, 5]);
    }

    #[test]
    fn test_max_age_boundary_is_inclusive() {
        let entry = Entry::new(2, date(2024, 5, 16), 1.0, 2.0, true, EntryType::Stolen);
        let config = FilterConfig {
            max_age_days: 30,
            ..Default::default()
        };

        assert!(!config.excludes(&entry, now()));
        let older = Entry::new(3, date(2024, 5, 15), 1.0, 2.0, true, EntryType::Stolen);
        assert!(config.excludes(&older, now()));
    }

    #[test]
    fn test_zero_days_is_no_age_filter() {
        let entries = sample();
        let with_zero = FilterConfig {
            accurate_only: true,
            max_age_days: 0,
            ..Default::default()
        };
        let without = FilterConfig {
            accurate_only: true,
            ..Default::default()
        };

        assert_eq!(
            lines(&apply(&entries, &with_zero, now())),
            lines(&apply(&entries, &without, now()))
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let entries = sample();
        let configs = [
            FilterConfig::default(),
            FilterConfig {
                accurate_only: true,
                exclude_found: true,
                ..Default::default()
            },
            FilterConfig {
                exclude_sighting: true,
                max_age_days: 200,
                ..Default::default()
            },
        ];

        for config in &configs {
            let once: Vec<Entry> = apply(&entries, config, now()).into_iter().cloned().collect();
            let twice: Vec<Entry> = apply(&once, config, now()).into_iter().cloned().collect();
            assert_eq!(once, twice);
        }
    }
}
