//! Rolling-window program store: one JSON document per day, written by the
//! upstream scraper, pruned here after the window slides past.

use crate::store::{read_json, DocumentStore, StoreError};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tv_annotate_models::{timefmt, BroadcastEntry, DaySchedule};

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ProgramWindow {
    store: Arc<dyn DocumentStore>,
}

impl ProgramWindow {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The dates covered by an `days`-wide window ending at `today`,
    /// oldest first.
    pub fn window_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
        (0..days as i64)
            .rev()
            .map(|back| today - Duration::days(back))
            .collect()
    }

    pub fn load_day(&self, date: NaiveDate) -> Result<Option<DaySchedule>, WindowError> {
        Ok(read_json(self.store.as_ref(), &day_doc(date))?)
    }

    /// Flatten one day's schedule into broadcast entries. Rows whose time
    /// field does not parse are dropped.
    pub fn day_broadcasts(&self, date: NaiveDate) -> Result<Vec<BroadcastEntry>, WindowError> {
        let Some(day) = self.load_day(date)? else {
            return Ok(Vec::new());
        };
        let mut broadcasts = Vec::new();
        for (channel_id, listing) in &day.programs {
            for row in &listing.programs {
                let Some(time) = timefmt::parse(&row.time) else {
                    debug!(
                        "Skipping row with unparseable time {:?} on {} {}",
                        row.time, channel_id, date
                    );
                    continue;
                };
                broadcasts.push(BroadcastEntry {
                    channel_id: listing.channel.id.clone(),
                    channel_name: listing.channel.name.clone(),
                    channel_icon: listing.channel.icon.clone(),
                    date,
                    time,
                    title: row.title.clone(),
                    // The scraper's concatenated fallback text stands in for
                    // a missing description so year extraction still works.
                    description: row.description.clone().or_else(|| row.full.clone()),
                });
            }
        }
        Ok(broadcasts)
    }

    /// Every broadcast in the window. Days that are missing or fail to parse
    /// are skipped with a warning; the window is best-effort by construction.
    pub fn collect(&self, today: NaiveDate, days: u32) -> Vec<BroadcastEntry> {
        let mut all = Vec::new();
        for date in Self::window_dates(today, days) {
            match self.day_broadcasts(date) {
                Ok(broadcasts) => all.extend(broadcasts),
                Err(e) => warn!("Skipping day {} in window scan: {}", date, e),
            }
        }
        all
    }

    /// Delete day documents older than the window. Documents whose name is
    /// not a date are left alone. Returns how many were removed.
    pub fn prune(&self, today: NaiveDate, days: u32) -> Result<usize, WindowError> {
        let cutoff = today - Duration::days(days as i64 - 1);
        let mut removed = 0;
        for name in self.store.list()? {
            let Some(date) = parse_day_doc(&name) else {
                continue;
            };
            if date < cutoff {
                self.store.delete(&name)?;
                info!("Deleted old program file: {}", name);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn day_doc(date: NaiveDate) -> String {
    format!("{}.json", date.format("%Y-%m-%d"))
}

fn parse_day_doc(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{write_json, FsDocumentStore};
    use std::collections::BTreeMap;
    use tv_annotate_models::{ChannelInfo, ChannelListing, DayMetadata, ProgramRow};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn day_with(rows: Vec<ProgramRow>) -> DaySchedule {
        let mut programs = BTreeMap::new();
        programs.insert(
            "bnt".to_string(),
            ChannelListing {
                channel: ChannelInfo {
                    id: "bnt".to_string(),
                    name: "БНТ 1".to_string(),
                    icon: Some("/logos/bnt.png".to_string()),
                },
                count: rows.len(),
                programs: rows,
            },
        );
        DaySchedule {
            metadata: DayMetadata::default(),
            programs,
        }
    }

    fn row(time: &str, title: &str) -> ProgramRow {
        ProgramRow {
            time: time.to_string(),
            title: title.to_string(),
            description: None,
            full: None,
        }
    }

    fn window(dir: &std::path::Path) -> ProgramWindow {
        ProgramWindow::new(Arc::new(FsDocumentStore::new(dir)))
    }

    #[test]
    fn test_window_dates_oldest_first() {
        let dates = ProgramWindow::window_dates(date("2025-02-07"), 7);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date("2025-02-01"));
        assert_eq!(dates[6], date("2025-02-07"));
    }

    #[test]
    fn test_day_broadcasts_flattens_and_skips_bad_times() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        let day = day_with(vec![
            row("20:00", "Гладиатор"),
            row("не е час", "Новини"),
        ]);
        write_json(&store, "2025-02-03.json", &day).unwrap();

        let window = window(dir.path());
        let broadcasts = window.day_broadcasts(date("2025-02-03")).unwrap();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].title, "Гладиатор");
        assert_eq!(broadcasts[0].channel_name, "БНТ 1");
        assert_eq!(broadcasts[0].date, date("2025-02-03"));
    }

    #[test]
    fn test_full_text_stands_in_for_missing_description() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        let mut r = row("20:00", "Гладиатор");
        r.full = Some("Гладиатор исторически, 2000".to_string());
        write_json(&store, "2025-02-03.json", &day_with(vec![r])).unwrap();

        let window = window(dir.path());
        let broadcasts = window.day_broadcasts(date("2025-02-03")).unwrap();
        assert_eq!(
            broadcasts[0].description.as_deref(),
            Some("Гладиатор исторически, 2000")
        );
    }

    #[test]
    fn test_collect_skips_missing_and_malformed_days() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        write_json(&store, "2025-02-06.json", &day_with(vec![row("20:00", "Гладиатор")]))
            .unwrap();
        store.write("2025-02-07.json", "{broken").unwrap();

        let window = window(dir.path());
        let broadcasts = window.collect(date("2025-02-07"), 7);
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].date, date("2025-02-06"));
    }

    #[test]
    fn test_prune_deletes_only_dated_files_past_the_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        for day in ["2025-01-25", "2025-02-01", "2025-02-07"] {
            write_json(&store, &format!("{}.json", day), &day_with(vec![])).unwrap();
        }
        write_json(&store, "exclusions.json", &Vec::<u8>::new()).unwrap();

        let window = window(dir.path());
        let removed = window.prune(date("2025-02-07"), 7).unwrap();
        assert_eq!(removed, 1);
        assert!(!store.exists("2025-01-25.json"));
        assert!(store.exists("2025-02-01.json"));
        assert!(store.exists("exclusions.json"));
    }
}
