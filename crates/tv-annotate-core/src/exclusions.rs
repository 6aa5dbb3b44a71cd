//! Persisted exclusion rules with scope-indexed lookups.
//!
//! Rules live as one ordered JSON document in the backing store; in memory
//! they are additionally indexed per scope so an exclusion check is an O(1)
//! set probe instead of a scan over all rules. Mutations persist the full
//! document before returning, so a caller re-querying right after `add` or
//! `remove` always sees its own write.

use crate::normalize::normalize;
use crate::store::{read_json, write_json, DocumentStore, StoreError};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tv_annotate_models::{ExclusionRule, ExclusionScope};

#[derive(Debug, thiserror::Error)]
pub enum ExclusionError {
    #[error("exclusion store failure: {0}")]
    Store(#[from] StoreError),
    #[error("invalid exclusion rule: {0}")]
    InvalidRule(String),
}

/// Result of a remove attempt. A missing rule is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

/// Scope-determining identity of a rule: what `add` dedupes on and what
/// `remove` selects by. The free-text description takes no part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RuleKey {
    Broadcast(String, NaiveDate, NaiveTime, String),
    Channel(String, String),
    Global(String),
}

impl RuleKey {
    fn of(rule: &ExclusionRule) -> Result<Self, ExclusionError> {
        let key = normalize(&rule.title);
        if key.is_empty() {
            return Err(ExclusionError::InvalidRule(
                "title normalizes to an empty key".to_string(),
            ));
        }
        match rule.scope {
            ExclusionScope::Broadcast => {
                let channel = rule.channel_id.clone().ok_or_else(|| {
                    ExclusionError::InvalidRule("broadcast scope requires channel_id".to_string())
                })?;
                let date = rule.date.ok_or_else(|| {
                    ExclusionError::InvalidRule("broadcast scope requires date".to_string())
                })?;
                let time = rule.time.ok_or_else(|| {
                    ExclusionError::InvalidRule("broadcast scope requires time".to_string())
                })?;
                Ok(RuleKey::Broadcast(channel, date, time, key))
            }
            ExclusionScope::Channel => {
                let channel = rule.channel_id.clone().ok_or_else(|| {
                    ExclusionError::InvalidRule("channel scope requires channel_id".to_string())
                })?;
                Ok(RuleKey::Channel(channel, key))
            }
            ExclusionScope::Global => Ok(RuleKey::Global(key)),
        }
    }
}

struct State {
    rules: Vec<ExclusionRule>,
    index: HashSet<RuleKey>,
}

pub struct ExclusionStore {
    store: Arc<dyn DocumentStore>,
    doc_name: String,
    state: Mutex<State>,
}

impl ExclusionStore {
    /// Open the store, loading any persisted rules. Rules that fail scope
    /// validation are kept in the document (and in `list`) but logged and
    /// left out of the lookup index.
    pub fn open(store: Arc<dyn DocumentStore>, doc_name: &str) -> Result<Self, ExclusionError> {
        let rules: Vec<ExclusionRule> =
            read_json(store.as_ref(), doc_name)?.unwrap_or_default();

        let mut index = HashSet::new();
        for rule in &rules {
            match RuleKey::of(rule) {
                Ok(key) => {
                    index.insert(key);
                }
                Err(e) => warn!("Skipping unindexable exclusion rule for {:?}: {}", rule.title, e),
            }
        }
        info!("Loaded {} exclusion rules from {}", rules.len(), doc_name);

        Ok(Self {
            store,
            doc_name: doc_name.to_string(),
            state: Mutex::new(State { rules, index }),
        })
    }

    /// Append a rule. Adding an equivalent rule again is a no-op.
    pub fn add(&self, rule: ExclusionRule) -> Result<(), ExclusionError> {
        let key = RuleKey::of(&rule)?;
        let mut state = self.lock();
        if state.index.contains(&key) {
            return Ok(());
        }

        let mut rules = state.rules.clone();
        rules.push(rule);
        write_json(self.store.as_ref(), &self.doc_name, &rules)?;

        state.rules = rules;
        state.index.insert(key);
        Ok(())
    }

    /// Remove the first rule matching `rule`'s scope-determining fields.
    pub fn remove(&self, rule: &ExclusionRule) -> Result<Removal, ExclusionError> {
        let key = RuleKey::of(rule)?;
        let mut state = self.lock();

        let position = state
            .rules
            .iter()
            .position(|existing| RuleKey::of(existing).ok().as_ref() == Some(&key));
        let Some(position) = position else {
            return Ok(Removal::NotFound);
        };

        let mut rules = state.rules.clone();
        rules.remove(position);
        write_json(self.store.as_ref(), &self.doc_name, &rules)?;

        state.rules = rules;
        state.index.remove(&key);
        Ok(Removal::Removed)
    }

    /// All persisted rules in insertion order.
    pub fn list(&self) -> Vec<ExclusionRule> {
        self.lock().rules.clone()
    }

    /// Whether any rule suppresses `title` for this airing. Broadcast scope
    /// is probed first, then channel, then global; any hit short-circuits.
    pub fn is_excluded(
        &self,
        title: &str,
        channel_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> bool {
        let key = normalize(title);
        if key.is_empty() {
            return false;
        }
        let state = self.lock();
        state.index.contains(&RuleKey::Broadcast(
            channel_id.to_string(),
            date,
            time,
            key.clone(),
        )) || state
            .index
            .contains(&RuleKey::Channel(channel_id.to_string(), key.clone()))
            || state.index.contains(&RuleKey::Global(key))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // Lock poisoning only happens if a holder panicked; the state itself
        // is always left consistent (write-then-commit), so continue.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FsDocumentStore;
    use chrono::{NaiveDate, NaiveTime};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn open_store(dir: &std::path::Path) -> ExclusionStore {
        let store = Arc::new(FsDocumentStore::new(dir));
        ExclusionStore::open(store, "exclusions.json").unwrap()
    }

    #[test]
    fn test_channel_scope_covers_all_airings_on_that_channel() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .add(ExclusionRule::channel("Гладиатор", "bnt"))
            .unwrap();

        assert!(store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("20:00")));
        assert!(store.is_excluded("Гладиатор", "bnt", date("2025-02-05"), time("09:15")));
        assert!(!store.is_excluded("Гладиатор", "nova", date("2025-02-03"), time("20:00")));
    }

    #[test]
    fn test_broadcast_scope_covers_exactly_one_airing() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .add(ExclusionRule::broadcast(
                "Гладиатор",
                "bnt",
                date("2025-02-03"),
                time("20:00"),
            ))
            .unwrap();

        assert!(store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("20:00")));
        assert!(!store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("22:30")));
        assert!(!store.is_excluded("Гладиатор", "bnt", date("2025-02-04"), time("20:00")));
    }

    #[test]
    fn test_global_scope_covers_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.add(ExclusionRule::global("Гладиатор")).unwrap();

        assert!(store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("20:00")));
        assert!(store.is_excluded("ГЛАДИАТОР!", "nova", date("2025-01-01"), time("06:00")));
        assert!(!store.is_excluded("Титаник", "bnt", date("2025-02-03"), time("20:00")));
    }

    #[test]
    fn test_add_is_idempotent_and_ignores_description() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .add(ExclusionRule::channel("Гладиатор", "bnt").with_description("повторение"))
            .unwrap();
        store
            .add(ExclusionRule::channel("Гладиатор", "bnt").with_description("друг текст"))
            .unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_remove_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert_eq!(
            store.remove(&ExclusionRule::global("Гладиатор")).unwrap(),
            Removal::NotFound
        );

        store.add(ExclusionRule::global("Гладиатор")).unwrap();
        assert_eq!(
            store.remove(&ExclusionRule::global("гладиатор")).unwrap(),
            Removal::Removed
        );
        assert!(!store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("20:00")));
    }

    #[test]
    fn test_rules_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.add(ExclusionRule::global("Гладиатор")).unwrap();
            store
                .add(ExclusionRule::channel("Титаник", "nova").with_description("сериал"))
                .unwrap();
        }

        let reopened = open_store(dir.path());
        let rules = reopened.list();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].title, "Гладиатор");
        assert!(reopened.is_excluded("Титаник", "nova", date("2025-03-01"), time("21:00")));
    }

    #[test]
    fn test_scope_validation() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        let mut rule = ExclusionRule::global("Гладиатор");
        rule.scope = ExclusionScope::Channel;
        assert!(matches!(
            store.add(rule),
            Err(ExclusionError::InvalidRule(_))
        ));

        let mut rule = ExclusionRule::channel("Гладиатор", "bnt");
        rule.scope = ExclusionScope::Broadcast;
        assert!(matches!(
            store.add(rule),
            Err(ExclusionError::InvalidRule(_))
        ));

        assert!(matches!(
            store.add(ExclusionRule::global("?!")),
            Err(ExclusionError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_broadcast_and_channel_scopes_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .add(ExclusionRule::broadcast(
                "Гладиатор",
                "bnt",
                date("2025-02-03"),
                time("20:00"),
            ))
            .unwrap();

        // Removing at channel scope does not touch the broadcast rule
        assert_eq!(
            store
                .remove(&ExclusionRule::channel("Гладиатор", "bnt"))
                .unwrap(),
            Removal::NotFound
        );
        assert!(store.is_excluded("Гладиатор", "bnt", date("2025-02-03"), time("20:00")));
    }
}
