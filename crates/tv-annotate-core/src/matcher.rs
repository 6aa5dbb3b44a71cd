//! Title-to-film matching with release-year disambiguation.
//!
//! Two-stage design: a year found in the description is treated as ground
//! truth and filters the candidate set strictly; with no year available the
//! match succeeds only when the title is unique in the catalog. An
//! unresolvable ambiguity never silently resolves to an arbitrary candidate.

use crate::catalog::Catalog;
use crate::normalize::{extract_year, normalize, SuffixStripper};
use tv_annotate_config::MatchingConfig;
use tv_annotate_models::CatalogEntry;

/// Outcome of a match attempt. Absence of a match is a first-class value,
/// never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a> {
    NoMatch,
    Single(&'a CatalogEntry),
    Ambiguous(Vec<&'a CatalogEntry>),
}

impl<'a> MatchResult<'a> {
    pub fn single(&self) -> Option<&'a CatalogEntry> {
        match self {
            MatchResult::Single(entry) => Some(entry),
            _ => None,
        }
    }
}

pub struct Matcher<'a> {
    catalog: &'a Catalog,
    stripper: SuffixStripper,
    year_tolerance: u16,
}

impl<'a> Matcher<'a> {
    pub fn new(catalog: &'a Catalog, matching: &MatchingConfig) -> Self {
        Self {
            catalog,
            stripper: SuffixStripper::new(&matching.series_markers),
            year_tolerance: matching.year_tolerance,
        }
    }

    /// Match a broadcast title (plus optional description) against the
    /// catalog.
    pub fn find(&self, title: &str, description: Option<&str>) -> MatchResult<'a> {
        let base = self.stripper.strip(title);
        let key = normalize(base);
        if key.is_empty() {
            return MatchResult::NoMatch;
        }

        let candidates = self.catalog.lookup(&key);
        if candidates.is_empty() {
            return MatchResult::NoMatch;
        }

        match description.and_then(extract_year) {
            Some(described) => {
                // The year is a hard signal: filter strictly, no fallback to
                // the unique-title path when it contradicts every candidate.
                let filtered: Vec<&CatalogEntry> = candidates
                    .into_iter()
                    .filter(|entry| {
                        entry
                            .year
                            .map(|year| year.abs_diff(described) <= self.year_tolerance)
                            .unwrap_or(false)
                    })
                    .collect();
                Self::resolve(filtered)
            }
            None => Self::resolve(candidates),
        }
    }

    fn resolve(candidates: Vec<&'a CatalogEntry>) -> MatchResult<'a> {
        match candidates.len() {
            0 => MatchResult::NoMatch,
            1 => MatchResult::Single(candidates[0]),
            _ => MatchResult::Ambiguous(candidates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn entry(id: &str, title_en: &str, title_bg: Option<&str>, year: Option<u16>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title_en: title_en.to_string(),
            title_bg: title_bg.map(String::from),
            year,
            tmdb_id: None,
            poster_path: None,
            overview: None,
            winner_categories: BTreeSet::new(),
            nominee_categories: BTreeSet::from(["BEST PICTURE".to_string()]),
        }
    }

    fn wild_heart_catalog() -> Catalog {
        Catalog::from_entries(vec![
            entry("m1", "Wild Heart", Some("Диво сърце"), Some(1990)),
            entry("m2", "Wild Heart", Some("Диво сърце"), Some(2023)),
        ])
    }

    fn matcher(catalog: &Catalog) -> Matcher<'_> {
        Matcher::new(catalog, &MatchingConfig::default())
    }

    #[test]
    fn test_year_disambiguates_shared_title() {
        let catalog = wild_heart_catalog();
        let matcher = matcher(&catalog);

        let result = matcher.find("Wild Heart", Some("драма от 1990 г."));
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m1"));

        let result = matcher.find("Wild Heart", Some("римейк, 2023"));
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m2"));
    }

    #[test]
    fn test_no_year_with_shared_title_is_ambiguous() {
        let catalog = wild_heart_catalog();
        let matcher = matcher(&catalog);
        match matcher.find("Wild Heart", Some("no year here")) {
            MatchResult::Ambiguous(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_contradicting_year_is_a_hard_no_match() {
        let catalog = wild_heart_catalog();
        let matcher = matcher(&catalog);
        assert_eq!(
            matcher.find("Wild Heart", Some("... 1975 ...")),
            MatchResult::NoMatch
        );
    }

    #[test]
    fn test_unique_title_matches_without_year() {
        let catalog = Catalog::from_entries(vec![entry(
            "m1",
            "Gladiator",
            Some("Гладиатор"),
            Some(2000),
        )]);
        let matcher = matcher(&catalog);
        let result = matcher.find("Гладиатор", None);
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_unknown_title_is_no_match() {
        let catalog = wild_heart_catalog();
        let matcher = matcher(&catalog);
        assert_eq!(matcher.find("Непозната лента", None), MatchResult::NoMatch);
        assert_eq!(matcher.find("?!", None), MatchResult::NoMatch);
    }

    #[test]
    fn test_matching_is_punctuation_and_case_insensitive() {
        let catalog = wild_heart_catalog();
        let matcher = matcher(&catalog);
        let result = matcher.find("ДИВО, СЪРЦЕ!", Some("1990"));
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_series_suffix_is_stripped_before_matching() {
        let catalog = Catalog::from_entries(vec![entry(
            "m1",
            "Gladiator",
            Some("Гладиатор"),
            Some(2000),
        )]);
        let matcher = matcher(&catalog);
        let result = matcher.find("Гладиатор, Сезон 2, Епизод 7", None);
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_duplicate_same_year_entries_stay_ambiguous() {
        let catalog = Catalog::from_entries(vec![
            entry("m1", "Wild Heart", None, Some(1990)),
            entry("m2", "Wild Heart", None, Some(1990)),
        ]);
        let matcher = matcher(&catalog);
        match matcher.find("Wild Heart", Some("1990")) {
            MatchResult::Ambiguous(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_year_tolerance_widens_the_window() {
        let catalog = wild_heart_catalog();
        let config = MatchingConfig {
            year_tolerance: 1,
            ..MatchingConfig::default()
        };
        let matcher = Matcher::new(&catalog, &config);
        let result = matcher.find("Wild Heart", Some("издаден 1991"));
        assert_eq!(result.single().map(|e| e.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_entry_without_year_cannot_confirm_a_described_year() {
        let catalog = Catalog::from_entries(vec![entry("m1", "Wild Heart", None, None)]);
        let matcher = matcher(&catalog);
        assert_eq!(
            matcher.find("Wild Heart", Some("1990")),
            MatchResult::NoMatch
        );
        // Without a described year the unique entry still matches
        assert!(matcher.find("Wild Heart", None).single().is_some());
    }
}
