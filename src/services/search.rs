// src/services/search.rs
// DOCUMENTATION: Text search over a category's locations

use crate::models::LocationRecord;

/// Keep records whose name, or description when present, contains `term`
/// ignoring case. Order is preserved; an empty term keeps everything.
pub fn filter_locations(records: &[LocationRecord], term: &str) -> Vec<LocationRecord> {
    if term.is_empty() {
        return records.to_vec();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches(record, &needle))
        .cloned()
        .collect()
}

fn matches(record: &LocationRecord, needle: &str) -> bool {
    let in_name = record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(needle));

    in_name
        || record
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str, name: Option<&str>, description: Option<&str>) -> LocationRecord {
        let mut record = LocationRecord::empty(id);
        record.name = name.map(str::to_string);
        record.description = description.map(str::to_string);
        record
    }

    fn sample() -> Vec<LocationRecord> {
        vec![
            place("itauna", Some("Praia de Itaúna"), Some("Ondas fortes, point do surf")),
            place("lagoa", Some("Lagoa de Saquarema"), None),
            place("vila", Some("Praia da Vila"), Some("Perto da igreja")),
            place("anon", None, Some("Trilha até o mirante")),
        ]
    }

    fn ids(records: &[LocationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_term_returns_everything_in_order() {
        assert_eq!(filter_locations(&sample(), ""), sample());
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let found = filter_locations(&sample(), "PRAIA");
        assert_eq!(ids(&found), vec!["itauna", "vila"]);
    }

    #[test]
    fn test_accented_text_matches_case_folded() {
        let found = filter_locations(&sample(), "ITAÚNA");
        assert_eq!(ids(&found), vec!["itauna"]);
    }

    #[test]
    fn test_description_match() {
        assert_eq!(ids(&filter_locations(&sample(), "surf")), vec!["itauna"]);
        assert_eq!(ids(&filter_locations(&sample(), "mirante")), vec!["anon"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_locations(&sample(), "museu").is_empty());
    }
}
