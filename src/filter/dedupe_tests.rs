//! Tests for filter deduplication.

use crate::config::FilterEntry;

use super::dedupe;

fn entry(id: i64, url: &str) -> FilterEntry {
    FilterEntry::new(id, url, format!("filter {id}"), true)
}

fn urls(entries: &[FilterEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.url.as_str()).collect()
}

#[test]
fn keeps_first_occurrence_in_order() {
    let input = vec![
        entry(1, "A"),
        entry(2, "B"),
        entry(3, "A"),
        entry(4, "C"),
        entry(5, "B"),
    ];

    let result = dedupe(input);

    assert_eq!(urls(&result.kept), vec!["A", "B", "C"]);
    let kept_ids: Vec<i64> = result.kept.iter().map(|e| e.id).collect();
    assert_eq!(kept_ids, vec![1, 2, 4]);
}

#[test]
fn reports_dropped_duplicates_in_input_order() {
    let result = dedupe(vec![
        entry(1, "A"),
        entry(2, "B"),
        entry(3, "A"),
        entry(4, "B"),
    ]);

    let dropped_ids: Vec<i64> = result.dropped.iter().map(|e| e.id).collect();
    assert_eq!(dropped_ids, vec![3, 4]);
}

#[test]
fn first_occurrence_wins_even_with_different_metadata() {
    let mut later = entry(2, "A");
    later.enabled = false;
    later.name = "renamed".to_string();

    let result = dedupe(vec![entry(1, "A"), later]);

    assert_eq!(result.kept.len(), 1);
    assert!(result.kept[0].enabled);
    assert_eq!(result.kept[0].name, "filter 1");
}

#[test]
fn unique_input_is_unchanged() {
    let input = vec![entry(1, "A"), entry(2, "B"), entry(3, "C")];
    let result = dedupe(input.clone());

    assert_eq!(result.kept, input);
    assert!(result.dropped.is_empty());
}

#[test]
fn empty_input() {
    let result = dedupe(Vec::new());
    assert!(result.kept.is_empty());
    assert!(result.dropped.is_empty());
}

#[test]
fn output_has_one_entry_per_distinct_url() {
    let input: Vec<FilterEntry> = (0..40)
        .map(|i| entry(i, &format!("url-{}", i % 7)))
        .collect();

    let result = dedupe(input);

    assert_eq!(result.kept.len(), 7);
    assert_eq!(result.dropped.len(), 33);
    let expected: Vec<String> = (0..7).map(|i| format!("url-{i}")).collect();
    assert_eq!(urls(&result.kept), expected);
}
