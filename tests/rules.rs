use csv_normalizer::{
    replace::apply_rules,
    rules::{RuleBook, RuleError},
};
use tempfile::tempdir;

#[test]
fn ordered_rules_chain_and_count_every_substitution() {
    let mut book = RuleBook::default();
    book.add("foo", "bar").unwrap();
    book.add("bar", "baz").unwrap();

    let (content, stats) = apply_rules("foo", book.rules());
    assert_eq!(content, "baz");
    assert_eq!(stats.total_replacements, 2);
    assert_eq!(stats.applied.len(), 2);
}

#[test]
fn duplicates_are_rejected_regardless_of_enabled_state() {
    let mut book = RuleBook::default();
    book.add("foo", "bar").unwrap();
    let id = book.rules()[0].id.clone();
    book.toggle(&id).unwrap();
    assert!(!book.rules()[0].is_enabled);

    assert_eq!(
        book.add("foo", "other"),
        Err(RuleError::DuplicateSearchText("foo".to_string()))
    );
    assert_eq!(book.len(), 1);
}

#[test]
fn empty_inputs_are_no_ops_with_zero_stats() {
    let mut book = RuleBook::default();
    book.add("a", "b").unwrap();

    let (content, stats) = apply_rules("", book.rules());
    assert_eq!(content, "");
    assert_eq!(stats.total_replacements, 0);
    assert!(stats.applied.is_empty());

    let (content, stats) = apply_rules("anything", &[]);
    assert_eq!(content, "anything");
    assert_eq!(stats.total_replacements, 0);
}

#[test]
fn moving_a_rule_changes_the_application_outcome() {
    let mut book = RuleBook::default();
    book.add("ab", "X").unwrap();
    book.add("b", "Y").unwrap();

    let (content, _) = apply_rules("ab", book.rules());
    assert_eq!(content, "X");

    book.move_rule(1, 0).unwrap();
    let (content, _) = apply_rules("ab", book.rules());
    // "b" now runs first, splitting the "ab" match.
    assert_eq!(content, "aY");
}

#[test]
fn the_book_survives_a_persistence_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("rules.json");

    let mut book = RuleBook::load_or_default(&path).unwrap();
    assert!(book.is_empty());
    book.add("検索", "置換").unwrap();
    book.add("foo", "").unwrap();
    book.toggle(&book.rules()[1].id.clone()).unwrap();
    book.save(&path).unwrap();

    let reloaded = RuleBook::load(&path).unwrap();
    assert_eq!(reloaded.rules(), book.rules());

    let (content, stats) = apply_rules("検索 foo", reloaded.rules());
    // The disabled second rule must not fire.
    assert_eq!(content, "置換 foo");
    assert_eq!(stats.total_replacements, 1);
}
