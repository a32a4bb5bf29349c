//! Ordered application of literal replacement rules.

use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use itertools::Itertools;
use log::{info, warn};

use crate::{
    cli::ReplaceArgs,
    encoding, io_utils,
    rules::{ReplacementRule, RuleBook},
};

/// Counts for one rule that matched at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRule {
    pub search_text: String,
    pub replace_text: String,
    pub count: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplacementStats {
    pub total_replacements: usize,
    pub applied: Vec<AppliedRule>,
}

/// Applies enabled rules in `order` as literal, non-overlapping global
/// substitutions.
///
/// Counts are taken against the current content before each rule runs, so
/// a later rule sees (and may match) text produced by an earlier one.
/// Empty content or an empty rule list returns the input unchanged.
pub fn apply_rules(content: &str, rules: &[ReplacementRule]) -> (String, ReplacementStats) {
    let mut stats = ReplacementStats::default();
    if content.is_empty() || rules.is_empty() {
        return (content.to_string(), stats);
    }

    let mut processed = content.to_string();
    for rule in rules
        .iter()
        .filter(|rule| rule.is_enabled)
        .sorted_by_key(|rule| rule.order)
    {
        // Mutations reject empty search text; this guards against
        // hand-edited rule files.
        if rule.search_text.is_empty() {
            continue;
        }
        let count = processed.matches(rule.search_text.as_str()).count();
        if count == 0 {
            continue;
        }
        processed = processed.replace(&rule.search_text, &rule.replace_text);
        stats.total_replacements += count;
        stats.applied.push(AppliedRule {
            search_text: rule.search_text.clone(),
            replace_text: rule.replace_text.clone(),
            count,
        });
    }

    (processed, stats)
}

pub fn execute(args: &ReplaceArgs) -> Result<()> {
    let fallback = io_utils::resolve_encoding(
        args.fallback_encoding.as_deref(),
        encoding::default_fallback(),
    )?;
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output accepts a single input; use --output-dir for batches");
    }
    let book = RuleBook::load(&args.rules)
        .with_context(|| format!("Loading rules from {:?}", args.rules))?;
    if book.is_empty() {
        warn!("Rule file {:?} holds no rules", args.rules);
    }

    let mut failures = 0usize;
    for input in &args.inputs {
        if let Err(err) = replace_file(input, args, fallback, &book) {
            warn!("Failed to process '{}': {err:#}", input.display());
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} of {} file(s) failed", args.inputs.len());
    }
    Ok(())
}

fn replace_file(
    input: &Path,
    args: &ReplaceArgs,
    fallback: &'static Encoding,
    book: &RuleBook,
) -> Result<()> {
    let bytes = io_utils::read_bytes(input)?;
    let decoded = encoding::detect_and_decode(&bytes, fallback, args.min_confidence)
        .with_context(|| format!("Decoding {input:?}"))?;

    let (content, stats) = apply_rules(&decoded.text, book.rules());
    for applied in &stats.applied {
        info!(
            "  '{}' -> '{}': {} occurrence(s)",
            applied.search_text, applied.replace_text, applied.count
        );
    }

    let output = io_utils::resolve_output_path(
        input,
        args.output.as_deref(),
        args.output_dir.as_deref(),
        "replaced-",
    )?;
    io_utils::write_text(&output, &content, !args.no_bom)?;
    info!(
        "Applied {} replacement(s) to '{}' -> '{}'",
        stats.total_replacements,
        input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(search: &str, replace: &str, enabled: bool, order: usize) -> ReplacementRule {
        ReplacementRule {
            id: format!("rule-{order}"),
            search_text: search.to_string(),
            replace_text: replace.to_string(),
            is_enabled: enabled,
            order,
        }
    }

    #[test]
    fn later_rules_see_earlier_rules_output() {
        let rules = vec![rule("foo", "bar", true, 0), rule("bar", "baz", true, 1)];
        let (content, stats) = apply_rules("foo", &rules);
        assert_eq!(content, "baz");
        assert_eq!(stats.total_replacements, 2);
        assert_eq!(stats.applied.len(), 2);
        assert_eq!(stats.applied[0].count, 1);
        assert_eq!(stats.applied[1].count, 1);
    }

    #[test]
    fn rules_apply_in_order_not_list_position() {
        let rules = vec![rule("bar", "baz", true, 1), rule("foo", "bar", true, 0)];
        let (content, stats) = apply_rules("foo", &rules);
        assert_eq!(content, "baz");
        assert_eq!(stats.total_replacements, 2);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let rules = vec![rule("foo", "bar", false, 0)];
        let (content, stats) = apply_rules("foo foo", &rules);
        assert_eq!(content, "foo foo");
        assert_eq!(stats.total_replacements, 0);
    }

    #[test]
    fn zero_match_rules_are_omitted_from_stats() {
        let rules = vec![rule("missing", "x", true, 0), rule("a", "b", true, 1)];
        let (content, stats) = apply_rules("aaa", &rules);
        assert_eq!(content, "bbb");
        assert_eq!(stats.total_replacements, 3);
        assert_eq!(stats.applied.len(), 1);
        assert_eq!(stats.applied[0].search_text, "a");
    }

    #[test]
    fn search_text_is_literal_not_a_pattern() {
        let rules = vec![rule("a.c", "X", true, 0)];
        let (content, stats) = apply_rules("abc a.c", &rules);
        assert_eq!(content, "abc X");
        assert_eq!(stats.total_replacements, 1);
    }

    #[test]
    fn empty_replace_text_deletes_occurrences() {
        let rules = vec![rule("--", "", true, 0)];
        let (content, stats) = apply_rules("a--b--c", &rules);
        assert_eq!(content, "abc");
        assert_eq!(stats.total_replacements, 2);
    }

    #[test]
    fn empty_content_and_empty_rules_are_no_ops() {
        let rules = vec![rule("a", "b", true, 0)];
        let (content, stats) = apply_rules("", &rules);
        assert_eq!(content, "");
        assert_eq!(stats.total_replacements, 0);

        let (content, stats) = apply_rules("text", &[]);
        assert_eq!(content, "text");
        assert_eq!(stats.total_replacements, 0);
    }

    #[test]
    fn counts_are_non_overlapping() {
        let rules = vec![rule("aa", "b", true, 0)];
        let (content, stats) = apply_rules("aaaa", &rules);
        assert_eq!(content, "bb");
        assert_eq!(stats.total_replacements, 2);
    }
}
