//! Per-row reordering of question group contents into canonical slots.
//!
//! Survey exports list each respondent's questions in whatever order they
//! were answered, so the group holding question 10 may sit in the columns
//! of group 1 on one row and group 3 on the next. Reordering keeps the
//! group *columns* where the header put them and permutes the group
//! *contents* of every data row so the numerically smallest question id
//! lands in the lowest-numbered group's columns.

use std::{cmp::Ordering, path::Path};

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::{info, warn};
use thiserror::Error;

use crate::{
    cli::ReorderArgs,
    encoding,
    groups::{self, GroupColumns, GroupLayout},
    io_utils, layout, replace,
    rules::RuleBook,
    serialize, tokenize,
};

/// Why a file was passed through unmodified. Soft-fail, not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("content is empty")]
    EmptyContent,
    #[error("header has no question group columns")]
    NoQuestionGroups,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReorderOutcome {
    Reordered { data_rows: usize, groups: usize },
    Unchanged(SkipReason),
}

/// Runs the full reorder pipeline over decoded text.
///
/// Detects BOM/newline/trailing-newline, tokenizes, resolves groups from
/// the header, reorders every data row, and serializes back in the
/// detected layout. On a skip the input text is returned unchanged.
pub fn reorder_content(content: &str) -> (String, ReorderOutcome) {
    if content.is_empty() {
        return (
            content.to_string(),
            ReorderOutcome::Unchanged(SkipReason::EmptyContent),
        );
    }

    let (text_layout, body) = layout::detect(content);
    let rows = tokenize::parse_rows(body);
    // The tokenizer always yields at least one row.
    let Some(group_layout) = groups::resolve(&rows[0]) else {
        return (
            content.to_string(),
            ReorderOutcome::Unchanged(SkipReason::NoQuestionGroups),
        );
    };

    let reordered = reorder_rows(&rows, &group_layout);
    let outcome = ReorderOutcome::Reordered {
        data_rows: reordered.len().saturating_sub(1),
        groups: group_layout.groups.len(),
    };
    let body = serialize::serialize_rows(
        &reordered,
        text_layout.newline.as_str(),
        text_layout.trailing_newline,
    );
    (text_layout.finish(body), outcome)
}

/// Reorders the data rows of a table; the header row passes through.
pub fn reorder_rows(rows: &[Vec<String>], group_layout: &GroupLayout) -> Vec<Vec<String>> {
    let header = &rows[0];
    let slots = canonical_slots(group_layout);

    let mut output = Vec::with_capacity(rows.len());
    output.push(header.clone());
    for row in &rows[1..] {
        output.push(reorder_row(row, header.len(), group_layout, &slots));
    }
    output
}

/// Group column sets in canonical order: ascending by numeric group
/// number, restricted to groups that have a question-id column.
fn canonical_slots(group_layout: &GroupLayout) -> Vec<GroupColumns> {
    let mut numbered = group_layout.question_id_columns.clone();
    numbered.sort_by(|a, b| numeric_order(&a.0, &b.0));
    numbered
        .into_iter()
        .filter_map(|(number, _)| {
            group_layout
                .groups
                .iter()
                .find(|group| group.number == number)
                .map(|group| group.columns)
        })
        .collect()
}

struct GroupValues {
    question_id: String,
    question_title: String,
    answer_id: String,
    answer: String,
}

fn reorder_row(
    row: &[String],
    width: usize,
    group_layout: &GroupLayout,
    slots: &[GroupColumns],
) -> Vec<String> {
    let mut output = vec![String::new(); width];

    for &index in &group_layout.passthrough {
        output[index] = cell(row, Some(index)).to_string();
    }

    // Populated groups only: an empty question-id cell means the group
    // carries no data on this row.
    let mut values: Vec<GroupValues> = group_layout
        .groups
        .iter()
        .filter(|group| !cell(row, group.columns.question_id).is_empty())
        .map(|group| GroupValues {
            question_id: cell(row, group.columns.question_id).to_string(),
            question_title: cell(row, group.columns.question_title).to_string(),
            answer_id: cell(row, group.columns.answer_id).to_string(),
            answer: cell(row, group.columns.answer).to_string(),
        })
        .collect();

    // Stable sort: equal or unparseable ids keep group encounter order.
    values.sort_by(|a, b| numeric_order(&a.question_id, &b.question_id));

    // Excess groups beyond the slot count are dropped; unfilled trailing
    // slots stay empty.
    for (group_values, columns) in values.into_iter().zip(slots.iter()) {
        if let Some(index) = columns.question_id {
            output[index] = group_values.question_id;
        }
        if let Some(index) = columns.question_title {
            output[index] = group_values.question_title;
        }
        if let Some(index) = columns.answer_id {
            output[index] = group_values.answer_id;
        }
        if let Some(index) = columns.answer {
            output[index] = group_values.answer;
        }
    }

    output
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|index| row.get(index))
        .map(String::as_str)
        .unwrap_or("")
}

fn numeric_order(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => Ordering::Equal,
    }
}

pub fn execute(args: &ReorderArgs) -> Result<()> {
    let fallback = io_utils::resolve_encoding(
        args.fallback_encoding.as_deref(),
        encoding::default_fallback(),
    )?;
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output accepts a single input; use --output-dir for batches");
    }
    let book = match &args.rules {
        Some(path) => {
            Some(RuleBook::load(path).with_context(|| format!("Loading rules from {path:?}"))?)
        }
        None => None,
    };

    let mut failures = 0usize;
    for input in &args.inputs {
        if let Err(err) = reorder_file(input, args, fallback, book.as_ref()) {
            warn!("Failed to reorder '{}': {err:#}", input.display());
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} of {} file(s) failed", args.inputs.len());
    }
    Ok(())
}

fn reorder_file(
    input: &Path,
    args: &ReorderArgs,
    fallback: &'static Encoding,
    book: Option<&RuleBook>,
) -> Result<()> {
    let bytes = io_utils::read_bytes(input)?;
    let decoded = encoding::detect_and_decode(&bytes, fallback, args.min_confidence)
        .with_context(|| format!("Decoding {input:?}"))?;

    let (mut content, outcome) = reorder_content(&decoded.text);
    match &outcome {
        ReorderOutcome::Reordered { data_rows, groups } => info!(
            "Reordered {groups} question group(s) across {data_rows} data row(s) in '{}'",
            input.display()
        ),
        ReorderOutcome::Unchanged(reason) => {
            warn!("Passing '{}' through unmodified: {reason}", input.display())
        }
    }

    if let Some(book) = book {
        let (replaced, stats) = replace::apply_rules(&content, book.rules());
        if stats.total_replacements > 0 {
            info!(
                "Applied {} replacement(s) across {} rule(s)",
                stats.total_replacements,
                stats.applied.len()
            );
        }
        content = replaced;
    }

    let output = io_utils::resolve_output_path(
        input,
        args.output.as_deref(),
        args.output_dir.as_deref(),
        "sorted-",
    )?;
    io_utils::write_text(&output, &content, !args.no_bom)?;
    info!(
        "Wrote '{}' ({} -> utf-8)",
        output.display(),
        decoded.encoding.name().to_ascii_lowercase()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    const HEADER: &[&str] = &[
        "ID",
        "質問ID1",
        "質問タイトル1",
        "回答ID1",
        "回答1",
        "質問ID2",
        "質問タイトル2",
        "回答ID2",
        "回答2",
    ];

    #[test]
    fn swaps_groups_so_smaller_question_id_takes_the_first_slot() {
        let rows = table(&[
            HEADER,
            &["r1", "20", "Q20", "a20", "answer20", "10", "Q10", "a10", "answer10"],
        ]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        assert_eq!(
            reordered[1],
            table(&[&["r1", "10", "Q10", "a10", "answer10", "20", "Q20", "a20", "answer20"]])[0]
        );
    }

    #[test]
    fn passthrough_columns_are_untouched() {
        let rows = table(&[
            HEADER,
            &["respondent", "2", "b", "bb", "B", "1", "a", "aa", "A"],
        ]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        assert_eq!(reordered[1][0], "respondent");
    }

    #[test]
    fn empty_question_id_leaves_trailing_slots_empty() {
        let rows = table(&[
            HEADER,
            &["r1", "", "", "", "", "7", "Q7", "a7", "answer7"],
        ]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        assert_eq!(
            reordered[1],
            table(&[&["r1", "7", "Q7", "a7", "answer7", "", "", "", ""]])[0]
        );
    }

    #[test]
    fn ragged_rows_read_as_empty_cells() {
        let rows = table(&[HEADER, &["r1", "5"]]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        assert_eq!(
            reordered[1],
            table(&[&["r1", "5", "", "", "", "", "", "", ""]])[0]
        );
    }

    #[test]
    fn unparseable_ids_keep_encounter_order() {
        let rows = table(&[
            HEADER,
            &["r1", "x", "first", "f", "F", "y", "second", "s", "S"],
        ]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        // Neither id parses, so the sort leaves group 1 before group 2.
        assert_eq!(reordered[1][1], "x");
        assert_eq!(reordered[1][5], "y");
    }

    #[test]
    fn canonical_order_is_numeric_not_lexicographic() {
        let rows = table(&[
            &["質問ID10", "回答10", "質問ID2", "回答2"],
            &["3", "third", "4", "fourth"],
        ]);
        let group_layout = groups::resolve(&rows[0]).expect("groups");
        let reordered = reorder_rows(&rows, &group_layout);
        // Group "2" is the first canonical slot despite "10" < "2" as text,
        // so question id 3 lands in group 2's columns.
        assert_eq!(
            reordered[1],
            table(&[&["4", "fourth", "3", "third"]])[0]
        );
    }

    #[test]
    fn reorder_content_preserves_layout() {
        let input = "\u{feff}質問ID1,回答1,質問ID2,回答2\r\n20,twenty,10,ten\r\n";
        let (output, outcome) = reorder_content(input);
        assert_eq!(
            outcome,
            ReorderOutcome::Reordered {
                data_rows: 1,
                groups: 2
            }
        );
        assert_eq!(output, "\u{feff}質問ID1,回答1,質問ID2,回答2\r\n10,ten,20,twenty\r\n");
    }

    #[test]
    fn reorder_content_skips_headers_without_groups() {
        let input = "id,name\n1,Alice\n";
        let (output, outcome) = reorder_content(input);
        assert_eq!(
            outcome,
            ReorderOutcome::Unchanged(SkipReason::NoQuestionGroups)
        );
        assert_eq!(output, input);
    }

    #[test]
    fn reorder_content_skips_empty_input() {
        let (output, outcome) = reorder_content("");
        assert_eq!(outcome, ReorderOutcome::Unchanged(SkipReason::EmptyContent));
        assert_eq!(output, "");
    }
}
