//! Header analysis for repeated question/answer column families.
//!
//! Survey exports repeat a family of up to four columns per question:
//! `質問ID<N>`, `質問タイトル<N>`, `回答ID<N>`, `回答<N>`. The digit suffix
//! distinguishes repeated occurrences and ties the four roles of one group
//! together.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    QuestionId,
    QuestionTitle,
    AnswerId,
    Answer,
}

// Priority order matters: `回答(\d+)` would also match `回答ID2` had the
// patterns not been anchored, and a header name belongs to one role only.
fn role_patterns() -> &'static [(Role, Regex); 4] {
    static PATTERNS: OnceLock<[(Role, Regex); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Role::QuestionId, pattern(r"^質問ID(\d+)$")),
            (Role::QuestionTitle, pattern(r"^質問タイトル(\d+)$")),
            (Role::AnswerId, pattern(r"^回答ID(\d+)$")),
            (Role::Answer, pattern(r"^回答(\d+)$")),
        ]
    })
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("static header pattern compiles")
}

/// Column indices for the four roles of one group; `None` when the header
/// lacks that role's column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupColumns {
    pub question_id: Option<usize>,
    pub question_title: Option<usize>,
    pub answer_id: Option<usize>,
    pub answer: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct QuestionGroup {
    /// The digit suffix shared by the group's header names.
    pub number: String,
    pub columns: GroupColumns,
}

/// Everything the reorderer needs to know about a header row.
#[derive(Debug, Clone)]
pub struct GroupLayout {
    /// Groups in header encounter order.
    pub groups: Vec<QuestionGroup>,
    /// `(group number, column index)` for every group with a question-id
    /// column, in header order. These columns define the canonical slots.
    pub question_id_columns: Vec<(String, usize)>,
    /// Indices of columns belonging to no group; copied through verbatim.
    pub passthrough: Vec<usize>,
}

/// Scans a header row for question group columns.
///
/// Returns `None` when the header contains no group at all, in which case
/// the table must be left unmodified.
pub fn resolve(header: &[String]) -> Option<GroupLayout> {
    let mut layout = GroupLayout {
        groups: Vec::new(),
        question_id_columns: Vec::new(),
        passthrough: Vec::new(),
    };

    for (index, name) in header.iter().enumerate() {
        let trimmed = name.trim();
        let mut matched = false;

        for (role, regex) in role_patterns() {
            let Some(captures) = regex.captures(trimmed) else {
                continue;
            };
            let number = captures[1].to_string();
            let position = match layout.groups.iter().position(|g| g.number == number) {
                Some(position) => position,
                None => {
                    layout.groups.push(QuestionGroup {
                        number: number.clone(),
                        columns: GroupColumns::default(),
                    });
                    layout.groups.len() - 1
                }
            };
            let columns = &mut layout.groups[position].columns;
            match role {
                Role::QuestionId => {
                    columns.question_id = Some(index);
                    layout.question_id_columns.push((number, index));
                }
                Role::QuestionTitle => columns.question_title = Some(index),
                Role::AnswerId => columns.answer_id = Some(index),
                Role::Answer => columns.answer = Some(index),
            }
            matched = true;
            break;
        }

        if !matched {
            layout.passthrough.push(index);
        }
    }

    if layout.groups.is_empty() {
        None
    } else {
        Some(layout)
    }
}
