//! Best-effort parsing of model output into quiz items
//!
//! Accepts the typed grammar
//!
//! ```text
//! Q: <question>
//! Type: <Multiple Choice|True or False|Short Answer>
//! A. <choice>          (multiple choice only)
//! ...
//! Answer: <letter|True|False|free text>
//! ----
//! ```
//!
//! and the older flat grammar (`Q:` / four options / `Answer:`, no `Type:`
//! line, no delimiters), which is read as multiple choice.
//!
//! Output is split on dash rules and before every `Q:` line, so a missing
//! trailing delimiter or a missing delimiter between questions is harmless.
//! Malformed sub-fields become empty strings; items left without a question
//! or an answer are dropped and the survivors renumbered from 1. Parsing never
//! fails: an empty result is a valid outcome.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::types::{QuestionKind, QuizItem};

const CHOICE_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-{2,}[ \t]*$").unwrap());

static QUESTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:\*\*)?(?:\d+[.)][ \t]*)?(?:\*\*)?Q(?:uestion)?(?:[ \t]*\d+)?[ \t]*:(?:\*\*)?[ \t]*(?P<text>.*)$",
    )
    .unwrap()
});

static TYPE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:\*\*)?Type[ \t]*:(?:\*\*)?[ \t]*(?P<label>.*)$").unwrap()
});

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:\*\*)?\(?(?P<letter>[A-Da-d])[.)](?:\*\*)?[ \t]*(?P<text>.*)$").unwrap()
});

static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:\*\*)?(?:Correct[ \t]+)?Answer[ \t]*:(?:\*\*)?[ \t]*(?P<text>.*)$").unwrap()
});

static ANSWER_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?(?P<letter>[A-Da-d])(?:[.):,\-\s]|$)").unwrap());

static ANSWER_TRUE_FALSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\W*(?P<value>true|false)\b").unwrap());

/// Parse raw model output into numbered quiz items
pub fn parse_quiz(raw: &str) -> Vec<QuizItem> {
    let normalized = raw.replace("\r\n", "\n");

    let items: Vec<QuizItem> = split_blocks(&normalized)
        .into_iter()
        .filter_map(parse_block)
        .filter(|item| !item.question.trim().is_empty() && !item.answer.trim().is_empty())
        .enumerate()
        .map(|(idx, item)| QuizItem {
            number: idx + 1,
            ..item
        })
        .collect();

    tracing::debug!(items = items.len(), "parsed quiz output");
    items
}

/// Candidate blocks, each starting at a question line
fn split_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    for segment in RULE.split(text) {
        let starts: Vec<usize> = QUESTION_LINE.find_iter(segment).map(|m| m.start()).collect();
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(segment.len());
            blocks.push(&segment[start..end]);
        }
    }
    blocks
}

fn is_field_line(line: &str) -> bool {
    TYPE_LINE.is_match(line) || OPTION_LINE.is_match(line) || ANSWER_LINE.is_match(line)
}

/// Field lines that end the question of a non-multiple-choice item
fn is_label_line(line: &str) -> bool {
    TYPE_LINE.is_match(line) || ANSWER_LINE.is_match(line)
}

fn clean(text: &str) -> String {
    text.trim().trim_matches('*').trim().to_string()
}

/// Parse one block; `number` is assigned later
fn parse_block(block: &str) -> Option<QuizItem> {
    let lines: Vec<&str> = block.lines().collect();
    let first = QUESTION_LINE.captures(lines.first()?)?;
    let rest = &lines[1..];

    let kind = match rest.iter().find_map(|l| TYPE_LINE.captures(l)) {
        Some(caps) => QuestionKind::from_label(&caps["label"])?,
        None if rest.iter().any(|l| OPTION_LINE.is_match(l)) => QuestionKind::MultipleChoice,
        None => return None,
    };

    // Question text may continue on following lines until the first field.
    // Lettered lines only count as fields when the item has options.
    let ends_question: fn(&str) -> bool = match kind {
        QuestionKind::MultipleChoice => is_field_line,
        _ => is_label_line,
    };
    let mut question_parts = vec![clean(&first["text"])];
    let mut body_start = 1;
    while body_start < lines.len() && !ends_question(lines[body_start]) {
        question_parts.push(clean(lines[body_start]));
        body_start += 1;
    }
    let question = question_parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let body = &lines[body_start..];

    let (choices, answer) = match kind {
        QuestionKind::MultipleChoice => (parse_choices(body), letter_answer(body)),
        QuestionKind::TrueFalse => (BTreeMap::new(), true_false_answer(body)),
        QuestionKind::ShortAnswer => (BTreeMap::new(), free_text_answer(body)),
    };

    Some(QuizItem {
        number: 0,
        question,
        kind,
        choices,
        answer,
    })
}

/// A-D mapped to option text; absent options map to ""
fn parse_choices(body: &[&str]) -> BTreeMap<String, String> {
    let mut choices: BTreeMap<String, String> = CHOICE_LETTERS
        .iter()
        .map(|l| (l.to_string(), String::new()))
        .collect();
    let mut seen = Vec::new();

    for line in body {
        if ANSWER_LINE.is_match(line) {
            break;
        }
        if let Some(caps) = OPTION_LINE.captures(line) {
            let letter = caps["letter"].to_uppercase();
            if !seen.contains(&letter) {
                choices.insert(letter.clone(), clean(&caps["text"]));
                seen.push(letter);
            }
        }
    }

    choices
}

fn answer_text(body: &[&str]) -> Option<(usize, String)> {
    body.iter()
        .enumerate()
        .find_map(|(idx, l)| ANSWER_LINE.captures(l).map(|caps| (idx, caps["text"].to_string())))
}

fn letter_answer(body: &[&str]) -> String {
    answer_text(body)
        .and_then(|(_, text)| {
            let text = clean(&text);
            ANSWER_LETTER
                .captures(&text)
                .map(|caps| caps["letter"].to_uppercase())
        })
        .unwrap_or_default()
}

fn true_false_answer(body: &[&str]) -> String {
    answer_text(body)
        .and_then(|(_, text)| {
            ANSWER_TRUE_FALSE.captures(&text).map(|caps| {
                if caps["value"].eq_ignore_ascii_case("true") {
                    "True".to_string()
                } else {
                    "False".to_string()
                }
            })
        })
        .unwrap_or_default()
}

/// Everything after `Answer:` to the end of the block
fn free_text_answer(body: &[&str]) -> String {
    let Some((idx, first)) = answer_text(body) else {
        return String::new();
    };
    let mut parts = vec![first];
    parts.extend(body[idx + 1..].iter().map(|l| l.to_string()));
    clean(&parts.join("\n"))
}
