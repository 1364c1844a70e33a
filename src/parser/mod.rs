//! Response Parser
//!
//! Line-oriented extraction of structured records from raw model text. Only
//! the `^\d+\.` pattern marks an item; the number itself is never trusted,
//! so restarted or skipped numbering is harmless. Everything else is either
//! an explanation candidate (paired mode) or noise.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::FormulaRecord;

lazy_static! {
    static ref NUMBERED: Regex = Regex::new(r"^\d+\.").expect("valid regex");
    static ref MARKER: Regex = Regex::new(r"^\d+\.\s*").expect("valid regex");
    static ref EXPLANATION_PREFIX: Regex =
        Regex::new(r"(?i)^(?:trick\s+to\s+remember\s*:|trick\s*:|remember\s*:|where\b\s*[:,]?)\s*")
            .expect("valid regex");
}

/// How far past a numbered line an explanation may appear.
const EXPLANATION_LOOKAHEAD: usize = 3;

/// Unlabeled lines longer than this are taken as explanations.
const UNLABELED_MIN_CHARS: usize = 10;

/// Subject treatment in paired mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subject {
    /// Pure mathematics: pairing is bypassed, explanations stay empty
    Mathematics,
    #[default]
    Other,
}

impl Subject {
    pub fn from_id(subject: &str) -> Self {
        if subject
            .trim()
            .eq_ignore_ascii_case(crate::prompts::MATHEMATICS_SUBJECT)
        {
            Self::Mathematics
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Numbered lines only, markers stripped, optionally truncated
    PlainList { limit: Option<usize> },
    /// Numbered lines paired with a following explanation or trick line
    Paired(Subject),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Lines(Vec<String>),
    Records(Vec<FormulaRecord>),
}

/// Parse raw model text according to `mode`.
pub fn parse(raw: &str, mode: ParseMode) -> Parsed {
    match mode {
        ParseMode::PlainList { limit } => Parsed::Lines(parse_list(raw, limit)),
        ParseMode::Paired(subject) => Parsed::Records(parse_formulas(raw, subject)),
    }
}

/// Keep numbered lines, strip their markers, truncate to `limit`.
pub fn parse_list(raw: &str, limit: Option<usize>) -> Vec<String> {
    let items = content_lines(raw)
        .into_iter()
        .filter(|line| is_numbered(line))
        .map(strip_marker)
        .filter(|item| !item.is_empty());

    match limit {
        Some(limit) => items.take(limit).collect(),
        None => items.collect(),
    }
}

/// Parse formulas with explanations. Mathematics bypasses pairing.
pub fn parse_formulas(raw: &str, subject: Subject) -> Vec<FormulaRecord> {
    if subject == Subject::Mathematics {
        return parse_list(raw, None)
            .into_iter()
            .map(FormulaRecord::bare)
            .collect();
    }

    let lines = content_lines(raw);
    let records = pair_with_lookahead(&lines);
    if !records.is_empty() && records.iter().all(|r| r.explanation.is_empty()) {
        return pair_with_next_line(&lines);
    }
    records
}

fn pair_with_lookahead(lines: &[&str]) -> Vec<FormulaRecord> {
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if !is_numbered(line) {
            continue;
        }
        let formula = strip_marker(line);
        if formula.is_empty() {
            continue;
        }

        // Window stops at the next formula. A labeled line anywhere in it
        // wins over a long unlabeled one.
        let window_end = (i + EXPLANATION_LOOKAHEAD).min(lines.len());
        let window: Vec<(usize, &str)> = (i..window_end)
            .map(|j| (j, lines[j]))
            .take_while(|(_, candidate)| !is_numbered(candidate))
            .collect();
        let labeled = window
            .iter()
            .find_map(|&(j, candidate)| labeled_explanation(candidate).map(|text| (j, text)));
        let chosen = labeled.or_else(|| {
            window
                .iter()
                .find(|(_, candidate)| candidate.chars().count() > UNLABELED_MIN_CHARS)
                .map(|&(j, candidate)| (j, clean_markdown(candidate)))
        });

        let explanation = match chosen {
            Some((j, text)) => {
                i = j + 1;
                text
            }
            None => String::new(),
        };
        records.push(FormulaRecord::new(formula, explanation));
    }

    records
}

/// Simplified pairing used when the lookahead found no explanations at all:
/// any non-numbered line directly after a formula is its explanation.
fn pair_with_next_line(lines: &[&str]) -> Vec<FormulaRecord> {
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if !is_numbered(line) {
            continue;
        }
        let formula = strip_marker(line);
        if formula.is_empty() {
            continue;
        }
        let explanation = match lines.get(i) {
            Some(next) if !is_numbered(next) => {
                i += 1;
                labeled_explanation(next).unwrap_or_else(|| clean_markdown(next))
            }
            _ => String::new(),
        };
        records.push(FormulaRecord::new(formula, explanation));
    }

    records
}

/// Trimmed, non-empty lines.
fn content_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn is_numbered(line: &str) -> bool {
    NUMBERED.is_match(line)
}

fn strip_marker(line: &str) -> String {
    clean_markdown(&MARKER.replace(line, ""))
}

/// Text of a line starting with a recognized explanation prefix, prefix removed.
fn labeled_explanation(line: &str) -> Option<String> {
    let found = EXPLANATION_PREFIX.find(line)?;
    Some(clean_markdown(&line[found.end()..]))
}

/// Drop leftover bold markers and backticks.
fn clean_markdown(text: &str) -> String {
    text.replace("**", "").replace('`', "").trim().to_string()
}
