//! Lexical helpers over raw statement text.
//!
//! Keywords are matched case insensitively on word boundaries and never inside quoted
//! literals or identifiers. Nothing here parses SQL, the rewrites are purely textual.

use crate::{KeelError, Result, truncate_long};

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_keyword_at(bytes: &[u8], i: usize, keyword: &str) -> bool {
    let end = i + keyword.len();
    end <= bytes.len()
        && bytes[i..end].eq_ignore_ascii_case(keyword.as_bytes())
        && (i == 0 || !is_word(bytes[i - 1]))
        && (end == bytes.len() || !is_word(bytes[end]))
}

/// Byte offsets of every occurrence of the `keyword`.
pub fn keyword_positions(sql: &str, keyword: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut result = Vec::new();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if b == b'\'' || b == b'"' {
            quote = Some(b);
        } else if is_keyword_at(bytes, i, keyword) {
            result.push(i);
            i += keyword.len();
            continue;
        }
        i += 1;
    }
    result
}

/// Whether the statement starts (leading whitespace aside) with `keyword`.
pub fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    is_keyword_at(sql.trim_start().as_bytes(), 0, keyword)
}

/// Text between the leading `SELECT` and the first `FROM`, `None` when there is no such text.
pub fn select_list(sql: &str) -> Option<&str> {
    let start = sql.len() - sql.trim_start().len();
    if !starts_with_keyword(sql, "SELECT") {
        return None;
    }
    let start = start + "SELECT".len();
    let from = keyword_positions(sql, "FROM")
        .into_iter()
        .find(|v| *v >= start)?;
    let list = sql[start..from].trim();
    (!list.is_empty()).then_some(list)
}

/// Tokens of the select list split on commas and whitespace.
///
/// `a.id AS id, name` yields `a.id`, `AS`, `id` and `name`.
pub fn projected_columns(sql: &str) -> Vec<&str> {
    select_list(sql)
        .map(|list| {
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Offset of the last `ORDER BY` clause.
fn last_order_by(sql: &str) -> Option<usize> {
    keyword_positions(sql, "ORDER")
        .into_iter()
        .filter(|i| {
            let rest = sql[i + "ORDER".len()..].trim_start();
            rest.len() < sql.len() - i - "ORDER".len() && starts_with_keyword(rest, "BY")
        })
        .last()
}

/// Count statement derived from a selection: select list replaced by `COUNT(*)` and
/// everything from the last `ORDER BY` on dropped.
///
/// The first `FROM` is taken as the one of the outer statement, so a select list holding
/// a nested `SELECT ... FROM` produces a wrong count statement.
pub fn count_statement(sql: &str) -> Result<String> {
    let Some(from) = keyword_positions(sql, "FROM").into_iter().next() else {
        return Err(KeelError::validation(format!(
            "Cannot derive a count statement from `{}`, it has no FROM clause",
            truncate_long!(sql)
        )));
    };
    let end = last_order_by(sql).filter(|v| *v > from).unwrap_or(sql.len());
    let body = sql[from..end].trim_end().trim_end_matches(';').trim_end();
    Ok(format!("SELECT COUNT(*) {body};"))
}

/// Names of the `:name` placeholders in order of first appearance.
pub fn declared_parameters(sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let mut result: Vec<String> = Vec::new();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b':' if bytes.get(i + 1) == Some(&b':') => {
                // Cast operator
                i += 2;
                continue;
            }
            b':' if i == 0 || bytes[i - 1] != b':' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && is_word(bytes[end]) {
                    end += 1;
                }
                if end > start && !bytes[start].is_ascii_digit() {
                    let name = &sql[start..end];
                    if !result.iter().any(|v| v == name) {
                        result.push(name.to_owned());
                    }
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    result
}
