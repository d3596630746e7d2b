//! Per-row output file naming: sanitize the first column's value, fall back
//! to `report_<n>` when it is empty, and disambiguate duplicates.

use std::collections::HashMap;

use super::models::DataRow;

const MAX_BASE_NAME_CHARS: usize = 100;
const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace path-unsafe characters with underscores, collapse whitespace runs
/// to a single underscore, trim and truncate. May return an empty string.
pub fn sanitize_base_name(value: &str) -> String {
    let trimmed = value.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut pending_ws = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            pending_ws = true;
            continue;
        }
        if pending_ws {
            out.push('_');
            pending_ws = false;
        }
        if UNSAFE_CHARS.contains(&ch) {
            out.push('_');
        } else {
            out.push(ch);
        }
    }
    out.chars().take(MAX_BASE_NAME_CHARS).collect()
}

/// Derive one unique base name per row, in row order. Deterministic: the
/// same rows always yield the same names. The duplicate counter is local to
/// this call.
pub fn derive_base_names(rows: &[DataRow]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    let first_column = match rows[0].keys().next() {
        Some(key) => key.clone(),
        None => {
            return (1..=rows.len()).map(|i| format!("report_{i}")).collect();
        }
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let raw = row.get(&first_column).map(String::as_str).unwrap_or("");
            let sanitized = sanitize_base_name(raw);
            let base = if sanitized.is_empty() {
                format!("report_{}", i + 1)
            } else {
                sanitized
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{}_{}", base, *count)
            }
        })
        .collect()
}
