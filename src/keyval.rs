use std::collections::BTreeMap;

use crate::error::{KeyValError, KeyValErrorKind};

/// Parses a delimited key-value string such as `"key1: val1, key2: val2"`
/// into an ordered mapping.
///
/// Entries are split on `entry_delim` and trimmed; each entry must contain
/// exactly one `pair_delim` separating a non-empty key from a non-empty
/// value (both trimmed). A duplicate key keeps the last value. Header,
/// cookie, and basic-auth resolution all go through this one grammar with
/// their own delimiter pair.
///
/// # Errors
///
/// Returns [`KeyValError`] when `raw` is empty, an entry does not contain
/// exactly one `pair_delim`, or a key or value is empty after trimming.
/// The error carries the entries accepted before the failing one.
pub fn parse_key_val_string(
    raw: &str,
    entry_delim: char,
    pair_delim: char,
) -> Result<BTreeMap<String, String>, KeyValError> {
    if raw.is_empty() {
        return Err(KeyValError {
            kind: KeyValErrorKind::EmptyInput,
            partial: BTreeMap::new(),
        });
    }

    let mut parsed = BTreeMap::new();
    for entry in raw.split(entry_delim) {
        let entry = entry.trim();
        let Some((key, value)) = entry.split_once(pair_delim) else {
            return Err(KeyValError {
                kind: KeyValErrorKind::MalformedEntry {
                    entry: entry.to_owned(),
                    pair_delim,
                },
                partial: parsed,
            });
        };
        if value.contains(pair_delim) {
            return Err(KeyValError {
                kind: KeyValErrorKind::MalformedEntry {
                    entry: entry.to_owned(),
                    pair_delim,
                },
                partial: parsed,
            });
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(KeyValError {
                kind: KeyValErrorKind::EmptyKey {
                    entry: entry.to_owned(),
                },
                partial: parsed,
            });
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(KeyValError {
                kind: KeyValErrorKind::EmptyValue {
                    entry: entry.to_owned(),
                },
                partial: parsed,
            });
        }
        parsed.insert(key.to_owned(), value.to_owned());
    }

    Ok(parsed)
}
