use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyValErrorKind {
    #[error("Input must not be empty.")]
    EmptyInput,
    #[error("Entry '{entry}' must contain exactly one '{pair_delim}'.")]
    MalformedEntry { entry: String, pair_delim: char },
    #[error("Entry '{entry}' has an empty key.")]
    EmptyKey { entry: String },
    #[error("Entry '{entry}' has an empty value.")]
    EmptyValue { entry: String },
}

/// Key-value parse failure carrying the entries accepted before the
/// failing one. The partial mapping is diagnostic output only; callers
/// must not use it as a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct KeyValError {
    pub kind: KeyValErrorKind,
    pub partial: BTreeMap<String, String>,
}
