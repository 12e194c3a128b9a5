use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PatternError {
    #[error("Invalid pattern '{pattern}': {source}")]
    Parse {
        pattern: String,
        #[source]
        source: Box<regex_syntax::Error>,
    },
    #[error("Pattern '{pattern}' uses an unsupported {construct}.")]
    Unsupported {
        pattern: String,
        construct: &'static str,
    },
}
