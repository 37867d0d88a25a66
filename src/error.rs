use thiserror::Error;

/// Errors raised by automaton and expression operations.
///
/// No operation retries internally and no partial result is ever returned;
/// every failure propagates to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Dangling state or transition reference, mismatched contexts, or a
    /// label outside a locked alphabet.
    #[error("structural error: {0}")]
    Structural(String),

    /// A weight operation applied outside its domain.
    #[error("{op}: invalid value: {value}")]
    Algebra { op: &'static str, value: String },

    /// The epsilon closure of the automaton is not summable.
    #[error("invalid automaton: {0}")]
    Validity(String),

    /// A required precondition does not hold and was not overridden.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Malformed expression, weight, or label text.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    pub fn algebra<V: ::std::fmt::Display>(op: &'static str, value: V) -> Self {
        Error::Algebra {
            op,
            value: value.to_string(),
        }
    }
}
