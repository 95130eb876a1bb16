//! Error types for expression evaluation and plotting

use std::fmt;
use thiserror::Error;

/// Main error type for evaluator and plotter operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed syntax, unknown character or unparseable literal
    #[error("Parse error at position {position} near `{fragment}`: {message}")]
    Parse {
        /// Human-readable description of what went wrong
        message: String,
        /// Offending substring of the input
        fragment: String,
        /// Byte offset into the trimmed input
        position: usize,
    },

    /// Identifier referenced before any assignment to it
    #[error("Undefined variable '{name}' at position {position}")]
    UndefinedVariable { name: String, position: usize },

    /// A plot range bound is non-numeric or the bounds are out of order
    #[error("Invalid range value for {bound}: {problem}")]
    InvalidRange { bound: Bound, problem: RangeProblem },

    #[error("Input is empty")]
    EmptyInput,

    /// `x = f(y)` was given where `y = f(x)` is expected
    #[error("Enter the function in the form 'y = f(x)' instead of 'x = f(y)'")]
    InvertedFunction,

    #[error("Cannot plot an assignment to '{target}'; only 'y = f(x)' is supported")]
    UnsupportedAssignment { target: String },
}

impl Error {
    /// Builds a [`Error::Parse`], taking the fragment from `input` at `position`.
    pub fn parse(message: impl Into<String>, input: &str, position: usize) -> Self {
        Error::Parse {
            message: message.into(),
            fragment: fragment_at(input, position),
            position,
        }
    }
}

/// Longest fragment quoted in a [`Error::Parse`], in characters.
pub const MAX_FRAGMENT_LEN: usize = 32;

fn fragment_at(input: &str, position: usize) -> String {
    let Some(token) = input
        .get(position..)
        .and_then(|rest| rest.split_whitespace().next())
    else {
        return "<end of input>".to_string();
    };

    match token.char_indices().nth(MAX_FRAGMENT_LEN) {
        Some((end, _)) => format!("{}…", &token[..end]),
        None => token.to_string(),
    }
}

/// Which of the four plot range bounds an [`Error::InvalidRange`] refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bound {
    XMin,
    XMax,
    YMin,
    YMax,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bound::XMin => "x_min",
            Bound::XMax => "x_max",
            Bound::YMin => "y_min",
            Bound::YMax => "y_max",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeProblem {
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("bound must be finite")]
    NotFinite,

    #[error("minimum {min} must be less than maximum {max}")]
    Unordered { min: f64, max: f64 },
}

/// Result type alias for evaluator operations
pub type Result<T> = std::result::Result<T, Error>;
