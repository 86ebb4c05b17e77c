//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Which level input a rejected window should reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Top,
    Bottom,
}

/// A requested level window that cannot be applied.
///
/// Variants are listed in the order `validate` checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("The topmost level (left) cannot be larger than {max_level}.")]
    TopTooLarge { max_level: usize },

    #[error("The bottommost level (right) cannot be smaller than 1.")]
    BottomTooSmall,

    #[error("The topmost level (left) cannot be smaller than the bottommost level (right).")]
    TopBelowBottom,
}

impl RangeError {
    /// The single input that falls back to its last valid value, if any.
    pub fn reset_field(&self) -> Option<InputField> {
        match self {
            RangeError::TopTooLarge { .. } => Some(InputField::Top),
            RangeError::BottomTooSmall => Some(InputField::Bottom),
            RangeError::TopBelowBottom => None,
        }
    }
}

/// Domain errors represent violations of the hierarchy model.
/// These are independent of how documents are fetched.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("duplicate node identifier: {0}")]
    DuplicateNode(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("hierarchy has no nodes")]
    EmptyHierarchy,

    #[error("invalid {kind} document: {message}")]
    InvalidDocument { kind: &'static str, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
