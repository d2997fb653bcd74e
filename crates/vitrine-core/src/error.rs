//! Error types.

use thiserror::Error;

/// Problems found while reading a widget's markup.
///
/// Widgets never propagate these: a widget whose markup is broken turns
/// inactive and keeps the error for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// The widget root element itself was not found.
    #[error("{widget}: root element not found")]
    MissingRoot {
        /// Widget kind
        widget: &'static str,
    },
    /// A required descendant anchor was not found.
    #[error("{widget}: required anchor `{anchor}` not found")]
    MissingAnchor {
        /// Widget kind
        widget: &'static str,
        /// Anchor description (usually the `data-ref` name)
        anchor: &'static str,
    },
    /// An attribute held a value that could not be interpreted.
    #[error("invalid value `{value}` for attribute `{name}`")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// Raw value
        value: String,
    },
}
