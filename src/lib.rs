//! # SSR Buffer
//!
//! Intermediate representation for server-side render functions.
//!
//! A template compiler feeds a [`SourceBuffer`] with segments in document
//! order (raw code, static HTML, expressions, data serialization markers) and
//! linearizes it once into the source text of a JavaScript function
//! `function (data) { ... }` that builds its HTML by concatenation.
//!
//! The generated function is self-contained: it carries a runtime prelude
//! (HTML escaping, attribute filters, a value stringifier) so it can run where
//! this crate is not reachable. The same helpers exist on the Rust side in
//! [`filters`] and [`stringify`] for values known at compile time. Both copies
//! implement the same behavior and are tested against the same fixtures.
//!
//! ```text
//! tree walker → SourceBuffer (segments) → linearize → function source → loader
//! ```

pub mod buffer;
pub mod expr;
pub mod filters;
pub mod prelude;
pub mod stringify;
pub mod utils;
pub mod value;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use buffer::SourceBuffer;
pub use expr::{ExprCompiler, SourceExpr, SourceExprError};
pub use value::Value;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One atomic unit of pending output in a [`SourceBuffer`].
///
/// `E` is the expression descriptor owned by the external expression
/// compiler. The buffer never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment<E> {
    /// Source code emitted verbatim. Does not contribute to the output string.
    RawCode { text: String },
    /// A source expression whose evaluated result is appended to the output.
    JoinRawCode { text: String },
    /// Static text appended to the output. Adjacent literals merge.
    JoinLiteral { text: String },
    /// Serialize the current data context and append it to the output.
    JoinDataSerialization,
    /// An expression rendered by the external compiler, appended to the output.
    JoinExpression { expr: E },
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of the value stringifier.
///
/// The runtime copy in the prelude throws the same three conditions as
/// `Error("Cannot stringify ...")`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StringifyError {
    #[error("Cannot stringify {kind}: {value}")]
    UnsupportedValueKind { kind: &'static str, value: String },

    #[error("Cannot stringify non-finite number: {}", number_text(.0))]
    NonFiniteNumber(f64),

    #[error("Cannot stringify cyclic structure")]
    CyclicStructure,
}

fn number_text(n: &f64) -> String {
    value::number_to_text(*n)
}

/// Errors raised while stamping a build version into generated source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreludeError {
    #[error("Invalid version identifier `{0}`: expected [0-9A-Za-z][0-9A-Za-z._+-]*")]
    InvalidVersion(String),

    #[error("Version declaration with `{}` not found in source", prelude::VERSION_PLACEHOLDER)]
    MissingVersionPlaceholder,
}
