//! Seam to the expression compiler.
//!
//! The buffer does not know how template expressions become source code. A
//! template compiler implements [`ExprCompiler`] for its own expression
//! descriptors; [`SourceBuffer::linearize`](crate::SourceBuffer::linearize)
//! calls it for every `JoinExpression` and `JoinDataSerialization` segment
//! and returns its errors unchanged.

use thiserror::Error;

use crate::prelude::DATA_PARAM;

/// Renders expression descriptors to JS source.
pub trait ExprCompiler {
    /// Expression descriptor type stored in `JoinExpression` segments.
    type Expr;
    type Error;

    /// Source for an expression whose value is appended to the output.
    fn expr(&self, expr: &Self::Expr) -> Result<String, Self::Error>;

    /// Source referencing the current data-binding context.
    fn data_access(&self) -> Result<String, Self::Error>;
}

// ---------------------------------------------------------------------------
// Pass-through compiler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceExprError {
    #[error("Expression source must be non-empty")]
    EmptyExpression,
}

/// An [`ExprCompiler`] whose descriptors are already JS source.
///
/// Used when an upstream tool has compiled expressions ahead of time, e.g.
/// the JSON payloads accepted by the `ssr-buffer` binary.
#[derive(Debug, Clone)]
pub struct SourceExpr {
    data_access: String,
}

impl SourceExpr {
    pub fn new(data_access: impl Into<String>) -> Self {
        Self {
            data_access: data_access.into(),
        }
    }
}

impl Default for SourceExpr {
    fn default() -> Self {
        Self::new(DATA_PARAM)
    }
}

impl ExprCompiler for SourceExpr {
    type Expr = String;
    type Error = SourceExprError;

    fn expr(&self, expr: &String) -> Result<String, SourceExprError> {
        let source = expr.trim();
        if source.is_empty() {
            return Err(SourceExprError::EmptyExpression);
        }
        Ok(source.to_string())
    }

    fn data_access(&self) -> Result<String, SourceExprError> {
        if self.data_access.trim().is_empty() {
            return Err(SourceExprError::EmptyExpression);
        }
        Ok(self.data_access.clone())
    }
}
