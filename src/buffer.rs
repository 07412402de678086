//! Source buffer: the segment list and its linearization.
//!
//! Segments are appended in document order and linearized once into JS
//! statements, one per line:
//!
//! - runs of adjacent `JoinLiteral` segments merge into one
//!   `html += "<quoted>";` statement
//! - `RawCode` is emitted verbatim
//! - `JoinRawCode` becomes `html += <code>;`
//! - `JoinExpression` becomes `html += <compiled expr>;`
//! - `JoinDataSerialization` becomes `html += stringifier.any(<data>);`
//!
//! Linearization reads the segments without consuming them, so calling it
//! again on an unchanged buffer yields the same text.

use crate::expr::ExprCompiler;
use crate::prelude::{ACCUMULATOR, RENDERER_CLOSE, RENDERER_OPEN, RUNTIME_SOURCE};
use crate::utils::quote_string_literal;
use crate::Segment;

/// Ordered segments of one renderer under construction.
///
/// One buffer per compilation unit, filled by a single producer.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBuffer<E> {
    segments: Vec<Segment<E>>,
}

impl<E> SourceBuffer<E> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a buffer from segments produced elsewhere.
    pub fn from_segments(segments: Vec<Segment<E>>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment<E>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Code emitted verbatim.
    pub fn append_raw(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::RawCode { text: text.into() });
    }

    /// Code whose evaluated result is appended to the output.
    pub fn append_join_raw(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::JoinRawCode { text: text.into() });
    }

    /// Static output text, assumed already HTML-escaped by the caller.
    pub fn append_literal(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::JoinLiteral { text: text.into() });
    }

    /// Append the runtime serialization of the current data context.
    pub fn append_data_serialization(&mut self) {
        self.segments.push(Segment::JoinDataSerialization);
    }

    pub fn append_expression(&mut self, expr: E) {
        self.segments.push(Segment::JoinExpression { expr });
    }

    /// Open the renderer function and inject the runtime prelude.
    pub fn append_renderer_start(&mut self) {
        self.append_raw(RENDERER_OPEN);
        self.append_raw(RUNTIME_SOURCE);
    }

    /// Return the accumulator and close the renderer function.
    pub fn append_renderer_end(&mut self) {
        self.append_raw(RENDERER_CLOSE);
    }

    /// Turn the segments into JS source text.
    ///
    /// Errors from `compiler` abort linearization and are returned as-is.
    pub fn linearize<C>(&self, compiler: &C) -> Result<String, C::Error>
    where
        C: ExprCompiler<Expr = E>,
    {
        let mut code: Vec<String> = Vec::with_capacity(self.segments.len());
        let mut pending = String::new();
        let mut literal_runs = 0usize;

        for segment in &self.segments {
            let statement = match segment {
                Segment::JoinLiteral { text } => {
                    pending.push_str(text);
                    continue;
                }
                Segment::RawCode { text } => text.clone(),
                Segment::JoinRawCode { text } => join_statement(text),
                Segment::JoinDataSerialization => {
                    let data = compiler.data_access()?;
                    join_statement(&format!("stringifier.any({})", data))
                }
                Segment::JoinExpression { expr } => join_statement(&compiler.expr(expr)?),
            };

            if flush_literal(&mut code, &mut pending) {
                literal_runs += 1;
            }
            code.push(statement);
        }

        if flush_literal(&mut code, &mut pending) {
            literal_runs += 1;
        }

        tracing::debug!(
            segments = self.segments.len(),
            statements = code.len(),
            literal_runs,
            "linearized source buffer"
        );

        Ok(code.join("\n"))
    }
}

impl<E> Default for SourceBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn join_statement(source: &str) -> String {
    format!("{} += {};", ACCUMULATOR, source)
}

/// Emit the pending literal run, if any. Returns whether a statement was emitted.
fn flush_literal(code: &mut Vec<String>, pending: &mut String) -> bool {
    if pending.is_empty() {
        return false;
    }

    tracing::trace!(bytes = pending.len(), "flushing literal run");
    code.push(join_statement(&quote_string_literal(pending)));
    pending.clear();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{SourceExpr, SourceExprError};
    use pretty_assertions::assert_eq;

    fn linearize(buffer: &SourceBuffer<String>) -> String {
        buffer.linearize(&SourceExpr::default()).unwrap()
    }

    #[test]
    fn empty_buffer_is_empty_code() {
        let buffer: SourceBuffer<String> = SourceBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(linearize(&buffer), "");
    }

    #[test]
    fn append_operations_add_one_segment_each() {
        let mut buffer = SourceBuffer::new();
        buffer.append_raw("if (data.x) {");
        buffer.append_join_raw("componentRenderers.c0(data)");
        buffer.append_literal("<p>");
        buffer.append_data_serialization();
        buffer.append_expression("data.x".to_string());
        assert_eq!(
            buffer.segments(),
            &[
                Segment::RawCode { text: "if (data.x) {".into() },
                Segment::JoinRawCode { text: "componentRenderers.c0(data)".into() },
                Segment::JoinLiteral { text: "<p>".into() },
                Segment::JoinDataSerialization,
                Segment::JoinExpression { expr: "data.x".to_string() },
            ]
        );
    }

    #[test]
    fn adjacent_literals_merge_into_one_statement() {
        let mut buffer = SourceBuffer::new();
        buffer.append_literal("<div");
        buffer.append_literal(" class=\"a\"");
        buffer.append_literal(">");
        buffer.append_expression("data.name".to_string());
        buffer.append_literal("</div>");

        assert_eq!(
            linearize(&buffer),
            "html += \"<div class=\\\"a\\\">\";\nhtml += data.name;\nhtml += \"</div>\";"
        );
    }

    #[test]
    fn split_and_joined_literals_linearize_identically() {
        let mut split = SourceBuffer::new();
        for part in ["a\n", "\"b\"", "\t\\c"] {
            split.append_literal(part);
        }
        let mut joined = SourceBuffer::new();
        joined.append_literal("a\n\"b\"\t\\c");

        assert_eq!(linearize(&split), linearize(&joined));
    }

    #[test]
    fn empty_literals_emit_nothing() {
        let mut buffer = SourceBuffer::new();
        buffer.append_literal("");
        buffer.append_raw("var x = 1;");
        buffer.append_literal("");
        assert_eq!(linearize(&buffer), "var x = 1;");
    }

    #[test]
    fn segment_statements() {
        let mut buffer = SourceBuffer::new();
        buffer.append_raw("for (var i = 0; i < 2; i++) {");
        buffer.append_join_raw("componentRenderers.item(data, i)");
        buffer.append_raw("}");
        buffer.append_data_serialization();

        assert_eq!(
            linearize(&buffer),
            [
                "for (var i = 0; i < 2; i++) {",
                "html += componentRenderers.item(data, i);",
                "}",
                "html += stringifier.any(data);",
            ]
            .join("\n")
        );
    }

    #[test]
    fn data_serialization_uses_compiler_data_access() {
        let mut buffer: SourceBuffer<String> = SourceBuffer::new();
        buffer.append_data_serialization();
        let code = buffer.linearize(&SourceExpr::new("ctx.data")).unwrap();
        assert_eq!(code, "html += stringifier.any(ctx.data);");
    }

    #[test]
    fn renderer_start_and_end_wrap_prelude() {
        let mut buffer: SourceBuffer<String> = SourceBuffer::new();
        buffer.append_renderer_start();
        buffer.append_literal("x");
        buffer.append_renderer_end();

        assert_eq!(buffer.len(), 4);
        assert_eq!(
            linearize(&buffer),
            format!(
                "{}\n{}\nhtml += \"x\";\n{}",
                RENDERER_OPEN, RUNTIME_SOURCE, RENDERER_CLOSE
            )
        );
    }

    #[test]
    fn linearize_is_repeatable() {
        let mut buffer = SourceBuffer::new();
        buffer.append_renderer_start();
        buffer.append_literal("<b>");
        buffer.append_expression("data.v".to_string());
        buffer.append_literal("</b>");
        buffer.append_renderer_end();

        let first = linearize(&buffer);
        let second = linearize(&buffer);
        assert_eq!(first, second);
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn compiler_errors_propagate_unchanged() {
        let mut buffer = SourceBuffer::new();
        buffer.append_literal("<i>");
        buffer.append_expression("   ".to_string());
        assert_eq!(
            buffer.linearize(&SourceExpr::default()),
            Err(SourceExprError::EmptyExpression)
        );
    }
}
