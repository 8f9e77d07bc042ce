//! Diagnostic reporting with source locations
//!
//! Errors carry labelled spans but no source text; this module attaches the
//! source and renders them with miette.

use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource, Report};
use std::sync::Arc;

use crate::error::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Wrap `error` in a miette report that knows its source
pub fn report(error: Error, source: &SourceFile) -> Report {
    Report::new(error).with_source_code(source.to_named_source())
}

/// Render `error` as plain text (no colors) with its source snippet
pub fn render(error: Error, source: &SourceFile) -> String {
    let report = report(error, source);
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, &*report).is_err() {
        return report.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;

    #[test]
    fn test_render_includes_message_label_and_file() {
        let source = SourceFile::new("main.sl", "print(y);");
        let err = Error::UndefinedVariable {
            name: "y".to_string(),
            span: Span::new(6, 7).into(),
        };
        let text = render(err, &source);
        assert!(text.contains("Undefined variable `y`"), "{text}");
        assert!(text.contains("not found in this scope"), "{text}");
        assert!(text.contains("main.sl"), "{text}");
    }
}
