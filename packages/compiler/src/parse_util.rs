//! Parse Utilities
//!
//! Source files, locations and spans shared by the markup and expression parsers.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Arc<Self> {
        Arc::new(ParseSourceFile {
            content: content.into(),
            url: url.into(),
        })
    }

    /// Resolve a byte offset into a zero-based line/column location.
    pub fn location(self: &Arc<Self>, offset: usize) -> ParseLocation {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &self.content[..offset];
        let line = before.matches('\n').count();
        let col = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count(),
            None => before.chars().count(),
        };
        ParseLocation::new(Arc::clone(self), offset, line, col)
    }

    pub fn span(self: &Arc<Self>, start: usize, end: usize) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(start), self.location(end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocation {
    pub file: Arc<ParseSourceFile>,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: Arc<ParseSourceFile>, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation {
            file,
            offset,
            line,
            col,
        }
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    /// The source text covered by this span.
    pub fn text(&self) -> &str {
        self.start
            .file
            .content
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: impl Into<String>) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level: ParseErrorLevel::Error,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.msg, self.span.start)
    }
}

impl std::error::Error for ParseError {}

/// Replace every character that cannot appear in an identifier with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_line_and_column() {
        let file = ParseSourceFile::new("<div>\n  {{ a }}\n</div>", "tpl.html");
        let loc = file.location(8);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.col, 2);
        assert_eq!(loc.to_string(), "tpl.html@1:2");
    }

    #[test]
    fn should_slice_span_text() {
        let file = ParseSourceFile::new("<span>hi</span>", "a");
        assert_eq!(file.span(6, 8).text(), "hi");
    }

    #[test]
    fn should_render_error_with_location() {
        let file = ParseSourceFile::new("<p>", "t");
        let err = ParseError::new(file.span(0, 3), "Unclosed element \"p\"");
        assert_eq!(err.to_string(), "Unclosed element \"p\" (t@0:0)");
    }
}
