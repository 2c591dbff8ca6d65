//! Error adapter for converting CoursemapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Catalog decoding errors carry the input text, so their line and column
//! are turned into a labeled span pointing into the catalog.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use coursemap::CoursemapError;

/// Adapter for catalog decoding errors.
pub struct InputAdapter<'a> {
    err: &'a serde_json::Error,
    /// Catalog text for displaying snippets
    src: &'a str,
}

impl<'a> InputAdapter<'a> {
    /// Create a new input adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte offset of the error position reported by the decoder.
    fn offset(&self) -> usize {
        let line_start: usize = self
            .src
            .split_inclusive('\n')
            .take(self.err.line().saturating_sub(1))
            .map(str::len)
            .sum();
        (line_start + self.err.column().saturating_sub(1)).min(self.src.len())
    }

    fn span(&self) -> SourceSpan {
        let offset = self.offset();
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid catalog: {}", self.err)
    }
}

impl std::error::Error for InputAdapter<'_> {}

impl MietteDiagnostic for InputAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("coursemap::input"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "a catalog is an object with `courses`, `modules` and `lessons` arrays",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = match self.err.classify() {
            serde_json::error::Category::Syntax => "syntax error here",
            serde_json::error::Category::Eof => "input ends here",
            _ => "unexpected value here",
        };
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(label.to_string()),
            self.span(),
        ))))
    }
}

/// Adapter for [`CoursemapError`] variants without source text.
pub struct ErrorAdapter<'a>(pub &'a CoursemapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CoursemapError::Io(_) => "coursemap::io",
            CoursemapError::Input { .. } => "coursemap::input",
            CoursemapError::Config(_) => "coursemap::config",
            CoursemapError::Export(_) => "coursemap::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CoursemapError::Config(_) => Some(Box::new(
                "check the [layout] and [style] sections of the configuration file",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A catalog error with source location information.
    Input(InputAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Input(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Input(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Input(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Input(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CoursemapError`] into a list of reportable errors.
pub fn to_reportables(err: &CoursemapError) -> Vec<Reportable<'_>> {
    match err {
        CoursemapError::Input { err, src } => vec![Reportable::Input(InputAdapter::new(err, src))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_error(src: &str) -> CoursemapError {
        let err = serde_json::from_str::<coursemap::catalog::Catalog>(src).unwrap_err();
        CoursemapError::new_input_error(err, src)
    }

    #[test]
    fn test_input_error_points_at_offending_token() {
        let src = "{\n  \"courses\": [\n    { \"id\": 7, \"title\": \"x\" }\n  ]\n}";
        let err = input_error(src);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        let Reportable::Input(adapter) = &reportables[0] else {
            panic!("Expected Input");
        };

        let labels: Vec<LabeledSpan> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        // The decoder reports the position right after the bad value on line 3
        let line_three = src.find("    {").unwrap();
        assert!(labels[0].offset() > line_three);
        assert!(labels[0].offset() < src.find("  ]").unwrap());
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "coursemap::input"
        );
    }

    #[test]
    fn test_span_at_end_of_input_is_empty() {
        let src = "{ \"courses\": [";
        let err = input_error(src);
        let mut reportables = to_reportables(&err);
        let Reportable::Input(adapter) = reportables.remove(0) else {
            panic!("Expected Input");
        };
        let span = adapter.span();
        assert!(span.offset() <= src.len());
        if span.offset() == src.len() {
            assert_eq!(span.len(), 0);
        }
    }

    #[test]
    fn test_non_input_error() {
        let err = CoursemapError::Config("`padding` must not be negative, got -1".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Configuration error: `padding` must not be negative, got -1"
                );
                assert_eq!(e.code().unwrap().to_string(), "coursemap::config");
                assert!(e.help().is_some());
            }
            Reportable::Input(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_io_error_code() {
        let err = CoursemapError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "coursemap::io");
    }
}
