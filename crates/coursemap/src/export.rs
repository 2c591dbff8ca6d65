//! Export functionality for computed layouts.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a [`Layout`] in an output format. It is the final stage in the
//! Coursemap pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Catalog JSON
//!     ↓ parse
//! Catalog (courses, modules, lessons)
//!     ↓ layout
//! Layout (placed nodes and edges)
//!     ↓ export (this module)
//! Output
//! ```
//!
//! # Available Backends
//!
//! - [`json`]: the layout payload or the plain positions list
//! - [`svg`]: a static preview via [`svg::SvgBuilder`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`CoursemapError::Export`] at the crate
//! boundary.
//!
//! [`CoursemapError::Export`]: crate::CoursemapError::Export

pub mod json;
pub mod svg;

use std::io::{self, Write};

use crate::layout::Layout;

/// Abstraction for layout export backends.
pub trait Exporter {
    /// Writes `layout` to `out` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_layout(&self, layout: &Layout, out: &mut dyn Write) -> Result<(), Error>;
}

/// Errors that can occur during layout export.
///
/// This type is converted into [`CoursemapError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`CoursemapError::Export`]: crate::CoursemapError::Export
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    #[error("Render error: {0}")]
    Render(String),
    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Runs `exporter` into memory and returns the output as a string.
pub(crate) fn export_to_string(exporter: &dyn Exporter, layout: &Layout) -> Result<String, Error> {
    let mut buffer = Vec::new();
    exporter.export_layout(layout, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| Error::Render(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct RawExporter;

    impl Exporter for RawExporter {
        fn export_layout(&self, _layout: &Layout, out: &mut dyn Write) -> Result<(), Error> {
            out.write_all(b"layout")?;
            Ok(())
        }
    }

    #[test]
    fn test_error_display_and_source() {
        let render = Error::Render("bad color".to_string());
        assert_eq!(render.to_string(), "Render error: bad color");
        assert!(render.source().is_none());

        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: closed");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_write_failure_surfaces_as_io_error() {
        let result = RawExporter.export_layout(&Layout::default(), &mut FailingWriter);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_export_to_string() {
        let text = export_to_string(&RawExporter, &Layout::default()).unwrap();
        assert_eq!(text, "layout");
    }
}
