//! JSON export.
//!
//! [`JsonExporter`] writes either the full rendering payload (`nodes` and
//! `edges`) or the flat list of node positions.

use std::io::Write;

use log::{debug, error};

use super::{Error, Exporter};
use crate::layout::Layout;

/// What a [`JsonExporter`] writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonContent {
    /// Nodes and edges, as consumed by a renderer.
    #[default]
    Layout,
    /// `[{ id, entityId?, type, x, y }]` for callers that persist positions.
    Positions,
}

/// Writes a layout as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    content: JsonContent,
    pretty: bool,
}

impl JsonExporter {
    pub fn new(content: JsonContent) -> Self {
        Self {
            content,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn write_value<T: serde::Serialize>(&self, value: &T, out: &mut dyn Write) -> Result<(), Error> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)
        } else {
            serde_json::to_writer(&mut *out, value)
        };

        result.map_err(|err| {
            error!(err:err; "Failed to write JSON");
            if err.is_io() {
                Error::Io(err.into())
            } else {
                Error::Render(err.to_string())
            }
        })
    }
}

impl Exporter for JsonExporter {
    fn export_layout(&self, layout: &Layout, out: &mut dyn Write) -> Result<(), Error> {
        debug!(content:? = self.content, pretty = self.pretty; "Writing JSON");
        match self.content {
            JsonContent::Layout => self.write_value(layout, out)?,
            JsonContent::Positions => self.write_value(&layout.positions(), out)?,
        }
        if self.pretty {
            writeln!(out)?;
        }
        Ok(())
    }
}
