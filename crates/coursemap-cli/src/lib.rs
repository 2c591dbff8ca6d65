//! CLI logic for the Coursemap layout tool.
//!
//! This module contains the core CLI logic: load configuration, read a
//! catalog, compute its layout, and write it in the requested format.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use coursemap::{CoursemapError, MapBuilder};

/// Run the Coursemap CLI application
///
/// This function processes the input catalog through the Coursemap pipeline
/// and writes the result to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CoursemapError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Catalog decoding errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CoursemapError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        format:? = args.format;
        "Processing catalog"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = MapBuilder::new(app_config);
    let catalog = builder.parse(&source)?;
    let layout = builder.layout(&catalog)?;

    for skipped in &layout.diagnostics().skipped {
        warn!(
            kind = skipped.kind.as_str(),
            entity_id = skipped.entity_id,
            reason:? = skipped.reason;
            "Record left out of the layout"
        );
    }

    let output = match args.format {
        OutputFormat::Json => builder.render_json(&layout)?,
        OutputFormat::Positions => builder.render_positions(&layout)?,
        OutputFormat::Svg => builder.render_svg(&layout)?,
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}
