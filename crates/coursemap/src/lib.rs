//! Coursemap - radial knowledge-graph layout for course catalogs.
//!
//! Loading, layout, and rendering of course → module → lesson forests. The
//! root sits at the origin, courses take the four cardinal directions,
//! modules branch out from their course, and lessons fan out around their
//! module while every box steers clear of the ones placed before it.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use coursemap_core::{catalog, color, geometry};

pub use error::CoursemapError;

use log::{debug, info, trace};

use catalog::Catalog;
use config::AppConfig;
use export::{
    json::{JsonContent, JsonExporter},
    svg::SvgBuilder,
};
use layout::{Engine, Layout};

/// Builder for loading, laying out and rendering course maps.
///
/// # Examples
///
/// ```rust
/// use coursemap::{MapBuilder, config::AppConfig};
///
/// let source = r#"{
///     "courses": [{ "id": "design", "title": "Design" }],
///     "modules": [{ "id": "type", "title": "Typography", "course_id": "design" }]
/// }"#;
///
/// let builder = MapBuilder::new(AppConfig::default());
///
/// // Parse the catalog
/// let catalog = builder.parse(source).expect("Failed to parse");
///
/// // Compute the layout
/// let layout = builder.layout(&catalog).expect("Failed to lay out");
/// assert_eq!(layout.nodes().len(), 3);
///
/// // Render it
/// let json = builder.render_json(&layout).expect("Failed to render");
/// assert!(json.contains("module:type"));
/// ```
#[derive(Default)]
pub struct MapBuilder {
    config: AppConfig,
}

impl MapBuilder {
    /// Create a new map builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse catalog JSON into a [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns [`CoursemapError::Input`] if the text is not a valid catalog.
    pub fn parse(&self, source: &str) -> Result<Catalog, CoursemapError> {
        info!("Parsing catalog");

        let catalog: Catalog = serde_json::from_str(source)
            .map_err(|err| CoursemapError::new_input_error(err, source))?;

        debug!(
            courses_len = catalog.courses.len(),
            modules_len = catalog.modules.len(),
            lessons_len = catalog.lessons.len();
            "Catalog parsed successfully",
        );
        trace!(catalog:?; "Parsed catalog");

        Ok(catalog)
    }

    /// Compute the layout of `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CoursemapError::Config`] if the layout configuration is
    /// invalid. The layout itself always succeeds.
    pub fn layout(&self, catalog: &Catalog) -> Result<Layout, CoursemapError> {
        self.config
            .layout()
            .validate()
            .map_err(CoursemapError::Config)?;

        let engine = Engine::new(self.config.layout().clone());
        let layout = engine.compute(&catalog.courses, &catalog.modules, &catalog.lessons);

        let diagnostics = layout.diagnostics();
        info!(
            nodes_len = layout.nodes().len(),
            skipped_len = diagnostics.skipped.len(),
            unresolved_len = diagnostics.unresolved.len();
            "Layout calculated",
        );

        Ok(layout)
    }

    /// Render the nodes and edges of `layout` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoursemapError::Export`] if serialization fails.
    pub fn render_json(&self, layout: &Layout) -> Result<String, CoursemapError> {
        let exporter = JsonExporter::new(JsonContent::Layout).with_pretty(true);
        Ok(export::export_to_string(&exporter, layout)?)
    }

    /// Render the node positions of `layout` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoursemapError::Export`] if serialization fails.
    pub fn render_positions(&self, layout: &Layout) -> Result<String, CoursemapError> {
        let exporter = JsonExporter::new(JsonContent::Positions).with_pretty(true);
        Ok(export::export_to_string(&exporter, layout)?)
    }

    /// Render `layout` as an SVG preview.
    ///
    /// # Errors
    ///
    /// Returns [`CoursemapError::Export`] if a configured color is invalid.
    pub fn render_svg(&self, layout: &Layout) -> Result<String, CoursemapError> {
        let exporter = SvgBuilder::new().with_style(self.config.style()).build()?;
        let svg = export::export_to_string(&exporter, layout)?;

        info!("SVG rendered successfully");
        Ok(svg)
    }
}
