//! SVG preview export.
//!
//! Draws every node as a rounded box filled by kind with its title centred
//! inside, and every edge as a cubic curve from the parent's exit side to the
//! child's entry side. The curve leaves and enters along the side normals so
//! the attachment sides stay visible.

use std::io::Write;

use log::{debug, error, info};
use svg::{
    Document,
    node::{
        Text as SvgText,
        element::{self as svg_element, Group},
    },
};

use coursemap_core::{color::Color, geometry::Point};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    layout::{Layout, NodeKind, PlacedEdge, PlacedNode},
};

/// Space between the outermost boxes and the document edge.
const MARGIN: f32 = 40.0;
/// Corner radius of node boxes.
const CORNER_RADIUS: f32 = 8.0;
const FONT_SIZE: f32 = 13.0;
const FONT_FAMILY: &str = "sans-serif";
const EDGE_WIDTH: f32 = 1.5;

/// Colors resolved from a [`StyleConfig`].
#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    edge: Color,
    root: Color,
    course: Color,
    module: Color,
    lesson: Color,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: style.background_color()?,
            edge: style.edge_color()?,
            root: style.node_color(NodeKind::Root)?,
            course: style.node_color(NodeKind::Course)?,
            module: style.node_color(NodeKind::Module)?,
            lesson: style.node_color(NodeKind::Lesson)?,
        })
    }

    fn node(&self, kind: NodeKind) -> &Color {
        match kind {
            NodeKind::Root => &self.root,
            NodeKind::Course => &self.course,
            NodeKind::Module => &self.module,
            NodeKind::Lesson => &self.lesson,
        }
    }
}

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    style: Option<&'a StyleConfig>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Resolves the style and creates the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color cannot be parsed.
    pub fn build(self) -> Result<Svg, Error> {
        let default_style = StyleConfig::default();
        let style = self.style.unwrap_or(&default_style);
        let palette = Palette::from_style(style).map_err(|err| {
            error!(err = err.as_str(); "Invalid style for SVG export");
            Error::Render(err)
        })?;
        Ok(Svg { palette })
    }
}

/// SVG exporter.
#[derive(Debug, Clone)]
pub struct Svg {
    palette: Palette,
}

impl Svg {
    fn render_node(&self, node: &PlacedNode) -> Group {
        let bounds = node.bounds();
        let center = node.position();
        let fill = self.palette.node(node.kind());

        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", CORNER_RADIUS)
            .set("fill", fill.to_string())
            .set("fill-opacity", fill.alpha());

        let text = svg_element::Text::new("")
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .set("fill", "white")
            .add(SvgText::new(node.title()));

        Group::new()
            .set("id", node.id())
            .set("class", node.kind().as_str())
            .add(rect)
            .add(text)
    }

    /// Cubic path between the two attachment anchors.
    fn edge_path_data(start: Point, start_normal: Point, end: Point, end_normal: Point) -> String {
        // Pull the control points out along the normals by half the span
        let reach = start.distance(end) / 2.0;
        let ctrl1 = start.add_point(start_normal.scale(reach));
        let ctrl2 = end.add_point(end_normal.scale(reach));

        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            start.x(),
            start.y(),
            ctrl1.x(),
            ctrl1.y(),
            ctrl2.x(),
            ctrl2.y(),
            end.x(),
            end.y()
        )
    }

    fn render_edge(&self, layout: &Layout, edge: &PlacedEdge) -> Option<svg_element::Path> {
        let source = layout.node(edge.source_id())?;
        let target = layout.node(edge.target_id())?;

        let start = edge.source_side().anchor(source.bounds());
        let end = edge.target_side().anchor(target.bounds());
        let data = Self::edge_path_data(
            start,
            edge.source_side().normal(),
            end,
            edge.target_side().normal(),
        );

        Some(
            svg_element::Path::new()
                .set("id", edge.id())
                .set("d", data)
                .set("fill", "none")
                .set("stroke", self.palette.edge.to_string())
                .set("stroke-opacity", self.palette.edge.alpha())
                .set("stroke-width", EDGE_WIDTH),
        )
    }

    /// Renders `layout` into an SVG document.
    pub fn render_document(&self, layout: &Layout) -> Document {
        let bounds = layout.bounds();
        let width = MARGIN.mul_add(2.0, bounds.width());
        let height = MARGIN.mul_add(2.0, bounds.height());
        let min_x = bounds.min_x() - MARGIN;
        let min_y = bounds.min_y() - MARGIN;

        debug!(width, height; "SVG dimensions");

        let mut doc = Document::new()
            .set("viewBox", format!("{min_x} {min_y} {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(background) = &self.palette.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", min_x)
                    .set("y", min_y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        // Edges first so boxes sit on top of them
        let edges = layout
            .edges()
            .iter()
            .filter_map(|edge| self.render_edge(layout, edge))
            .fold(Group::new().set("class", "edges"), |group, path| group.add(path));
        let nodes = layout
            .nodes()
            .iter()
            .map(|node| self.render_node(node))
            .fold(Group::new().set("class", "nodes"), |group, node| group.add(node));

        doc.add(edges).add(nodes)
    }
}

impl Exporter for Svg {
    fn export_layout(&self, layout: &Layout, out: &mut dyn Write) -> Result<(), Error> {
        let doc = self.render_document(layout);
        debug!("SVG document rendered");

        if let Err(err) = write!(out, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(Error::Io(err));
        }

        info!(nodes_len = layout.nodes().len(); "SVG written");
        Ok(())
    }
}
