//! Knowledge-graph layout.
//!
//! The [`Engine`] turns a catalog forest (courses → modules → lessons) into a
//! [`Layout`]: positioned node boxes plus parent→child edges annotated with
//! the sides they leave and enter through. Layouts are recomputed from
//! scratch on every call and carry no state between calls.

mod collision;
mod direction;
mod engine;
mod fan;

pub use direction::{Cardinal, Compass};
pub use engine::{Engine, compute_layout};
pub use fan::{Fan, MAX_FAN_FRACTION};

use serde::Serialize;

use coursemap_core::geometry::{Bounds, Insets, Point, Size};

/// Id of the synthetic node every course hangs from.
pub const ROOT_ID: &str = "root";

/// Semantic type of a placed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Course,
    Module,
    Lesson,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Course => "course",
            Self::Module => "module",
            Self::Lesson => "lesson",
        }
    }

    /// Builds the namespaced node id for a record of this kind.
    ///
    /// Records of different kinds may share an id in the catalog, so node ids
    /// are prefixed with their kind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coursemap::layout::NodeKind;
    /// assert_eq!(NodeKind::Module.node_id("typography"), "module:typography");
    /// assert_eq!(NodeKind::Root.node_id("ignored"), "root");
    /// ```
    pub fn node_id(self, entity_id: &str) -> String {
        match self {
            Self::Root => ROOT_ID.to_string(),
            _ => format!("{}:{entity_id}", self.as_str()),
        }
    }
}

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Chooses the (parent exit, child entry) sides for a child displaced by
    /// `delta` from its parent.
    ///
    /// The dominant axis decides the pair; ties go to the vertical pair.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coursemap::layout::Side;
    /// # use coursemap_core::geometry::Point;
    /// // Child far to the right and slightly below
    /// assert_eq!(Side::for_displacement(Point::new(200.0, 30.0)), (Side::Right, Side::Left));
    /// // Child above (negative Y is up)
    /// assert_eq!(Side::for_displacement(Point::new(10.0, -90.0)), (Side::Top, Side::Bottom));
    /// ```
    pub fn for_displacement(delta: Point) -> (Self, Self) {
        let exit = if delta.x().abs() > delta.y().abs() {
            if delta.x() >= 0.0 { Self::Right } else { Self::Left }
        } else if delta.y() >= 0.0 {
            Self::Bottom
        } else {
            Self::Top
        };
        (exit, exit.opposite())
    }

    /// Midpoint of this side of `bounds`.
    pub fn anchor(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            Self::Top => Point::new(center.x(), bounds.min_y()),
            Self::Right => Point::new(bounds.max_x(), center.y()),
            Self::Bottom => Point::new(center.x(), bounds.max_y()),
            Self::Left => Point::new(bounds.min_x(), center.y()),
        }
    }

    /// Outward unit normal of this side.
    pub fn normal(self) -> Point {
        match self {
            Self::Top => Point::new(0.0, -1.0),
            Self::Right => Point::new(1.0, 0.0),
            Self::Bottom => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
        }
    }
}

/// Style tag of an edge.
///
/// Layout only ever produces [`EdgeKind::Required`]. Callers restyle edges
/// with the platform's prerequisite vocabulary via [`PlacedEdge::with_kind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Required,
    Recommended,
    Alternative,
}

/// A node with its final position and box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    title: String,
    x: f32,
    y: f32,
    box_width: f32,
    box_height: f32,
    /// Side through which the edge from the parent enters.
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<Side>,
}

impl PlacedNode {
    pub(crate) fn new(
        kind: NodeKind,
        entity_id: Option<&str>,
        title: &str,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id: kind.node_id(entity_id.unwrap_or_default()),
            kind,
            entity_id: entity_id.map(str::to_string),
            title: title.to_string(),
            x: position.x(),
            y: position.y(),
            box_width: size.width(),
            box_height: size.height(),
            side: None,
        }
    }

    pub(crate) fn set_side(&mut self, side: Side) {
        self.side = Some(side);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Id of the catalog record this node represents; `None` for the root.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Center of the node box
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }

    pub fn bounds(&self) -> Bounds {
        self.position().to_bounds(self.size())
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }
}

/// A parent→child connection with its attachment sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedEdge {
    id: String,
    source_id: String,
    target_id: String,
    source_side: Side,
    target_side: Side,
    #[serde(rename = "type")]
    kind: EdgeKind,
}

impl PlacedEdge {
    pub(crate) fn new(source_id: &str, target_id: &str, sides: (Side, Side)) -> Self {
        Self {
            id: format!("{source_id}->{target_id}"),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            source_side: sides.0,
            target_side: sides.1,
            kind: EdgeKind::Required,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn source_side(&self) -> Side {
        self.source_side
    }

    pub fn target_side(&self) -> Side {
        self.target_side
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Returns this edge retagged as `kind`; ids and sides are unchanged.
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Why a catalog record did not receive a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// All cardinal directions were already taken.
    CourseCapacity,
    /// All branch directions of the owning course were already taken.
    BranchCapacity,
    /// An earlier record of the same kind used the same id.
    DuplicateId,
    /// The referenced parent does not exist or was itself skipped.
    ParentNotPlaced,
    /// The lesson has no module.
    Unattached,
}

/// A catalog record left out of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntity {
    pub kind: NodeKind,
    pub entity_id: String,
    pub reason: SkipReason,
}

/// A node whose collision search ran out of attempts.
///
/// Such a node sits at its desired position and may overlap earlier boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedCollision {
    pub node_id: String,
    pub desired: Point,
}

/// Side information about a computed layout.
///
/// Never part of the rendering payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDiagnostics {
    pub skipped: Vec<SkippedEntity>,
    pub unresolved: Vec<UnresolvedCollision>,
}

impl LayoutDiagnostics {
    /// Returns the desired position of `node_id` if its collision search failed.
    pub fn unresolved_desired(&self, node_id: &str) -> Option<Point> {
        self.unresolved
            .iter()
            .find(|u| u.node_id == node_id)
            .map(|u| u.desired)
    }
}

/// Position of a node as plain numbers, for callers that persist positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<&'a str>,
    #[serde(rename = "type")]
    kind: NodeKind,
    x: f32,
    y: f32,
}

/// Result of a layout computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    nodes: Vec<PlacedNode>,
    edges: Vec<PlacedEdge>,
    #[serde(skip)]
    diagnostics: LayoutDiagnostics,
}

impl Layout {
    pub(crate) fn new(
        nodes: Vec<PlacedNode>,
        edges: Vec<PlacedEdge>,
        diagnostics: LayoutDiagnostics,
    ) -> Self {
        Self {
            nodes,
            edges,
            diagnostics,
        }
    }

    /// Nodes in placement order: root, courses, modules, lessons.
    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    /// Edges in order root→course, course→module, module→lesson.
    pub fn edges(&self) -> &[PlacedEdge] {
        &self.edges
    }

    pub fn diagnostics(&self) -> &LayoutDiagnostics {
        &self.diagnostics
    }

    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Bounds enclosing every node box.
    pub fn bounds(&self) -> Bounds {
        let Some((first, rest)) = self.nodes.split_first() else {
            return Bounds::default();
        };
        rest.iter()
            .fold(first.bounds(), |acc, node| acc.merge(&node.bounds()))
    }

    /// Number of node pairs whose boxes, grown by `padding`, overlap.
    pub fn overlap_count(&self, padding: f32) -> usize {
        let insets = Insets::uniform(padding);
        let boxes: Vec<Bounds> = self
            .nodes
            .iter()
            .map(|node| node.bounds().add_padding(insets))
            .collect();

        boxes
            .iter()
            .enumerate()
            .map(|(i, a)| boxes[i + 1..].iter().filter(|b| a.intersects(b)).count())
            .sum()
    }

    /// Node positions as plain numeric records.
    pub fn positions(&self) -> Vec<NodePosition<'_>> {
        self.nodes
            .iter()
            .map(|node| NodePosition {
                id: &node.id,
                entity_id: node.entity_id.as_deref(),
                kind: node.kind,
                x: node.x,
                y: node.y,
            })
            .collect()
    }
}
