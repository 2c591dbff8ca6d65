//! Configuration types for knowledge-graph layout and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as the CLI's TOML file. Every field is optional in
//! the serialized form and falls back to the defaults documented below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Radii, capacities, box sizes and collision search parameters.
//! - [`StyleConfig`] - Colors used by the SVG preview.
//!
//! # Example
//!
//! ```
//! # use coursemap::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().validate().is_ok());
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use coursemap_core::{color::Color, geometry::Size};

use crate::layout::NodeKind;

/// Number of cardinal directions available to courses.
pub const MAX_COURSE_SLOTS: usize = 4;

/// Number of branch directions available to the modules of one course.
pub const MAX_BRANCH_SLOTS: usize = 3;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Width and height of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoxSize {
    width: f32,
    height: f32,
}

impl BoxSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Box dimensions for each node kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoxSizes {
    root: BoxSize,
    course: BoxSize,
    module: BoxSize,
    lesson: BoxSize,
}

impl Default for BoxSizes {
    fn default() -> Self {
        Self {
            root: BoxSize::new(160.0, 60.0),
            course: BoxSize::new(180.0, 56.0),
            module: BoxSize::new(160.0, 48.0),
            lesson: BoxSize::new(140.0, 40.0),
        }
    }
}

impl BoxSizes {
    /// Returns the box size used for nodes of `kind`.
    pub fn size(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Root => self.root,
            NodeKind::Course => self.course,
            NodeKind::Module => self.module,
            NodeKind::Lesson => self.lesson,
        }
        .to_size()
    }

    fn iter(&self) -> impl Iterator<Item = BoxSize> {
        [self.root, self.course, self.module, self.lesson].into_iter()
    }
}

/// Geometry parameters of the radial layout.
///
/// The course and branch capacities mirror the platform's fixed taxonomy of
/// four course tracks. They may be lowered but never raised above the number
/// of directions the radial scheme provides ([`MAX_COURSE_SLOTS`] and
/// [`MAX_BRANCH_SLOTS`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance from the root to every course.
    course_radius: f32,
    /// Distance from a course to each of its modules.
    module_radius: f32,
    /// Distance from a module to each of its lessons.
    lesson_radius: f32,
    /// Angular share each lesson adds to its module's fan, in degrees.
    lesson_arc_degrees: f32,
    max_courses: usize,
    max_module_branches: usize,
    /// Margin added on every side of a node box before collision checks.
    padding: f32,
    /// Number of spiral candidates tried before accepting an overlap.
    collision_attempts: usize,
    /// Angle advanced per spiral attempt, in degrees.
    spiral_step_degrees: f32,
    /// Radius gained per spiral attempt.
    spiral_growth: f32,
    boxes: BoxSizes,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            course_radius: 420.0,
            module_radius: 260.0,
            lesson_radius: 170.0,
            lesson_arc_degrees: 30.0,
            max_courses: MAX_COURSE_SLOTS,
            max_module_branches: MAX_BRANCH_SLOTS,
            padding: 10.0,
            collision_attempts: 48,
            spiral_step_degrees: 35.0,
            spiral_growth: 12.0,
            boxes: BoxSizes::default(),
        }
    }
}

impl LayoutConfig {
    pub fn course_radius(&self) -> f32 {
        self.course_radius
    }

    pub fn module_radius(&self) -> f32 {
        self.module_radius
    }

    pub fn lesson_radius(&self) -> f32 {
        self.lesson_radius
    }

    /// Angular share per lesson, in radians.
    pub fn lesson_arc(&self) -> f32 {
        self.lesson_arc_degrees.to_radians()
    }

    /// Effective course capacity, clamped to the available cardinal directions.
    pub fn max_courses(&self) -> usize {
        self.max_courses.min(MAX_COURSE_SLOTS)
    }

    /// Effective module capacity per course, clamped to the available branches.
    pub fn max_module_branches(&self) -> usize {
        self.max_module_branches.min(MAX_BRANCH_SLOTS)
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn collision_attempts(&self) -> usize {
        self.collision_attempts
    }

    /// Spiral angle step, in radians.
    pub fn spiral_step(&self) -> f32 {
        self.spiral_step_degrees.to_radians()
    }

    pub fn spiral_growth(&self) -> f32 {
        self.spiral_growth
    }

    pub fn boxes(&self) -> &BoxSizes {
        &self.boxes
    }

    /// Largest distance the collision search may move a node from its desired position.
    pub fn max_nudge(&self) -> f32 {
        self.collision_attempts as f32 * self.spiral_growth
    }

    pub fn with_radii(mut self, course: f32, module: f32, lesson: f32) -> Self {
        self.course_radius = course;
        self.module_radius = module;
        self.lesson_radius = lesson;
        self
    }

    pub fn with_capacity(mut self, max_courses: usize, max_module_branches: usize) -> Self {
        self.max_courses = max_courses;
        self.max_module_branches = max_module_branches;
        self
    }

    pub fn with_collision_search(mut self, attempts: usize, step_degrees: f32, growth: f32) -> Self {
        self.collision_attempts = attempts;
        self.spiral_step_degrees = step_degrees;
        self.spiral_growth = growth;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_lesson_arc_degrees(mut self, degrees: f32) -> Self {
        self.lesson_arc_degrees = degrees;
        self
    }

    /// Checks that every parameter describes a usable geometry.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let radii = [
            ("course_radius", self.course_radius),
            ("module_radius", self.module_radius),
            ("lesson_radius", self.lesson_radius),
        ];
        for (name, value) in radii {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("`{name}` must be a positive number, got {value}"));
            }
        }

        if !(self.lesson_arc_degrees.is_finite() && self.lesson_arc_degrees >= 0.0) {
            return Err(format!(
                "`lesson_arc_degrees` must not be negative, got {}",
                self.lesson_arc_degrees
            ));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(format!("`padding` must not be negative, got {}", self.padding));
        }
        if self.collision_attempts > 0 {
            if !(self.spiral_step_degrees.is_finite() && self.spiral_step_degrees != 0.0) {
                return Err("`spiral_step_degrees` must be non-zero".to_string());
            }
            if !(self.spiral_growth.is_finite() && self.spiral_growth > 0.0) {
                return Err(format!(
                    "`spiral_growth` must be a positive number, got {}",
                    self.spiral_growth
                ));
            }
        }
        if self
            .boxes
            .iter()
            .any(|b| !(b.width.is_finite() && b.width > 0.0 && b.height.is_finite() && b.height > 0.0))
        {
            return Err("box sizes must have positive width and height".to_string());
        }

        Ok(())
    }
}

/// Visual styling configuration for the SVG preview.
///
/// Fields that are not set fall back to the platform palette.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color of the document, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,

    #[serde(default)]
    root_color: Option<String>,

    #[serde(default)]
    course_color: Option<String>,

    #[serde(default)]
    module_color: Option<String>,

    #[serde(default)]
    lesson_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the stroke color for edges.
    pub fn edge_color(&self) -> Result<Color, String> {
        parse_or_default(self.edge_color.as_deref(), "#9ca3af", "edge")
    }

    /// Returns the fill color for nodes of `kind`.
    pub fn node_color(&self, kind: NodeKind) -> Result<Color, String> {
        let (configured, fallback) = match kind {
            NodeKind::Root => (&self.root_color, "#1f2937"),
            NodeKind::Course => (&self.course_color, "#6366f1"),
            NodeKind::Module => (&self.module_color, "#f59e0b"),
            NodeKind::Lesson => (&self.lesson_color, "#10b981"),
        };
        parse_or_default(configured.as_deref(), fallback, kind.as_str())
    }
}

fn parse_or_default(configured: Option<&str>, fallback: &str, what: &str) -> Result<Color, String> {
    Color::new(configured.unwrap_or(fallback))
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}
