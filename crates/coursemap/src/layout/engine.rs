//! Radial layout engine for course catalogs.
//!
//! Placement runs level by level so every lesson steers around every module:
//!
//! 1. the root at the origin,
//! 2. courses on the four cardinal directions at the course radius,
//! 3. modules on their course's branch directions at the module radius,
//! 4. lessons in a fan around their module at the lesson radius.
//!
//! Each box goes through the collision search before it is committed.
//! Records that do not fit the scheme are skipped and reported in
//! [`LayoutDiagnostics`]; the engine never fails.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use coursemap_core::{
    catalog::{Course, Lesson, Module},
    geometry::{Point, Size},
};

use super::{
    Cardinal, Compass, Fan, Layout, LayoutDiagnostics, NodeKind, PlacedEdge, PlacedNode, Side,
    SkipReason, SkippedEntity, UnresolvedCollision,
    collision::{Placement, PlacedBoxes, SpiralSearch},
};
use crate::config::LayoutConfig;

/// Title of the synthetic root node.
const ROOT_TITLE: &str = "Knowledge graph";

/// Computes a layout with the default configuration.
///
/// # Examples
///
/// ```
/// use coursemap::layout::compute_layout;
/// use coursemap_core::catalog::{Course, Module};
///
/// let courses = [Course::new("design", "Design")];
/// let modules = [Module::new("typography", "Typography", "design")];
/// let layout = compute_layout(&courses, &modules, &[]);
///
/// assert_eq!(layout.nodes().len(), 3);
/// assert_eq!(layout.edges().len(), 2);
/// ```
pub fn compute_layout(courses: &[Course], modules: &[Module], lessons: &[Lesson]) -> Layout {
    Engine::new(LayoutConfig::default()).compute(courses, modules, lessons)
}

/// Layout engine for course → module → lesson forests.
///
/// The engine holds only configuration; every call to [`Engine::compute`]
/// works on its own state, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Engine {
    config: LayoutConfig,
    search: SpiralSearch,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// A module that received a branch, remembered for lesson placement.
struct ModuleSlot<'a> {
    entity_id: &'a str,
    node_index: usize,
    branch: Compass,
}

/// A course that received a direction.
struct CourseSlot<'a> {
    entity_id: &'a str,
    node_index: usize,
    cardinal: Cardinal,
}

/// Working state of one layout run.
struct Run<'e> {
    engine: &'e Engine,
    boxes: PlacedBoxes,
    nodes: Vec<PlacedNode>,
    edges: Vec<PlacedEdge>,
    diagnostics: LayoutDiagnostics,
}

impl<'e> Run<'e> {
    fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            boxes: PlacedBoxes::new(engine.config.padding()),
            nodes: Vec::new(),
            edges: Vec::new(),
            diagnostics: LayoutDiagnostics::default(),
        }
    }

    fn size(&self, kind: NodeKind) -> Size {
        self.engine.config.boxes().size(kind)
    }

    /// Places a node near `desired` and returns its index.
    fn place(
        &mut self,
        kind: NodeKind,
        entity_id: Option<&str>,
        title: &str,
        desired: Point,
    ) -> usize {
        let size = self.size(kind);
        let placement = self.engine.search.place(&mut self.boxes, desired, size);
        let node = PlacedNode::new(kind, entity_id, title, placement.position(), size);

        match placement {
            Placement::Clear(_) => {}
            Placement::Nudged { position, attempt } => {
                trace!(
                    node_id = node.id(),
                    attempt,
                    dx = position.x() - desired.x(),
                    dy = position.y() - desired.y();
                    "Node nudged clear of overlap",
                );
            }
            Placement::Fallback(_) => {
                warn!(
                    node_id = node.id(),
                    attempts = self.engine.config.collision_attempts();
                    "No free position found, keeping desired position",
                );
                self.diagnostics.unresolved.push(UnresolvedCollision {
                    node_id: node.id().to_string(),
                    desired,
                });
            }
        }

        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Connects `parent` to `child`, recording the entry side on the child.
    fn connect(&mut self, parent: usize, child: usize, sides: (Side, Side)) {
        let edge = PlacedEdge::new(self.nodes[parent].id(), self.nodes[child].id(), sides);
        self.nodes[child].set_side(sides.1);
        self.edges.push(edge);
    }

    /// Connects using the displacement between the final positions.
    fn connect_by_position(&mut self, parent: usize, child: usize) {
        let delta = self.nodes[child]
            .position()
            .sub_point(self.nodes[parent].position());
        self.connect(parent, child, Side::for_displacement(delta));
    }

    fn skip(&mut self, kind: NodeKind, entity_id: &str, reason: SkipReason) {
        debug!(kind = kind.as_str(), entity_id, reason:?; "Skipping entity");
        self.diagnostics.skipped.push(SkippedEntity {
            kind,
            entity_id: entity_id.to_string(),
            reason,
        });
    }

    fn place_courses<'a>(&mut self, root: usize, courses: &'a [Course]) -> Vec<CourseSlot<'a>> {
        let config = &self.engine.config;
        let mut directions = Cardinal::ALL.into_iter().take(config.max_courses());
        let radius = config.course_radius();
        let origin = self.nodes[root].position();

        let mut seen = HashSet::new();
        let mut slots = Vec::new();

        for course in courses {
            if !seen.insert(course.id.as_str()) {
                self.skip(NodeKind::Course, &course.id, SkipReason::DuplicateId);
                continue;
            }
            let Some(cardinal) = directions.next() else {
                self.skip(NodeKind::Course, &course.id, SkipReason::CourseCapacity);
                continue;
            };

            let desired = cardinal.compass().offset(origin, radius);
            let index = self.place(NodeKind::Course, Some(&course.id), &course.title, desired);
            // Root edges follow the direction, not the nudged position
            self.connect(root, index, cardinal.edge_sides());
            slots.push(CourseSlot {
                entity_id: &course.id,
                node_index: index,
                cardinal,
            });
        }

        slots
    }

    fn place_modules<'a>(
        &mut self,
        courses: &[CourseSlot<'a>],
        modules: &'a [Module],
    ) -> Vec<ModuleSlot<'a>> {
        let placed_courses: HashSet<&str> = courses.iter().map(|c| c.entity_id).collect();

        let mut seen = HashSet::new();
        let mut by_course: IndexMap<&str, Vec<&Module>> = IndexMap::new();
        for module in modules {
            if !seen.insert(module.id.as_str()) {
                self.skip(NodeKind::Module, &module.id, SkipReason::DuplicateId);
            } else if !placed_courses.contains(module.course_id.as_str()) {
                self.skip(NodeKind::Module, &module.id, SkipReason::ParentNotPlaced);
            } else {
                by_course
                    .entry(module.course_id.as_str())
                    .or_default()
                    .push(module);
            }
        }

        let max_branches = self.engine.config.max_module_branches();
        let radius = self.engine.config.module_radius();
        let mut slots = Vec::new();

        for course in courses {
            let Some(children) = by_course.get(course.entity_id) else {
                continue;
            };
            let origin = self.nodes[course.node_index].position();
            let branches = course.cardinal.branches();

            for (i, module) in children.iter().enumerate() {
                if i >= max_branches {
                    self.skip(NodeKind::Module, &module.id, SkipReason::BranchCapacity);
                    continue;
                }
                let branch = branches[i];
                let desired = branch.offset(origin, radius);
                let index = self.place(NodeKind::Module, Some(&module.id), &module.title, desired);
                self.connect_by_position(course.node_index, index);
                slots.push(ModuleSlot {
                    entity_id: &module.id,
                    node_index: index,
                    branch,
                });
            }
        }

        slots
    }

    fn place_lessons(&mut self, modules: &[ModuleSlot<'_>], lessons: &[Lesson]) {
        let placed_modules: HashSet<&str> = modules.iter().map(|m| m.entity_id).collect();

        let mut seen = HashSet::new();
        let mut by_module: IndexMap<&str, Vec<&Lesson>> = IndexMap::new();
        for lesson in lessons {
            if !seen.insert(lesson.id.as_str()) {
                self.skip(NodeKind::Lesson, &lesson.id, SkipReason::DuplicateId);
                continue;
            }
            match lesson.module_id.as_deref() {
                None => self.skip(NodeKind::Lesson, &lesson.id, SkipReason::Unattached),
                Some(module_id) if !placed_modules.contains(module_id) => {
                    self.skip(NodeKind::Lesson, &lesson.id, SkipReason::ParentNotPlaced)
                }
                Some(module_id) => by_module.entry(module_id).or_default().push(lesson),
            }
        }

        let radius = self.engine.config.lesson_radius();
        let arc = self.engine.config.lesson_arc();

        for module in modules {
            let Some(children) = by_module.get(module.entity_id) else {
                continue;
            };
            let origin = self.nodes[module.node_index].position();
            let fan = Fan::new(module.branch.angle(), children.len(), arc);
            let desired: Vec<Point> = fan.positions(origin, radius).collect();

            for (lesson, desired) in children.iter().zip(desired) {
                let index = self.place(NodeKind::Lesson, Some(&lesson.id), &lesson.title, desired);
                self.connect_by_position(module.node_index, index);
            }
        }
    }

    fn finish(self) -> Layout {
        Layout::new(self.nodes, self.edges, self.diagnostics)
    }
}

impl Engine {
    /// Creates an engine using `config`.
    ///
    /// The configuration is used as given; call [`LayoutConfig::validate`]
    /// first when it comes from an untrusted source.
    pub fn new(config: LayoutConfig) -> Self {
        let search = SpiralSearch::new(
            config.collision_attempts(),
            config.spiral_step(),
            config.spiral_growth(),
        );
        Self { config, search }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the given records.
    ///
    /// The result is fully determined by the inputs and their order.
    pub fn compute(&self, courses: &[Course], modules: &[Module], lessons: &[Lesson]) -> Layout {
        info!(
            courses_len = courses.len(),
            modules_len = modules.len(),
            lessons_len = lessons.len();
            "Computing knowledge graph layout",
        );

        let mut run = Run::new(self);
        let root = run.place(NodeKind::Root, None, ROOT_TITLE, Point::default());

        let course_slots = run.place_courses(root, courses);
        let module_slots = run.place_modules(&course_slots, modules);
        run.place_lessons(&module_slots, lessons);

        let layout = run.finish();
        debug!(
            nodes_len = layout.nodes().len(),
            edges_len = layout.edges().len(),
            skipped_len = layout.diagnostics().skipped.len(),
            unresolved_len = layout.diagnostics().unresolved.len();
            "Layout computed",
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{PI, TAU};

    use float_cmp::approx_eq;

    use super::*;
    use crate::layout::MAX_FAN_FRACTION;

    fn courses(n: usize) -> Vec<Course> {
        (0..n)
            .map(|i| Course::new(format!("c{i}"), format!("Course {i}")))
            .collect()
    }

    fn modules_of(course: &str, n: usize) -> Vec<Module> {
        (0..n)
            .map(|i| Module::new(format!("{course}-m{i}"), format!("Module {i}"), course))
            .collect()
    }

    fn lessons_of(module: &str, n: usize) -> Vec<Lesson> {
        (0..n)
            .map(|i| Lesson::new(format!("{module}-l{i}"), format!("Lesson {i}"), module))
            .collect()
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_empty_input_yields_only_root() {
        let layout = compute_layout(&[], &[], &[]);

        assert_eq!(layout.nodes().len(), 1);
        assert!(layout.edges().is_empty());
        let root = &layout.nodes()[0];
        assert_eq!(root.kind(), NodeKind::Root);
        assert_eq!(root.id(), "root");
        assert!(root.position().is_zero());
        assert_eq!(root.side(), None);
    }

    #[test]
    fn test_four_courses_take_distinct_cardinals() {
        let layout = compute_layout(&courses(5), &[], &[]);
        let config = LayoutConfig::default();

        let placed: Vec<&PlacedNode> = layout.nodes_of_kind(NodeKind::Course).collect();
        assert_eq!(placed.len(), 4);
        assert!(layout.node("course:c4").is_none());

        let expected = [
            Point::new(0.0, -config.course_radius()),
            Point::new(config.course_radius(), 0.0),
            Point::new(0.0, config.course_radius()),
            Point::new(-config.course_radius(), 0.0),
        ];
        for (node, expected) in placed.iter().zip(expected) {
            assert_eq!(node.position(), expected);
            assert!(approx_eq!(f32, node.position().hypot(), config.course_radius()));
        }

        assert_eq!(
            layout.diagnostics().skipped,
            vec![SkippedEntity {
                kind: NodeKind::Course,
                entity_id: "c4".to_string(),
                reason: SkipReason::CourseCapacity,
            }]
        );
    }

    #[test]
    fn test_root_edges_use_cardinal_sides() {
        let layout = compute_layout(&courses(4), &[], &[]);
        let sides: Vec<(Side, Side)> = layout
            .edges()
            .iter()
            .map(|e| (e.source_side(), e.target_side()))
            .collect();
        assert_eq!(
            sides,
            vec![
                (Side::Top, Side::Bottom),
                (Side::Right, Side::Left),
                (Side::Bottom, Side::Top),
                (Side::Left, Side::Right),
            ]
        );
        assert!(layout.edges().iter().all(|e| e.source_id() == "root"));
    }

    #[test]
    fn test_branch_cap_skips_fourth_module() {
        let layout = compute_layout(&courses(1), &modules_of("c0", 4), &[]);

        assert_eq!(layout.nodes_of_kind(NodeKind::Module).count(), 3);
        assert!(layout.node("module:c0-m3").is_none());
        assert_eq!(layout.diagnostics().skipped.len(), 1);
        assert_eq!(
            layout.diagnostics().skipped[0].reason,
            SkipReason::BranchCapacity
        );
    }

    #[test]
    fn test_modules_of_north_course_branch_upward() {
        let layout = compute_layout(&courses(1), &modules_of("c0", 3), &[]);
        let course = layout.node("course:c0").unwrap().position();
        let radius = LayoutConfig::default().module_radius();

        let offsets: Vec<Point> = layout
            .nodes_of_kind(NodeKind::Module)
            .map(|m| m.position().sub_point(course))
            .collect();
        // north-west, north, north-east
        assert!(offsets[0].x() < 0.0 && offsets[0].y() < 0.0);
        assert!(approx_eq!(f32, offsets[1].x(), 0.0) && offsets[1].y() < 0.0);
        assert!(offsets[2].x() > 0.0 && offsets[2].y() < 0.0);
        for offset in offsets {
            assert!(approx_eq!(f32, offset.hypot(), radius, epsilon = 1e-3));
        }
    }

    #[test]
    fn test_all_lessons_placed_without_cap() {
        let mut lessons = lessons_of("c0-m0", 12);
        lessons.push(Lesson::unattached("loose", "Loose"));
        let layout = compute_layout(&courses(1), &modules_of("c0", 1), &lessons);

        assert_eq!(layout.nodes_of_kind(NodeKind::Lesson).count(), 12);
        assert_eq!(
            layout.diagnostics().skipped,
            vec![SkippedEntity {
                kind: NodeKind::Lesson,
                entity_id: "loose".to_string(),
                reason: SkipReason::Unattached,
            }]
        );
    }

    /// Angle between the two outermost lessons of a module, measured through the fan.
    fn fan_spread(n: usize) -> f32 {
        // Wide spacing keeps the fan free of collisions so positions stay as desired
        let config = LayoutConfig::default().with_radii(4000.0, 3000.0, 2000.0);
        let engine = Engine::new(config);
        let layout = engine.compute(&courses(1), &modules_of("c0", 1), &lessons_of("c0-m0", n));
        let module = layout.node("module:c0-m0").unwrap().position();
        let base = Compass::NorthWest.angle();

        let offsets: Vec<f32> = layout
            .nodes_of_kind(NodeKind::Lesson)
            .map(|l| {
                let angle = l.position().sub_point(module).angle() - base;
                // normalize relative to the base into [-PI, PI)
                (angle + PI).rem_euclid(TAU) - PI
            })
            .collect();
        let min = offsets.iter().cloned().fold(f32::MAX, f32::min);
        let max = offsets.iter().cloned().fold(f32::MIN, f32::max);
        max - min
    }

    #[test]
    fn test_fan_spread_is_monotonic_and_capped() {
        let mut previous = 0.0;
        for n in 2..=14 {
            let spread = fan_spread(n);
            assert!(spread + 1e-3 >= previous, "spread shrank at {n}");
            assert!(spread <= MAX_FAN_FRACTION * TAU + 1e-3);
            previous = spread;
        }
        assert!(approx_eq!(f32, fan_spread(14), MAX_FAN_FRACTION * TAU, epsilon = 1e-3));
    }

    #[test]
    fn test_orphans_and_duplicates_are_skipped() {
        let mut modules = modules_of("c0", 1);
        modules.push(Module::new("ghost-m", "Ghost", "missing"));
        modules.push(Module::new("c0-m0", "Again", "c0"));
        let lessons = vec![
            Lesson::new("l1", "One", "c0-m0"),
            Lesson::new("l2", "Two", "ghost-m"),
            Lesson::new("l1", "One again", "c0-m0"),
        ];
        let layout = compute_layout(&courses(1), &modules, &lessons);

        let reasons: Vec<(&str, SkipReason)> = layout
            .diagnostics()
            .skipped
            .iter()
            .map(|s| (s.entity_id.as_str(), s.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("ghost-m", SkipReason::ParentNotPlaced),
                ("c0-m0", SkipReason::DuplicateId),
                ("l2", SkipReason::ParentNotPlaced),
                ("l1", SkipReason::DuplicateId),
            ]
        );
        assert_eq!(layout.nodes().len(), 4);
        assert_eq!(layout.node("module:c0-m0").unwrap().title(), "Module 0");
    }

    #[test]
    fn test_modules_of_capacity_skipped_course_are_skipped() {
        let mut modules = modules_of("c4", 2);
        modules.extend(modules_of("c0", 1));
        let layout = compute_layout(&courses(5), &modules, &[]);

        assert_eq!(layout.nodes_of_kind(NodeKind::Module).count(), 1);
        assert!(
            layout
                .diagnostics()
                .skipped
                .iter()
                .filter(|s| s.kind == NodeKind::Module)
                .all(|s| s.reason == SkipReason::ParentNotPlaced)
        );
    }

    #[test]
    fn test_course_capacity_is_configurable() {
        let engine = Engine::new(LayoutConfig::default().with_capacity(2, 1));
        let mut modules = modules_of("c0", 2);
        modules.extend(modules_of("c1", 2));
        let layout = engine.compute(&courses(4), &modules, &[]);

        assert_eq!(layout.nodes_of_kind(NodeKind::Course).count(), 2);
        assert_eq!(layout.nodes_of_kind(NodeKind::Module).count(), 2);
        // The single allowed branch is the first one, not the middle
        let module = layout.node("module:c0-m0").unwrap().position();
        let course = layout.node("course:c0").unwrap().position();
        assert!(module.x() < course.x());
    }

    #[test]
    fn test_nodes_and_edges_come_in_level_order() {
        let layout = compute_layout(
            &courses(2),
            &[modules_of("c0", 1), modules_of("c1", 1)].concat(),
            &[lessons_of("c0-m0", 1), lessons_of("c1-m0", 1)].concat(),
        );
        let kinds: Vec<NodeKind> = layout.nodes().iter().map(PlacedNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Root,
                NodeKind::Course,
                NodeKind::Course,
                NodeKind::Module,
                NodeKind::Module,
                NodeKind::Lesson,
                NodeKind::Lesson,
            ]
        );
        // Every non-root node has exactly one incoming edge
        assert_eq!(layout.edges().len(), layout.nodes().len() - 1);
        for node in &layout.nodes()[1..] {
            let incoming: Vec<&PlacedEdge> = layout
                .edges()
                .iter()
                .filter(|e| e.target_id() == node.id())
                .collect();
            assert_eq!(incoming.len(), 1);
            assert_eq!(node.side(), Some(incoming[0].target_side()));
        }
    }

    #[test]
    fn test_narrow_lesson_arc_keeps_lessons_closer() {
        let spacing = |degrees: f32| {
            let config = LayoutConfig::default()
                .with_radii(4000.0, 3000.0, 2000.0)
                .with_lesson_arc_degrees(degrees);
            let layout = Engine::new(config).compute(
                &courses(1),
                &modules_of("c0", 1),
                &lessons_of("c0-m0", 2),
            );
            let first = layout.node("lesson:c0-m0-l0").unwrap().position();
            let second = layout.node("lesson:c0-m0-l1").unwrap().position();
            first.distance(second)
        };

        assert!(spacing(10.0) < spacing(30.0));
    }

    #[test]
    fn test_dense_fan_uses_collision_search() {
        let layout = compute_layout(&courses(1), &modules_of("c0", 3), &lessons_of("c0-m1", 10));
        let padding = LayoutConfig::default().padding();
        let unresolved = &layout.diagnostics().unresolved;

        assert_eq!(layout.nodes_of_kind(NodeKind::Lesson).count(), 10);
        assert!(unresolved.is_empty(), "unexpected fallbacks: {unresolved:?}");
        assert_eq!(layout.overlap_count(padding), 0);

        // Neighbours near the top of the fan collide, so some lesson left its radius
        let module = layout.node("module:c0-m1").unwrap().position();
        let lesson_radius = LayoutConfig::default().lesson_radius();
        let nudged = layout
            .nodes_of_kind(NodeKind::Lesson)
            .filter(|lesson| (lesson.position().distance(module) - lesson_radius).abs() > 1e-2)
            .count();
        assert!(nudged > 0);
    }

    #[test]
    fn test_exhausted_search_keeps_desired_position() {
        let config = LayoutConfig::default()
            .with_radii(10.0, 10.0, 10.0)
            .with_collision_search(2, 35.0, 1.0);
        let padding = config.padding();
        let layout = Engine::new(config).compute(&courses(1), &modules_of("c0", 1), &[]);
        let unresolved = &layout.diagnostics().unresolved;

        assert!(layout.diagnostics().skipped.is_empty());
        let ids: Vec<_> = unresolved.iter().map(|u| u.node_id.as_str()).collect();
        assert_eq!(ids, ["course:c0", "module:c0-m0"]);

        for collision in unresolved {
            let node = layout.node(&collision.node_id).unwrap();
            assert_eq!(node.position(), collision.desired);
        }

        let course = layout.node("course:c0").unwrap().position();
        assert!(approx_eq!(f32, course.x(), 0.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, course.y(), -10.0, epsilon = 1e-4));
        assert!(layout.overlap_count(padding) > 0);
    }
}
