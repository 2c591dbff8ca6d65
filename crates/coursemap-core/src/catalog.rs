//! Catalog records consumed by the layout engine.
//!
//! These are plain records as supplied by the platform's query layer. The
//! layout engine reads them but never validates or mutates them; dangling
//! parent references are simply skipped during placement.
//!
//! # Hierarchy
//!
//! ```text
//! Course
//!   └── Module   (module.course_id == course.id)
//!         └── Lesson   (lesson.module_id == Some(module.id))
//! ```

use serde::{Deserialize, Serialize};

/// A root-level course of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A module owned by exactly one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub course_id: String,
}

impl Module {
    pub fn new(id: impl Into<String>, title: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            course_id: course_id.into(),
        }
    }
}

/// A lesson, optionally attached to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub module_id: Option<String>,
}

impl Lesson {
    /// Creates a lesson attached to `module_id`.
    pub fn new(id: impl Into<String>, title: impl Into<String>, module_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            module_id: Some(module_id.into()),
        }
    }

    /// Creates a lesson that belongs to no module.
    pub fn unattached(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            module_id: None,
        }
    }
}

/// The three record lists of a catalog, as exported by the query layer.
///
/// Every list defaults to empty when missing from the serialized form.
///
/// # Examples
///
/// ```
/// # use coursemap_core::catalog::{Catalog, Course};
/// let catalog = Catalog::default().with_course(Course::new("design", "Design"));
/// assert_eq!(catalog.courses.len(), 1);
/// assert!(catalog.modules.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>, modules: Vec<Module>, lessons: Vec<Lesson>) -> Self {
        Self {
            courses,
            modules,
            lessons,
        }
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Returns true if the catalog holds no records at all
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.modules.is_empty() && self.lessons.is_empty()
    }
}
