//! Workspace and project containers.
//!
//! Projects within a workspace and systems within a project are kept in
//! ascending identifier order. Identifiers are only settable at
//! construction, so handing out mutable references cannot break the ordering.

use serde::{Deserialize, Serialize};

use crate::system::System;

/// Schema version written to every encoded descriptor.
pub const SCHEMA_VERSION: &str = "4.0";

/// Root of a `.apw` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub identifier: String,
    pub create_version: String,
    pub current_version: String,
    pub pjs_file: String,
    pub pjs_convert_date: String,
    pub pjs_create_date: String,
    pub comments: String,
    projects: Vec<Project>,
}

impl Workspace {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            create_version: SCHEMA_VERSION.to_string(),
            current_version: SCHEMA_VERSION.to_string(),
            ..Self::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Inserts a project, keeping projects ordered by identifier.
    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
        self.sort_projects();
    }

    /// Replaces all projects at once; ordering is restored afterwards.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.sort_projects();
    }

    pub fn find_project(&self, identifier: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.identifier == identifier)
    }

    pub fn find_project_mut(&mut self, identifier: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.identifier == identifier)
    }

    /// Keeps only projects named `identifier`. Returns false if none matched.
    pub fn retain_project(&mut self, identifier: &str) -> bool {
        self.projects.retain(|p| p.identifier == identifier);
        !self.projects.is_empty()
    }

    /// Keeps only systems named `identifier`, in any project, and drops the
    /// projects left without systems. Returns false if none matched.
    pub fn retain_system(&mut self, identifier: &str) -> bool {
        self.projects
            .retain_mut(|project| project.retain_system(identifier));
        !self.projects.is_empty()
    }

    /// Iterates every system of every project, in order.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.projects.iter().flat_map(|p| p.systems.iter())
    }

    /// Iterates every system of every project mutably, in order.
    pub fn systems_mut(&mut self) -> impl Iterator<Item = &mut System> {
        self.projects.iter_mut().flat_map(|p| p.systems.iter_mut())
    }

    fn sort_projects(&mut self) {
        // Stable sort: duplicates keep their relative order so lookups stay first-match.
        self.projects
            .sort_by(|a, b| a.identifier.cmp(&b.identifier));
        for project in &mut self.projects {
            project.sort_systems();
        }
    }
}

/// A project groups the systems of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    identifier: String,
    pub designer: String,
    pub dealer_id: String,
    pub sales_order: String,
    pub purchase_order: String,
    pub comments: String,
    systems: Vec<System>,
}

impl Project {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// Inserts a system, keeping systems ordered by identifier.
    pub fn add_system(&mut self, system: System) {
        self.systems.push(system);
        self.sort_systems();
    }

    pub fn set_systems(&mut self, systems: Vec<System>) {
        self.systems = systems;
        self.sort_systems();
    }

    pub fn find_system(&self, identifier: &str) -> Option<&System> {
        self.systems.iter().find(|s| s.identifier() == identifier)
    }

    pub fn find_system_mut(&mut self, identifier: &str) -> Option<&mut System> {
        self.systems.iter_mut().find(|s| s.identifier() == identifier)
    }

    /// Keeps only systems named `identifier`. Returns false if none matched.
    pub fn retain_system(&mut self, identifier: &str) -> bool {
        self.systems.retain(|s| s.identifier() == identifier);
        !self.systems.is_empty()
    }

    fn sort_systems(&mut self) {
        self.systems.sort_by(|a, b| a.identifier().cmp(b.identifier()));
    }
}
