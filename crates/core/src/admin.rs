//! Admin model registry.
//!
//! The registry is built once at startup and handed to
//! [`AdminService`](crate::services::AdminService). Only registered models
//! can be listed or edited through the admin endpoints.

use serde::Serialize;

use crate::forms::FormSpec;

/// A model that can be exposed to administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminModel {
    Subject,
    Student,
    Activity,
    Grade,
}

impl AdminModel {
    /// Every model, in display order.
    pub const ALL: [Self; 4] = [Self::Subject, Self::Student, Self::Activity, Self::Grade];

    /// Path segment used by the admin endpoints.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Subject => "subjects",
            Self::Student => "students",
            Self::Activity => "activities",
            Self::Grade => "grades",
        }
    }

    /// Human-readable plural label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subject => "Subjects",
            Self::Student => "Students",
            Self::Activity => "Activities",
            Self::Grade => "Grades",
        }
    }

    /// Form layout for the model, without choice lists.
    #[must_use]
    pub fn form(self) -> FormSpec {
        match self {
            Self::Subject => FormSpec::subject(),
            Self::Student => FormSpec::student(Vec::new()),
            Self::Activity => FormSpec::activity(Vec::new()),
            Self::Grade => FormSpec::grade(Vec::new(), Vec::new()),
        }
    }
}

/// The set of models exposed to administrators.
#[derive(Debug, Clone, Default)]
pub struct AdminRegistry {
    models: Vec<AdminModel>,
}

impl AdminRegistry {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// A registry with every model registered.
    #[must_use]
    pub fn with_all_models() -> Self {
        AdminModel::ALL
            .into_iter()
            .fold(Self::new(), Self::register)
    }

    /// Register a model. Registering twice has no effect.
    #[must_use]
    pub fn register(mut self, model: AdminModel) -> Self {
        if !self.models.contains(&model) {
            self.models.push(model);
        }
        self
    }

    /// Registered models in registration order.
    #[must_use]
    pub fn models(&self) -> &[AdminModel] {
        &self.models
    }

    /// Resolve a path segment to a registered model.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AdminModel> {
        self.models.iter().copied().find(|m| m.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_all_models() {
        let registry = AdminRegistry::with_all_models();

        assert_eq!(registry.models(), &AdminModel::ALL);
        assert_eq!(registry.get("grades"), Some(AdminModel::Grade));
        assert_eq!(registry.get("teachers"), None);
    }

    #[test]
    fn test_unregistered_model_is_hidden() {
        let registry = AdminRegistry::new()
            .register(AdminModel::Subject)
            .register(AdminModel::Subject);

        assert_eq!(registry.models().len(), 1);
        assert_eq!(registry.get("subjects"), Some(AdminModel::Subject));
        assert_eq!(registry.get("students"), None);
    }

    #[test]
    fn test_model_forms() {
        assert_eq!(AdminModel::Grade.form().name, "grade");
        assert!(AdminModel::Student.form().field("email").is_some());
    }
}
