//! Core business logic for gradebook.
//!
//! - [`grading`]: the grade value rule and its rejection reasons
//! - [`forms`]: field descriptors and the generic form renderer
//! - [`admin`]: the registry of models exposed to administrators
//! - [`services`]: per-entity operations, always through a teacher scope

pub mod admin;
pub mod forms;
pub mod grading;
pub mod services;

pub use admin::{AdminModel, AdminRegistry};
pub use grading::GradeRejection;
pub use services::*;
