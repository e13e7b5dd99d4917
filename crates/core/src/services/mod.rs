//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod admin;
pub mod dashboard;
pub mod form;
pub mod grade;
pub mod student;
pub mod subject;
pub mod teacher;

pub use activity::{ActivityInput, ActivityService};
pub use admin::{AdminRows, AdminService};
pub use dashboard::{Dashboard, DashboardService};
pub use form::{FORM_NAMES, FormService};
pub use grade::{CreateGradeInput, GradeService, GradeSheet, UpdateGradeInput};
pub use student::{StudentDetail, StudentInput, StudentService};
pub use subject::{SubjectInput, SubjectService};
pub use teacher::{Session, SigninInput, SignupInput, TeacherService};
