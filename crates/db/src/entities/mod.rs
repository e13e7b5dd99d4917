//! Database entities.

pub mod activity;
pub mod grade;
pub mod student;
pub mod student_subject;
pub mod subject;
pub mod teacher;

pub use activity::Entity as Activity;
pub use grade::Entity as Grade;
pub use student::Entity as Student;
pub use student_subject::Entity as StudentSubject;
pub use subject::Entity as Subject;
pub use teacher::Entity as Teacher;
