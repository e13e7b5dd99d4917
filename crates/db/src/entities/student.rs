//! Student entity.

use sea_orm::entity::prelude::*;

/// A student. Students are shared between teachers; a teacher sees a student
/// only while the student is enrolled in one of that teacher's subjects.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Unique across all students.
    #[sea_orm(unique)]
    pub email: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_subject::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::grade::Entity")]
    Grades,
}

impl Related<super::student_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

// Many-to-many relationship with subjects
impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        super::student_subject::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::student_subject::Relation::Student.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
