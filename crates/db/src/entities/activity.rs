//! Activity entity.

use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Wire names of every [`Category`].
pub const CATEGORY_NAMES: &[&str] = &["exam", "assignment", "practice", "other"];

/// Kind of gradable activity.
///
/// Deserializes from its wire name, ignoring case and surrounding whitespace,
/// so `"Exam"` and `"exam"` are the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[sea_orm(string_value = "exam")]
    Exam,
    #[sea_orm(string_value = "assignment")]
    Assignment,
    #[sea_orm(string_value = "practice")]
    Practice,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Category {
    /// Wire name, identical to the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Assignment => "assignment",
            Self::Practice => "practice",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exam => "Exam",
            Self::Assignment => "Assignment",
            Self::Practice => "Practice",
            Self::Other => "Other",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).ok_or_else(|| de::Error::unknown_variant(&name, CATEGORY_NAMES))
    }
}

/// A gradable activity within a subject.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub subject_id: String,

    pub name: String,

    pub category: Category,

    /// Day the activity takes place.
    pub date: Date,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
    #[sea_orm(has_many = "super::grade::Entity")]
    Grades,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
