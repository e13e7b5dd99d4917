//! Teacher entity.

use sea_orm::entity::prelude::*;

/// Teacher account. Every subject is owned by exactly one teacher.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login name as entered at signup.
    pub username: String,

    /// Lowercased username (unique, used for lookups).
    #[sea_orm(unique)]
    pub username_lower: String,

    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Argon2 PHC string.
    pub password_hash: String,

    /// Current session token (rotated on signout).
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Operators may use the admin endpoints.
    pub is_admin: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subject::Entity")]
    Subjects,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
