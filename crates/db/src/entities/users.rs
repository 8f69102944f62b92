//! `SeaORM` Entity for the users table.
//!
//! Users are polymorphic by role: client users are company-scoped (with an
//! optional department), admin and SE users are not. Emails are stored
//! lowercased so the unique index enforces case-insensitive uniqueness.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    /// False until the user accepts an invitation.
    pub is_active: bool,
    pub email_notifications: bool,
    pub billing_access: bool,
    pub admin_access: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id"
    )]
    Departments,
    #[sea_orm(has_many = "super::company_se_assignments::Entity")]
    CompanySeAssignments,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::company_se_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanySeAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
