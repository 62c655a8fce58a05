//! Report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of entity a report is filed against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "service")]
    Service,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Report model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Kind of entity being reported.
    #[sea_orm(column_name = "type")]
    pub report_type: ReportType,
    /// The reported entity. Opaque to this system; never validated
    /// against another table.
    pub target_id: i64,
    /// Reason for the report.
    pub reason: String,
    /// Optional free-form detail.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// The user who filed the report.
    pub submitted_by: i64,
    /// When the report was created. Set once, immutable.
    pub created_at: DateTimeWithTimeZone,
    /// When the report was resolved. Null and `resolved_by` null, or
    /// both set.
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,
    /// Admin who resolved the report.
    #[sea_orm(nullable)]
    pub resolved_by: Option<i64>,
}

impl Model {
    /// Whether the report has reached its terminal state.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SubmittedBy",
        to = "super::user::Column::Id"
    )]
    Submitter,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submitter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
