//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use crate::repositories::{is_unique_violation, map_db_err};
use servihub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new report.
    ///
    /// The duplicate check runs in the same transaction as the insert.
    /// The `(submitted_by, target_id)` unique index remains the
    /// authoritative guard: an insert racing past the check maps the
    /// unique violation to `Conflict`, so a concurrent double-submit
    /// yields exactly one success.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let submitted_by = match &model.submitted_by {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => *v,
            ActiveValue::NotSet => {
                return Err(AppError::Internal("report submitter not set".to_string()));
            }
        };
        let target_id = match &model.target_id {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => *v,
            ActiveValue::NotSet => {
                return Err(AppError::Internal("report target not set".to_string()));
            }
        };

        let existing = Report::find()
            .filter(report::Column::SubmittedBy.eq(submitted_by))
            .filter(report::Column::TargetId.eq(target_id))
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        if existing.is_some() {
            return Err(duplicate_report());
        }

        let created = model.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_report()
            } else {
                map_db_err(e)
            }
        })?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(created)
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::ReportNotFound(id))
    }

    /// Get all reports, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<report::Model>> {
        Report::find()
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Get reports submitted by a specific user, newest first.
    pub async fn list_by_submitter(&self, user_id: i64) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::SubmittedBy.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Mark a report resolved (single conditional UPDATE, no fetch).
    ///
    /// Sets `resolved_at` and `resolved_by` together, filtered on
    /// `resolved_at IS NULL` so the `Open -> Resolved` transition fires
    /// at most once even under concurrent resolve calls. A second
    /// resolve is rejected with `PreconditionFailed`; the original
    /// resolution pair is never overwritten.
    pub async fn resolve(&self, id: i64, resolver_id: i64) -> AppResult<report::Model> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = Report::update_many()
            .col_expr(report::Column::ResolvedAt, Expr::value(now))
            .col_expr(report::Column::ResolvedBy, Expr::value(resolver_id))
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::ResolvedAt.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(AppError::PreconditionFailed(
                    "Report is already resolved".to_string(),
                )),
                None => Err(AppError::ReportNotFound(id)),
            };
        }

        self.get_by_id(id).await
    }

    /// Delete a report by ID.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Report::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

fn duplicate_report() -> AppError {
    AppError::Conflict("You have already created a report with this target ID".to_string())
}
