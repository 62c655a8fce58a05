//! Report lifecycle service.
//!
//! Validates input, consults the access policy, and drives the
//! repository. Reports are created `Open` and move to `Resolved`
//! exactly once; the transition never reverses.

use servihub_common::{AppError, AppResult};
use servihub_db::{
    entities::report::{self, ReportType},
    repositories::ReportRepository,
};
use sea_orm::Set;

use crate::policy::{self, Actor, ListScope};

/// Shortest acceptable reason, after trimming.
const MIN_REASON_LEN: usize = 3;
/// Longest acceptable reason.
const MAX_REASON_LEN: usize = 500;

/// Input for creating a report.
pub struct CreateReportInput {
    pub report_type: ReportType,
    pub target_id: i64,
    pub reason: String,
    pub description: Option<String>,
}

/// Input for updating a report's reason/description.
pub struct UpdateReportInput {
    pub id: i64,
    pub reason: Option<String>,
    pub description: Option<String>,
}

/// Report service for submission, review and resolution.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    /// File a new report.
    ///
    /// Any authenticated user may file one report per target; a second
    /// submission for the same `(actor, target)` pair is a conflict.
    pub async fn create_report(
        &self,
        actor: &Actor,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        let reason = validate_reason(&input.reason)?;

        let model = report::ActiveModel {
            report_type: Set(input.report_type),
            target_id: Set(input.target_id),
            reason: Set(reason),
            description: Set(input.description),
            submitted_by: Set(actor.id),
            created_at: Set(chrono::Utc::now().into()),
            resolved_at: Set(None),
            resolved_by: Set(None),
            ..Default::default()
        };

        let report = self.report_repo.create(model).await?;
        tracing::info!(
            report_id = report.id,
            target_id = report.target_id,
            submitted_by = actor.id,
            "Report created"
        );
        Ok(report)
    }

    /// Get a single report by id.
    ///
    /// A report the actor may not view is reported as absent so report
    /// ids do not leak.
    pub async fn get_report(&self, actor: &Actor, id: i64) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(id).await?;

        if !policy::can_view(actor, &report) {
            return Err(AppError::ReportNotFound(id));
        }

        Ok(report)
    }

    /// List reports visible to the actor, newest first.
    pub async fn list_reports(&self, actor: &Actor) -> AppResult<Vec<report::Model>> {
        match policy::list_scope(actor) {
            ListScope::All => self.report_repo.list_all().await,
            ListScope::SubmittedBy(user_id) => self.report_repo.list_by_submitter(user_id).await,
        }
    }

    /// Update a report's reason/description.
    ///
    /// Submitter-only, and only while the report is unresolved.
    pub async fn update_report(
        &self,
        actor: &Actor,
        input: UpdateReportInput,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(input.id).await?;

        if !policy::can_update(actor, &report) {
            return Err(AppError::Forbidden(
                "Only the submitter may edit a report".to_string(),
            ));
        }

        if report.is_resolved() {
            return Err(AppError::PreconditionFailed(
                "A resolved report can no longer be edited".to_string(),
            ));
        }

        let mut model: report::ActiveModel = report.into();
        if let Some(reason) = input.reason {
            model.reason = Set(validate_reason(&reason)?);
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }

        self.report_repo.update(model).await
    }

    /// Resolve a report. Admin-only; one-way.
    pub async fn resolve_report(&self, actor: &Actor, id: i64) -> AppResult<report::Model> {
        if !policy::can_resolve(actor) {
            return Err(AppError::Forbidden(
                "Only admins can resolve reports".to_string(),
            ));
        }

        let report = self.report_repo.resolve(id, actor.id).await?;
        tracing::info!(report_id = id, resolved_by = actor.id, "Report resolved");
        Ok(report)
    }

    /// Delete a report.
    ///
    /// Admins always; the submitter only while the report is unresolved.
    pub async fn delete_report(&self, actor: &Actor, id: i64) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(id).await?;

        if !policy::can_delete(actor, &report) {
            return Err(AppError::Forbidden(
                "Not authorized to delete this report".to_string(),
            ));
        }

        self.report_repo.delete(id).await?;
        tracing::info!(report_id = id, deleted_by = actor.id, "Report deleted");
        Ok(report)
    }
}

fn validate_reason(reason: &str) -> AppResult<String> {
    let reason = reason.trim();
    if reason.len() < MIN_REASON_LEN {
        return Err(AppError::Validation("Reason is too short".to_string()));
    }
    if reason.len() > MAX_REASON_LEN {
        return Err(AppError::Validation("Reason is too long".to_string()));
    }
    Ok(reason.to_string())
}
