//! Report endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use servihub_common::{AppError, AppResult};
use servihub_core::{Actor, CreateReportInput, UpdateReportInput};
use servihub_db::entities::report::{self, ReportType};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::{ApiResponse, created}};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: i64,
    pub report_type: String,
    pub target_id: i64,
    pub reason: String,
    pub description: Option<String>,
    pub submitted_by: i64,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<i64>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            report_type: match report.report_type {
                ReportType::Review => "review".to_string(),
                ReportType::User => "user".to_string(),
                ReportType::Business => "business".to_string(),
                ReportType::Service => "service".to_string(),
                ReportType::Other => "other".to_string(),
            },
            target_id: report.target_id,
            reason: report.reason,
            description: report.description,
            submitted_by: report.submitted_by,
            created_at: report.created_at.to_rfc3339(),
            resolved_at: report.resolved_at.map(|t| t.to_rfc3339()),
            resolved_by: report.resolved_by,
        }
    }
}

/// Report id query (`?id=` on GET and DELETE).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIdQuery {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Create report request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub report_type: String,
    pub target_id: i64,
    #[validate(length(min = 3, message = "Reason is too short"))]
    pub reason: String,
    pub description: Option<String>,
}

/// Update report request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub id: i64,
    #[validate(length(min = 3, message = "Reason is too short"))]
    pub reason: Option<String>,
    pub description: Option<String>,
}

/// Resolve report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportRequest {
    pub id: i64,
}

fn parse_report_type(value: &str) -> AppResult<ReportType> {
    match value {
        "review" => Ok(ReportType::Review),
        "user" => Ok(ReportType::User),
        "business" => Ok(ReportType::Business),
        "service" => Ok(ReportType::Service),
        "other" => Ok(ReportType::Other),
        _ => Err(AppError::Validation(format!(
            "Unrecognized report type: {value}"
        ))),
    }
}

/// Get a single report by id, or list reports visible to the caller.
async fn index(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportIdQuery>,
) -> AppResult<Response> {
    let actor = Actor::from(&user);

    match query.id {
        Some(id) => {
            let report = state.report_service.get_report(&actor, id).await?;
            Ok(ApiResponse::ok(ReportResponse::from(report)).into_response())
        }
        None => {
            let reports = state.report_service.list_reports(&actor).await?;
            let responses: Vec<ReportResponse> = reports.into_iter().map(Into::into).collect();
            Ok(ApiResponse::ok(responses).into_response())
        }
    }
}

/// File a new report.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<Response> {
    req.validate()?;
    let report_type = parse_report_type(&req.report_type)?;

    let report = state
        .report_service
        .create_report(
            &Actor::from(&user),
            CreateReportInput {
                report_type,
                target_id: req.target_id,
                reason: req.reason,
                description: req.description,
            },
        )
        .await?;

    Ok(created(ReportResponse::from(report)).into_response())
}

/// Update a report's reason/description.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    req.validate()?;

    let report = state
        .report_service
        .update_report(
            &Actor::from(&user),
            UpdateReportInput {
                id: req.id,
                reason: req.reason,
                description: req.description,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Resolve a report (admin only).
async fn resolve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ResolveReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .resolve_report(&Actor::from(&user), req.id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Delete a report.
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportIdQuery>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let id = query
        .id
        .ok_or_else(|| AppError::Validation("Missing id parameter".to_string()))?;

    let report = state
        .report_service
        .delete_report(&Actor::from(&user), id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Create the reports router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(index)
            .post(create)
            .patch(update)
            .put(resolve)
            .delete(destroy),
    )
}
