//! Users endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use servihub_common::{AppError, AppResult};
use servihub_core::{Actor, ProvisionUserInput};
use servihub_db::entities::user::{self, UserRole};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::{ApiResponse, created}};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            external_id: user.external_id,
            email: user.email,
            name: user.name,
            role: role_name(user.role).to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Role response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role: String,
}

/// Create user request (provisioning-time call).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "External identity id is required"))]
    pub external_id: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

/// User id query (`?id=` on DELETE).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    #[serde(default)]
    pub id: Option<i64>,
}

const fn role_name(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::User => "user",
    }
}

fn parse_role(value: &str) -> AppResult<UserRole> {
    match value {
        "admin" => Ok(UserRole::Admin),
        "user" => Ok(UserRole::User),
        _ => Err(AppError::Validation(format!("Unrecognized role: {value}"))),
    }
}

/// Get the caller's role.
async fn my_role(AuthUser(user): AuthUser) -> ApiResponse<RoleResponse> {
    ApiResponse::ok(RoleResponse {
        role: role_name(user.role).to_string(),
    })
}

/// Provision an internal user bound to an external identity.
///
/// Runs unauthenticated: the internal row does not exist yet when the
/// identity is first provisioned.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Response> {
    req.validate()?;
    let role = parse_role(&req.role)?;

    let user = state
        .user_service
        .provision(ProvisionUserInput {
            external_id: req.external_id,
            email: req.email,
            name: req.name,
            role,
        })
        .await?;

    Ok(created(UserResponse::from(user)).into_response())
}

/// Delete a user account (self-service only).
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<ApiResponse<UserResponse>> {
    let id = query
        .id
        .ok_or_else(|| AppError::Validation("Missing id parameter".to_string()))?;

    let deleted = state
        .user_service
        .delete_account(&Actor::from(&user), id)
        .await?;

    Ok(ApiResponse::ok(deleted.into()))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).delete(destroy))
        .route("/me/role", get(my_role))
}
