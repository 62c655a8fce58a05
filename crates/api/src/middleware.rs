//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use servihub_core::{IdentityService, ReportService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub report_service: ReportService,
    pub user_service: UserService,
}

/// Authentication middleware.
///
/// Resolves a bearer session token to the internal user and stores the
/// model in request extensions. A present-but-bad credential is
/// rejected here so `UNAUTHENTICATED` and `ACCOUNT_NOT_PROVISIONED`
/// stay distinguishable; requests without a credential pass through
/// (provisioning is unauthenticated) and are rejected by the
/// [`crate::extractors::AuthUser`] extractor where auth is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    if let Some(token) = token {
        match state.identity_service.resolve(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "Authenticated request");
                req.extensions_mut().insert(user);
            }
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
