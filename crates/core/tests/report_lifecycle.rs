//! Report lifecycle integration tests.
//!
//! These tests drive the full service + policy stack against a running
//! `PostgreSQL` instance.
//! Run with: `cargo test --test report_lifecycle -- --ignored`

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use servihub_common::AppError;
use servihub_core::policy::Actor;
use servihub_core::{CreateReportInput, ReportService};
use servihub_db::entities::report::ReportType;
use servihub_db::entities::user::{self, UserRole};
use servihub_db::repositories::{ReportRepository, UserRepository};
use servihub_db::test_utils::TestDatabase;

async fn seed_user(repo: &UserRepository, external_id: &str, role: UserRole) -> user::Model {
    repo.create(user::ActiveModel {
        external_id: Set(external_id.to_string()),
        email: Set(format!("{external_id}@servihub.com")),
        name: Set(None),
        role: Set(role),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn submitted_report_is_visible_listed_and_resolved_once() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.conn.clone();

    let users = UserRepository::new(Arc::clone(&conn));
    let service = ReportService::new(ReportRepository::new(Arc::clone(&conn)));

    let user_a = seed_user(&users, "ext_a", UserRole::User).await;
    let user_b = seed_user(&users, "ext_b", UserRole::User).await;
    let admin = seed_user(&users, "ext_admin", UserRole::Admin).await;

    let actor_a = Actor::from(&user_a);
    let actor_b = Actor::from(&user_b);
    let actor_admin = Actor::from(&admin);

    // User A files a report against target 101
    let report = service
        .create_report(
            &actor_a,
            CreateReportInput {
                report_type: ReportType::Service,
                target_id: 101,
                reason: "Spam content".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    assert!(report.resolved_at.is_none());

    // User B does not see A's report; the admin does
    assert!(service.list_reports(&actor_b).await.unwrap().is_empty());
    let admin_view = service.list_reports(&actor_admin).await.unwrap();
    assert_eq!(admin_view.len(), 1);
    assert_eq!(admin_view[0].submitted_by, user_a.id);

    // B cannot read it by id either
    let err = service.get_report(&actor_b, report.id).await.unwrap_err();
    assert!(matches!(err, AppError::ReportNotFound(_)));

    // Admin resolves it
    let resolved = service
        .resolve_report(&actor_admin, report.id)
        .await
        .unwrap();
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolved_by, Some(admin.id));

    // A second resolve is rejected rather than re-stamped
    let err = service
        .resolve_report(&actor_admin, report.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));

    // The submitter can no longer edit the resolved report
    let err = service
        .update_report(
            &actor_a,
            servihub_core::UpdateReportInput {
                id: report.id,
                reason: Some("Edited after the fact".to_string()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));

    db.drop_database().await.unwrap();
}
