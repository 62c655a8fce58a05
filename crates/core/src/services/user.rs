//! User provisioning and account service.

use servihub_common::{AppError, AppResult};
use servihub_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use sea_orm::Set;

use crate::policy::Actor;

/// Input for provisioning an internal user.
///
/// Provisioning binds an external identity to an internal row; it runs
/// once per identity, not self-service.
pub struct ProvisionUserInput {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Provision an internal user bound to an external identity.
    pub async fn provision(&self, input: ProvisionUserInput) -> AppResult<user::Model> {
        let external_id = input.external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::Validation(
                "External identity id is required".to_string(),
            ));
        }

        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "A valid email address is required".to_string(),
            ));
        }

        let model = user::ActiveModel {
            external_id: Set(external_id.to_string()),
            email: Set(email.to_string()),
            name: Set(input.name),
            role: Set(input.role),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, "User provisioned");
        Ok(user)
    }

    /// Delete a user account. Users may only delete their own row.
    pub async fn delete_account(&self, actor: &Actor, id: i64) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(id).await?;

        if user.id != actor.id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this user".to_string(),
            ));
        }

        self.user_repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    fn test_user(id: i64) -> user::Model {
        user::Model {
            id,
            external_id: format!("ext_{id}"),
            email: format!("user{id}@servihub.com"),
            name: None,
            role: UserRole::User,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn provision_rejects_blank_external_id() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let err = service
            .provision(ProvisionUserInput {
                external_id: "  ".to_string(),
                email: "user@servihub.com".to_string(),
                name: None,
                role: UserRole::User,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn provision_rejects_invalid_email() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let err = service
            .provision(ProvisionUserInput {
                external_id: "ext_abc".to_string(),
                email: "not-an-email".to_string(),
                name: None,
                role: UserRole::User,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_foreign_account_is_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[test_user(5)]]),
        );
        let actor = Actor {
            id: 2,
            role: UserRole::User,
        };

        let err = service.delete_account(&actor, 5).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_own_account_succeeds() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user(2)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );
        let actor = Actor {
            id: 2,
            role: UserRole::User,
        };

        let deleted = service.delete_account(&actor, 2).await.unwrap();
        assert_eq!(deleted.id, 2);
    }
}
