//! Report access policy.
//!
//! Pure decision functions over an [`Actor`]; no I/O. Every entry point
//! that reads or mutates a report goes through these, so the
//! ownership/role rules live in exactly one place.

use servihub_db::entities::report;
use servihub_db::entities::user::{self, UserRole};

/// The authenticated user a request acts as.
///
/// Produced once per request by the identity resolver and threaded
/// explicitly into policy and service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Internal user id.
    pub id: i64,
    /// Role assigned at provisioning.
    pub role: UserRole,
}

impl Actor {
    /// Whether the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Which reports a listing may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every report.
    All,
    /// Only reports submitted by the given user.
    SubmittedBy(i64),
}

/// Scope of a report listing: admins see all, everyone else only their
/// own submissions.
#[must_use]
pub fn list_scope(actor: &Actor) -> ListScope {
    if actor.is_admin() {
        ListScope::All
    } else {
        ListScope::SubmittedBy(actor.id)
    }
}

/// Whether the actor may read a single report: admin or submitter.
#[must_use]
pub fn can_view(actor: &Actor, report: &report::Model) -> bool {
    actor.is_admin() || report.submitted_by == actor.id
}

/// Whether the actor may edit reason/description: submitter only.
///
/// Resolution state is a lifecycle concern, checked separately so an
/// edit of a resolved report surfaces a precondition failure rather
/// than a policy denial.
#[must_use]
pub fn can_update(actor: &Actor, report: &report::Model) -> bool {
    report.submitted_by == actor.id
}

/// Whether the actor may resolve reports: admin only.
#[must_use]
pub fn can_resolve(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Whether the actor may delete a report: admin always, the submitter
/// only while the report is unresolved.
#[must_use]
pub fn can_delete(actor: &Actor, report: &report::Model) -> bool {
    actor.is_admin() || (report.submitted_by == actor.id && !report.is_resolved())
}

#[cfg(test)]
mod tests {
    use super::*;
    use servihub_db::entities::report::ReportType;

    const ADMIN: Actor = Actor {
        id: 1,
        role: UserRole::Admin,
    };
    const SUBMITTER: Actor = Actor {
        id: 2,
        role: UserRole::User,
    };
    const STRANGER: Actor = Actor {
        id: 3,
        role: UserRole::User,
    };

    fn open_report() -> report::Model {
        report::Model {
            id: 1,
            report_type: ReportType::Service,
            target_id: 101,
            reason: "Spam content".to_string(),
            description: None,
            submitted_by: SUBMITTER.id,
            created_at: chrono::Utc::now().into(),
            resolved_at: None,
            resolved_by: None,
        }
    }

    fn resolved_report() -> report::Model {
        report::Model {
            resolved_at: Some(chrono::Utc::now().into()),
            resolved_by: Some(ADMIN.id),
            ..open_report()
        }
    }

    #[test]
    fn admins_list_everything_users_only_their_own() {
        assert_eq!(list_scope(&ADMIN), ListScope::All);
        assert_eq!(list_scope(&SUBMITTER), ListScope::SubmittedBy(SUBMITTER.id));
        assert_eq!(list_scope(&STRANGER), ListScope::SubmittedBy(STRANGER.id));
    }

    #[test]
    fn view_requires_ownership_or_admin() {
        let report = open_report();
        assert!(can_view(&ADMIN, &report));
        assert!(can_view(&SUBMITTER, &report));
        assert!(!can_view(&STRANGER, &report));
    }

    #[test]
    fn update_is_submitter_only() {
        let report = open_report();
        assert!(can_update(&SUBMITTER, &report));
        assert!(!can_update(&ADMIN, &report));
        assert!(!can_update(&STRANGER, &report));
    }

    #[test]
    fn resolve_is_admin_only() {
        assert!(can_resolve(&ADMIN));
        assert!(!can_resolve(&SUBMITTER));
        assert!(!can_resolve(&STRANGER));
    }

    #[test]
    fn delete_allows_admin_always() {
        assert!(can_delete(&ADMIN, &open_report()));
        assert!(can_delete(&ADMIN, &resolved_report()));
    }

    #[test]
    fn delete_allows_submitter_only_before_resolution() {
        assert!(can_delete(&SUBMITTER, &open_report()));
        assert!(!can_delete(&SUBMITTER, &resolved_report()));
    }

    #[test]
    fn delete_denies_strangers() {
        assert!(!can_delete(&STRANGER, &open_report()));
        assert!(!can_delete(&STRANGER, &resolved_report()));
    }

    #[test]
    fn actor_derives_from_user_model() {
        let user = user::Model {
            id: 7,
            external_id: "ext_7".to_string(),
            email: "u7@servihub.com".to_string(),
            name: None,
            role: UserRole::Admin,
            created_at: chrono::Utc::now().into(),
        };
        let actor = Actor::from(&user);
        assert_eq!(actor.id, 7);
        assert!(actor.is_admin());
    }
}
