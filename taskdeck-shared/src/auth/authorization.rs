/// Authorization predicates
///
/// State-free allow/deny rules deciding which principal may touch which
/// resource. Roles are binary: a principal either has the admin flag or it
/// is an ordinary owner. Each predicate takes the already-fetched target,
/// so the NotFound / Forbidden split is decided in exactly one place and
/// the functions stay pure and unit-testable.
///
/// # Access model
///
/// - **Admin**: may read and manage every company, user, and task
/// - **Owner**: may read and manage their own user record and their own
///   tasks, and read companies they are a member of
///
/// Task mutation takes a deliberately narrower path than task read: update
/// and delete fetch with an ownership-scoped query (see
/// [`crate::models::task::Task::find_scoped`]), so a non-owner mutating an
/// existing foreign task observes `NotFound`. Only the direct read path
/// discloses existence via `Forbidden`.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::{require_admin, AccessError};
/// use taskdeck_shared::auth::principal::Principal;
/// use uuid::Uuid;
///
/// let principal = Principal {
///     id: Uuid::new_v4(),
///     username: "jdoe".to_string(),
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     is_admin: false,
/// };
///
/// assert!(matches!(require_admin(&principal), Err(AccessError::Forbidden(_))));
/// ```

use uuid::Uuid;

use super::principal::Principal;
use crate::models::{company::Company, task::Task};

/// Error type for authorization checks
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The target resource does not exist (or its existence is concealed)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The target exists but the principal may not access it
    #[error("{0}")]
    Forbidden(&'static str),
}

/// Allows only principals with the admin role
pub fn require_admin(principal: &Principal) -> Result<(), AccessError> {
    if !principal.is_admin {
        return Err(AccessError::Forbidden("Insufficient permissions"));
    }

    Ok(())
}

/// Allows admins, and ordinary principals acting on their own user record
pub fn require_self_or_admin(principal: &Principal, target_user_id: Uuid) -> Result<(), AccessError> {
    if !principal.is_admin && principal.id != target_user_id {
        return Err(AccessError::Forbidden("User may only access their own record"));
    }

    Ok(())
}

/// Read-path access check for a task
///
/// - Absent task → `NotFound`, regardless of caller
/// - Present task → allowed for admins and the task's owner; `Forbidden`
///   otherwise (existence is disclosed on the read path)
pub fn require_task_access(principal: &Principal, task: Option<&Task>) -> Result<(), AccessError> {
    let task = task.ok_or(AccessError::NotFound("Task"))?;

    if !principal.is_admin && task.owner_id != Some(principal.id) {
        return Err(AccessError::Forbidden("User is not owner of this task"));
    }

    Ok(())
}

/// Read-path access check for a company
///
/// - Absent company → `NotFound`, regardless of caller
/// - Present company → allowed for admins and members; `Forbidden`
///   otherwise
///
/// `member_ids` are the ids of the users belonging to the company, fetched
/// alongside it.
pub fn require_company_access(
    principal: &Principal,
    company: Option<&Company>,
    member_ids: &[Uuid],
) -> Result<(), AccessError> {
    company.ok_or(AccessError::NotFound("Company"))?;

    if !principal.is_admin && !member_ids.contains(&principal.id) {
        return Err(AccessError::Forbidden("User is not in this company"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::CompanyMode;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn principal(id: Uuid, is_admin: bool) -> Principal {
        Principal {
            id,
            username: "jdoe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            is_admin,
        }
    }

    fn task(owner_id: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            summary: Some("summary".to_string()),
            description: Some("description".to_string()),
            status: TaskStatus::Backlog,
            priority: TaskPriority::Low,
            owner_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn company() -> Company {
        Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: None,
            mode: CompanyMode::Outsource,
            rating: Some(4.5),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&principal(Uuid::new_v4(), true)).is_ok());

        let result = require_admin(&principal(Uuid::new_v4(), false));
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[test]
    fn test_require_self_or_admin_self() {
        let id = Uuid::new_v4();
        assert!(require_self_or_admin(&principal(id, false), id).is_ok());
    }

    #[test]
    fn test_require_self_or_admin_admin_on_other() {
        assert!(require_self_or_admin(&principal(Uuid::new_v4(), true), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_require_self_or_admin_other_forbidden() {
        let result = require_self_or_admin(&principal(Uuid::new_v4(), false), Uuid::new_v4());
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[test]
    fn test_require_task_access_absent_is_not_found_for_any_caller() {
        let result = require_task_access(&principal(Uuid::new_v4(), false), None);
        assert_eq!(result, Err(AccessError::NotFound("Task")));

        let result = require_task_access(&principal(Uuid::new_v4(), true), None);
        assert_eq!(result, Err(AccessError::NotFound("Task")));
    }

    #[test]
    fn test_require_task_access_owner() {
        let id = Uuid::new_v4();
        assert!(require_task_access(&principal(id, false), Some(&task(Some(id)))).is_ok());
    }

    #[test]
    fn test_require_task_access_admin_on_foreign_task() {
        let t = task(Some(Uuid::new_v4()));
        assert!(require_task_access(&principal(Uuid::new_v4(), true), Some(&t)).is_ok());
    }

    #[test]
    fn test_require_task_access_non_owner_read_is_forbidden() {
        // Read path discloses existence: 403, not 404
        let t = task(Some(Uuid::new_v4()));
        let result = require_task_access(&principal(Uuid::new_v4(), false), Some(&t));
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[test]
    fn test_require_task_access_unassigned_task() {
        let t = task(None);
        let result = require_task_access(&principal(Uuid::new_v4(), false), Some(&t));
        assert!(matches!(result, Err(AccessError::Forbidden(_))));

        assert!(require_task_access(&principal(Uuid::new_v4(), true), Some(&t)).is_ok());
    }

    #[test]
    fn test_require_company_access_absent() {
        let result = require_company_access(&principal(Uuid::new_v4(), true), None, &[]);
        assert_eq!(result, Err(AccessError::NotFound("Company")));
    }

    #[test]
    fn test_require_company_access_member() {
        let id = Uuid::new_v4();
        let c = company();
        assert!(require_company_access(&principal(id, false), Some(&c), &[Uuid::new_v4(), id]).is_ok());
    }

    #[test]
    fn test_require_company_access_admin_non_member() {
        let c = company();
        assert!(require_company_access(&principal(Uuid::new_v4(), true), Some(&c), &[]).is_ok());
    }

    #[test]
    fn test_require_company_access_non_member_forbidden() {
        let c = company();
        let result =
            require_company_access(&principal(Uuid::new_v4(), false), Some(&c), &[Uuid::new_v4()]);
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }
}
