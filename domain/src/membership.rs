//! Who may do what within a project.
//!
//! A project's audios, detail, member list and full annotation set are reserved to its
//! admins and to global admins. Plain members may only read and create their own
//! annotations.

use crate::error::Error;
use crate::{memberships, project, users, Id, Role};
use entity_api::membership;
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::membership::{find, find_by_project_with_users};

/// The strongest relation a user holds with one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAccess {
    GlobalAdmin,
    ProjectAdmin,
    Member,
    NotMember,
}

impl ProjectAccess {
    pub fn from_membership(user: &users::Model, membership: Option<&memberships::Model>) -> Self {
        if user.is_admin {
            ProjectAccess::GlobalAdmin
        } else {
            match membership {
                Some(m) if m.is_admin() => ProjectAccess::ProjectAdmin,
                Some(_) => ProjectAccess::Member,
                None => ProjectAccess::NotMember,
            }
        }
    }

    /// Project admins and global admins.
    pub fn is_admin(&self) -> bool {
        matches!(self, ProjectAccess::GlobalAdmin | ProjectAccess::ProjectAdmin)
    }

    /// Anyone allowed to annotate the project.
    pub fn is_member(&self) -> bool {
        *self != ProjectAccess::NotMember
    }
}

/// Resolves the access `user` has to the project.
///
/// Fails with `Project with id N not found` when the project does not exist.
pub async fn project_access(
    db: &DatabaseConnection,
    user: &users::Model,
    project_id: Id,
) -> Result<ProjectAccess, Error> {
    project::find_by_id(db, project_id).await?;

    let membership = membership::find(db, user.id, project_id).await?;
    let access = ProjectAccess::from_membership(user, membership.as_ref());
    debug!(
        "User {} has {access:?} access to project {project_id}",
        user.username
    );
    Ok(access)
}

/// Fails with `Not allowed.` unless the access is admin level.
pub fn require_admin(access: ProjectAccess) -> Result<(), Error> {
    if access.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

/// Fails with `Not allowed.` unless the user belongs to the project in any role.
pub fn require_member(access: ProjectAccess) -> Result<(), Error> {
    if access.is_member() {
        Ok(())
    } else {
        Err(Error::forbidden())
    }
}

/// Gives `user_id` the role within the project. Both the user and the project must exist.
pub async fn upsert(
    db: &DatabaseConnection,
    project_id: Id,
    user_id: Id,
    role: Role,
) -> Result<memberships::Model, Error> {
    project::find_by_id(db, project_id).await?;
    entity_api::user::find_by_id(db, user_id)
        .await
        .map_err(|err| {
            Error::from(err).with_not_found_message(format!("User with id {user_id} not found"))
        })?;

    info!("Setting role {role} for user {user_id} in project {project_id}");
    Ok(membership::upsert(db, user_id, project_id, role).await?)
}

pub async fn delete(db: &DatabaseConnection, project_id: Id, user_id: Id) -> Result<(), Error> {
    membership::delete(db, user_id, project_id)
        .await
        .map_err(|err| {
            Error::from(err).with_not_found_message(format!(
                "User with id {user_id} is not a member of project {project_id}"
            ))
        })
}
