use super::error::Error;
use entity::memberships::{ActiveModel, Column, Entity, Model};
use entity::{roles::Role, users, Id};
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};

pub async fn find(
    db: &impl ConnectionTrait,
    user_id: Id,
    project_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id((user_id, project_id)).one(db).await?)
}

/// Every membership of the project along with the member's account.
pub async fn find_by_project_with_users(
    db: &impl ConnectionTrait,
    project_id: Id,
) -> Result<Vec<(Model, Option<users::Model>)>, Error> {
    Ok(Entity::find()
        .filter(Column::ProjectId.eq(project_id))
        .find_also_related(users::Entity)
        .order_by_asc(Column::UserId)
        .all(db)
        .await?)
}

/// Gives the user the role within the project, creating the membership when needed.
pub async fn upsert(
    db: &impl ConnectionTrait,
    user_id: Id,
    project_id: Id,
    role: Role,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        user_id: Set(user_id),
        project_id: Set(project_id),
        role: Set(role),
    };

    match find(db, user_id, project_id).await? {
        Some(existing) if existing.role == role => Ok(existing),
        Some(_) => {
            debug!("Changing role of user {user_id} in project {project_id} to {role}");
            Ok(active_model.update(db).await?)
        }
        None => {
            debug!("Adding user {user_id} to project {project_id} as {role}");
            Ok(active_model.insert(db).await?)
        }
    }
}

pub async fn delete(db: &impl ConnectionTrait, user_id: Id, project_id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id((user_id, project_id)).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }
    Ok(())
}
