use super::error::{EntityApiErrorKind, Error};
use crate::mutate::{self, UpdateMap};
use crate::query;
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{annotations, memberships, projects, Id};
use log::*;
use password_auth;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, Condition, ConnectionTrait, DatabaseConnection,
    QueryOrder, Set, TransactionTrait, Value,
};

/// Inserts a new user, hashing the plaintext password carried by `user_model`.
///
/// Fails with `RecordAlreadyExists` when the username or the email is already taken.
pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {}", user_model.username);

    if find_by_username_or_email(db, &user_model.username, &user_model.email)
        .await?
        .is_some()
    {
        warn!(
            "User with username {} or email {} already exists",
            user_model.username, user_model.email
        );
        return Err(Error::already_exists());
    }

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        username: Set(user_model.username),
        email: Set(user_model.email),
        password: Set(generate_hash(user_model.password)),
        is_admin: Set(user_model.is_admin),
        confirmed_on: Set(user_model.confirmed_on),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_username(
    db: &impl ConnectionTrait,
    username: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

async fn find_by_username_or_email(
    db: &impl ConnectionTrait,
    username: &str,
    email: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(Column::Username.eq(username))
                .add(Column::Email.eq(email)),
        )
        .one(db)
        .await?)
}

/// One page of all users, ordered by id.
pub async fn find_page(db: &impl ConnectionTrait, page: u64) -> Result<Vec<Model>, Error> {
    query::fetch_page(db, Entity::find().order_by_asc(Column::Id), page).await
}

/// One page of the users holding a membership in the given project, ordered by id.
pub async fn find_page_by_project(
    db: &impl ConnectionTrait,
    project_id: Id,
    page: u64,
) -> Result<Vec<Model>, Error> {
    let query = Entity::find()
        .inner_join(memberships::Entity)
        .filter(memberships::Column::ProjectId.eq(project_id))
        .order_by_asc(Column::Id);

    query::fetch_page(db, query, page).await
}

/// Every membership of the user along with the project it refers to.
pub async fn find_memberships(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Vec<(memberships::Model, Option<projects::Model>)>, Error> {
    Ok(memberships::Entity::find()
        .filter(memberships::Column::UserId.eq(user_id))
        .find_also_related(projects::Entity)
        .order_by_asc(memberships::Column::ProjectId)
        .all(db)
        .await?)
}

/// Marks the user's email address as confirmed now.
pub async fn confirm(db: &impl ConnectionTrait, user: Model) -> Result<Model, Error> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Unchanged(user.id),
        confirmed_on: Set(Some(now.into())),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

/// Applies the columns present in `update_map` to the user.
///
/// Taking over the username or email of another account fails with `RecordAlreadyExists`.
pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    update_map: UpdateMap,
) -> Result<Model, Error> {
    let user = find_by_id(db, id).await?;
    debug!("Existing User model to be Updated: {}", user.username);

    for column in [Column::Username, Column::Email] {
        if let Some(Value::String(Some(value))) = update_map.get(&column.to_string()) {
            if let Some(other) = Entity::find()
                .filter(column.eq(value.as_str()))
                .one(db)
                .await?
            {
                if other.id != id {
                    return Err(Error::already_exists());
                }
            }
        }
    }

    let mut active_model: ActiveModel = user.into();
    active_model.updated_at = Set(Utc::now().into());

    mutate::update::<ActiveModel, Column>(db, active_model, update_map).await
}

/// Deletes the user together with their annotations and memberships.
pub async fn delete(db: &DatabaseConnection, user_id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    Entity::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(Error::not_found)?;

    annotations::Entity::delete_many()
        .filter(annotations::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    memberships::Entity::delete_many()
        .filter(memberships::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    info!("Deleted user {user_id}");
    Ok(())
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod test {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn user_model(id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id,
            username: "user1".to_owned(),
            email: "user1@test.com".to_owned(),
            password: "password123".to_owned(),
            is_admin: false,
            confirmed_on: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_username_returns_a_single_record() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let _ = find_by_username(&db, "user1").await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "users"."id", "users"."username", "users"."email", "users"."password", "users"."is_admin", "users"."confirmed_on", "users"."created_at", "users"."updated_at" FROM "phaunos"."users" WHERE "users"."username" = $1 LIMIT $2"#,
                ["user1".into(), 1u64.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_returns_a_new_user_with_a_hashed_password() -> Result<(), Error> {
        let mut stored = user_model(1);
        stored.password = generate_hash("password123".to_owned());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([[stored.clone()]])
            .into_connection();

        let user = create(&db, user_model(0)).await?;

        assert_eq!(user.id, 1);
        assert_ne!(user.password, "password123");
        assert!(verify_password("password123", &user.password).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn create_returns_already_exists_for_a_taken_username() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(7)]])
            .into_connection();

        let result = create(&db, user_model(0)).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordAlreadyExists
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_annotations_and_memberships_before_the_user() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(3)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        delete(&db, 3).await?;

        let log = format!("{:?}", db.into_transaction_log());
        let annotations_at = log.find(r#"DELETE FROM \"phaunos\".\"annotations\""#);
        let memberships_at = log.find(r#"DELETE FROM \"phaunos\".\"memberships\""#);
        let users_at = log.find(r#"DELETE FROM \"phaunos\".\"users\""#);
        assert!(annotations_at.is_some());
        assert!(memberships_at.is_some());
        assert!(annotations_at < users_at && memberships_at < users_at);

        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_not_found_for_an_unknown_user() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = delete(&db, 42).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }
}
