use super::error::Error;
use crate::query;
use entity::audios::{ActiveModel, Column, Entity, Model};
use entity::{annotations, projects_audios, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, DatabaseConnection, QueryOrder, Set, TransactionTrait,
};

/// Returns the audio with the given path, inserting it first when it does not exist yet.
pub async fn find_or_create_by_path(db: &impl ConnectionTrait, path: &str) -> Result<Model, Error> {
    if let Some(audio) = Entity::find().filter(Column::Path.eq(path)).one(db).await? {
        return Ok(audio);
    }

    let active_model = ActiveModel {
        path: Set(path.to_owned()),
        ..Default::default()
    };
    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// One page of the audios linked to the project, ordered by id.
pub async fn find_page_by_project(
    db: &impl ConnectionTrait,
    project_id: Id,
    page: u64,
) -> Result<Vec<Model>, Error> {
    let query = Entity::find()
        .inner_join(projects_audios::Entity)
        .filter(projects_audios::Column::ProjectId.eq(project_id))
        .order_by_asc(Column::Id);

    query::fetch_page(db, query, page).await
}

pub async fn is_in_project(
    db: &impl ConnectionTrait,
    audio_id: Id,
    project_id: Id,
) -> Result<bool, Error> {
    Ok(projects_audios::Entity::find_by_id((project_id, audio_id))
        .one(db)
        .await?
        .is_some())
}

/// Deletes the audio along with its annotations and project links.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    find_by_id(&txn, id).await?;

    annotations::Entity::delete_many()
        .filter(annotations::Column::AudioId.eq(id))
        .exec(&txn)
        .await?;
    projects_audios::Entity::delete_many()
        .filter(projects_audios::Column::AudioId.eq(id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!("Deleted audio {id}");
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_page_by_project_joins_the_project_link_table() -> Result<(), Error> {
        let audio = Model {
            id: 1,
            path: "a/b.wav".to_owned(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[audio.clone()]])
            .into_connection();

        let audios = find_page_by_project(&db, 4, 1).await?;

        assert_eq!(audios, vec![audio]);
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "audios"."id", "audios"."path" FROM "phaunos"."audios" INNER JOIN "phaunos"."projects_audios" ON "audios"."id" = "projects_audios"."audio_id" WHERE "projects_audios"."project_id" = $1 ORDER BY "audios"."id" ASC LIMIT $2 OFFSET $3"#,
                [
                    4i32.into(),
                    sea_orm::Value::BigUnsigned(Some(10)),
                    sea_orm::Value::BigUnsigned(Some(0))
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn is_in_project_is_false_without_a_link() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<projects_audios::Model>::new()])
            .into_connection();

        assert!(!is_in_project(&db, 1, 2).await?);

        Ok(())
    }
}
