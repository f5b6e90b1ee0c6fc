use super::error::Error;
use crate::query;
use entity::tags::{ActiveModel, Column, Entity, Model};
use entity::{annotations, projects_tagsets, tagsets_tags, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, DatabaseConnection, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

pub async fn create(db: &impl ConnectionTrait, name: String) -> Result<Model, Error> {
    debug!("New Tag to be inserted: {name}");

    if find_by_name(db, &name).await?.is_some() {
        return Err(Error::already_exists());
    }

    let active_model = ActiveModel {
        name: Set(name),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

/// Returns the tag with the given name, inserting it first when it does not exist yet.
pub async fn find_or_create_by_name(db: &impl ConnectionTrait, name: &str) -> Result<Model, Error> {
    if let Some(tag) = find_by_name(db, name).await? {
        return Ok(tag);
    }

    let active_model = ActiveModel {
        name: Set(name.to_owned()),
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

pub async fn find_by_name(db: &impl ConnectionTrait, name: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find().filter(Column::Name.eq(name)).one(db).await?)
}

pub async fn find_page(db: &impl ConnectionTrait, page: u64) -> Result<Vec<Model>, Error> {
    query::fetch_page(db, Entity::find().order_by_asc(Column::Id), page).await
}

/// Whether the tag belongs to at least one of the tagsets linked to the project.
pub async fn is_in_project(
    db: &impl ConnectionTrait,
    tag_id: Id,
    project_id: Id,
) -> Result<bool, Error> {
    let tagset_ids = projects_tagsets::Entity::find()
        .select_only()
        .column(projects_tagsets::Column::TagsetId)
        .filter(projects_tagsets::Column::ProjectId.eq(project_id))
        .into_tuple::<Id>()
        .all(db)
        .await?;

    if tagset_ids.is_empty() {
        return Ok(false);
    }

    let link = tagsets_tags::Entity::find()
        .filter(tagsets_tags::Column::TagId.eq(tag_id))
        .filter(tagsets_tags::Column::TagsetId.is_in(tagset_ids))
        .one(db)
        .await?;

    Ok(link.is_some())
}

pub async fn update(db: &impl ConnectionTrait, id: Id, name: String) -> Result<Model, Error> {
    let tag = find_by_id(db, id).await?;
    debug!("Existing Tag model to be Updated: {tag:?}");

    if let Some(other) = find_by_name(db, &name).await? {
        if other.id != id {
            return Err(Error::already_exists());
        }
    }

    let active_model = ActiveModel {
        id: Unchanged(tag.id),
        name: Set(name),
    };

    Ok(active_model.update(db).await?)
}

/// Deletes the tag, its annotations and its tagset links.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    find_by_id(&txn, id).await?;

    annotations::Entity::delete_many()
        .filter(annotations::Column::TagId.eq(id))
        .exec(&txn)
        .await?;
    tagsets_tags::Entity::delete_many()
        .filter(tagsets_tags::Column::TagId.eq(id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!("Deleted tag {id}");
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_or_create_by_name_reuses_an_existing_tag() -> Result<(), Error> {
        let existing = Model {
            id: 5,
            name: "bird".to_owned(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .into_connection();

        let tag = find_or_create_by_name(&db, "bird").await?;

        assert_eq!(tag, existing);
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "tags"."id", "tags"."name" FROM "phaunos"."tags" WHERE "tags"."name" = $1 LIMIT $2"#,
                [
                    "bird".into(),
                    sea_orm::Value::BigUnsigned(Some(1))
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_a_name_held_by_another_tag() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[Model {
                id: 1,
                name: "bird".to_owned(),
            }]])
            .append_query_results([[Model {
                id: 2,
                name: "frog".to_owned(),
            }]])
            .into_connection();

        let result = update(&db, 1, "frog".to_owned()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordAlreadyExists
        );

        Ok(())
    }

    #[tokio::test]
    async fn is_in_project_is_false_for_a_project_without_tagsets() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<projects_tagsets::Model>::new()])
            .into_connection();

        assert!(!is_in_project(&db, 1, 1).await?);

        Ok(())
    }
}
