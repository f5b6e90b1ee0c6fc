use super::error::Error;
use crate::query;
use entity::tagsets::{ActiveModel, Column, Entity, Model};
use entity::{projects_tagsets, tags, tagsets_tags, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, DatabaseConnection, QueryOrder,
    Set, TransactionTrait,
};

/// A tagset along with every tag it contains.
pub type TagsetWithTags = (Model, Vec<tags::Model>);

/// Creates a tagset and links it to the given existing tags.
pub async fn create(db: &DatabaseConnection, name: String, tag_ids: Vec<Id>) -> Result<Model, Error> {
    debug!("New Tagset to be inserted: {name} with tags {tag_ids:?}");

    if find_by_name(db, &name).await?.is_some() {
        return Err(Error::already_exists());
    }

    let txn = db.begin().await?;

    let tagset = ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    replace_tags(&txn, tagset.id, tag_ids).await?;

    txn.commit().await?;

    Ok(tagset)
}

/// Returns the tagset with the given name, inserting it first when it does not exist yet.
pub async fn find_or_create_by_name(db: &impl ConnectionTrait, name: &str) -> Result<Model, Error> {
    if let Some(tagset) = find_by_name(db, name).await? {
        debug!("Reusing existing Tagset {} ({})", tagset.name, tagset.id);
        return Ok(tagset);
    }

    let active_model = ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    };
    Ok(active_model.insert(db).await?)
}

/// Links the tag to the tagset unless the link already exists.
pub async fn link_tag(db: &impl ConnectionTrait, tagset_id: Id, tag_id: Id) -> Result<(), Error> {
    if tagsets_tags::Entity::find_by_id((tagset_id, tag_id))
        .one(db)
        .await?
        .is_none()
    {
        tagsets_tags::ActiveModel {
            tagset_id: Set(tagset_id),
            tag_id: Set(tag_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
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

pub async fn find_with_tags(db: &impl ConnectionTrait, id: Id) -> Result<TagsetWithTags, Error> {
    let tagset = find_by_id(db, id).await?;
    let tags = tagset
        .find_related(tags::Entity)
        .order_by_asc(tags::Column::Id)
        .all(db)
        .await?;
    Ok((tagset, tags))
}

/// One page of all tagsets, each with its tags.
pub async fn find_page(db: &impl ConnectionTrait, page: u64) -> Result<Vec<TagsetWithTags>, Error> {
    let tagsets = query::fetch_page(db, Entity::find().order_by_asc(Column::Id), page).await?;
    with_tags(db, tagsets).await
}

/// One page of the tagsets linked to the project, each with its tags.
pub async fn find_page_by_project(
    db: &impl ConnectionTrait,
    project_id: Id,
    page: u64,
) -> Result<Vec<TagsetWithTags>, Error> {
    let query = Entity::find()
        .inner_join(projects_tagsets::Entity)
        .filter(projects_tagsets::Column::ProjectId.eq(project_id))
        .order_by_asc(Column::Id);
    let tagsets = query::fetch_page(db, query, page).await?;
    with_tags(db, tagsets).await
}

async fn with_tags(
    db: &impl ConnectionTrait,
    tagsets: Vec<Model>,
) -> Result<Vec<TagsetWithTags>, Error> {
    let mut result = Vec::with_capacity(tagsets.len());
    for tagset in tagsets {
        let tags = tagset
            .find_related(tags::Entity)
            .order_by_asc(tags::Column::Id)
            .all(db)
            .await?;
        result.push((tagset, tags));
    }
    Ok(result)
}

/// Renames the tagset and, when `tag_ids` is given, replaces its set of tags.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    name: String,
    tag_ids: Option<Vec<Id>>,
) -> Result<Model, Error> {
    let tagset = find_by_id(db, id).await?;
    debug!("Existing Tagset model to be Updated: {tagset:?}");

    if let Some(other) = find_by_name(db, &name).await? {
        if other.id != id {
            return Err(Error::already_exists());
        }
    }

    let txn = db.begin().await?;

    let updated = ActiveModel {
        id: Unchanged(tagset.id),
        name: Set(name),
    }
    .update(&txn)
    .await?;
    if let Some(tag_ids) = tag_ids {
        tagsets_tags::Entity::delete_many()
            .filter(tagsets_tags::Column::TagsetId.eq(id))
            .exec(&txn)
            .await?;
        replace_tags(&txn, id, tag_ids).await?;
    }

    txn.commit().await?;

    Ok(updated)
}

async fn replace_tags(
    db: &impl ConnectionTrait,
    tagset_id: Id,
    mut tag_ids: Vec<Id>,
) -> Result<(), Error> {
    tag_ids.sort_unstable();
    tag_ids.dedup();
    for tag_id in tag_ids {
        // Fail on unknown tags rather than on the foreign key
        tags::Entity::find_by_id(tag_id)
            .one(db)
            .await?
            .ok_or_else(Error::not_found)?;
        tagsets_tags::ActiveModel {
            tagset_id: Set(tagset_id),
            tag_id: Set(tag_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Deletes the tagset and its links to tags and projects. Tags themselves are kept.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    find_by_id(&txn, id).await?;

    tagsets_tags::Entity::delete_many()
        .filter(tagsets_tags::Column::TagsetId.eq(id))
        .exec(&txn)
        .await?;
    projects_tagsets::Entity::delete_many()
        .filter(projects_tagsets::Column::TagsetId.eq(id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!("Deleted tagset {id}");
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
    async fn find_or_create_by_name_reuses_an_existing_tagset() -> Result<(), Error> {
        let existing = Model {
            id: 12,
            name: "birds".to_owned(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .into_connection();

        let tagset = find_or_create_by_name(&db, "birds").await?;

        assert_eq!(tagset.id, 12);
        // A single SELECT and no INSERT
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "tagsets"."id", "tagsets"."name" FROM "phaunos"."tagsets" WHERE "tagsets"."name" = $1 LIMIT $2"#,
                [
                    "birds".into(),
                    sea_orm::Value::BigUnsigned(Some(1))
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_or_create_by_name_inserts_a_missing_tagset() -> Result<(), Error> {
        let created = Model {
            id: 13,
            name: "frogs".to_owned(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([[created.clone()]])
            .into_connection();

        let tagset = find_or_create_by_name(&db, "frogs").await?;

        assert_eq!(tagset, created);
        assert_eq!(db.into_transaction_log().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_a_duplicate_name() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[Model {
                id: 1,
                name: "birds".to_owned(),
            }]])
            .into_connection();

        let result = create(&db, "birds".to_owned(), vec![1, 2]).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordAlreadyExists
        );

        Ok(())
    }
}
