//! Tagsets as seen by annotators and administrators. Tagsets are always returned with
//! their tags.

use crate::error::Error;
use crate::{project, Id};
use entity_api::tagset;
use sea_orm::DatabaseConnection;

pub use entity_api::tagset::{find_page, TagsetWithTags};

pub async fn find_with_tags(db: &DatabaseConnection, id: Id) -> Result<TagsetWithTags, Error> {
    tagset::find_with_tags(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))
}

/// One page of the tagsets of a project. The project must exist.
pub async fn find_page_by_project(
    db: &DatabaseConnection,
    project_id: Id,
    page: u64,
) -> Result<Vec<TagsetWithTags>, Error> {
    project::find_by_id(db, project_id).await?;
    Ok(tagset::find_page_by_project(db, project_id, page).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    name: String,
    tag_ids: Vec<Id>,
) -> Result<TagsetWithTags, Error> {
    let name = required_name(name)?;
    let created = tagset::create(db, name.clone(), tag_ids)
        .await
        .map_err(|err| {
            Error::from(err)
                .with_not_found_message("Unknown tag id in tag_ids.")
                .with_conflict_message(duplicate_message(&name))
        })?;
    find_with_tags(db, created.id).await
}

/// Renames the tagset and, when `tag_ids` is given, replaces its tags.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    name: String,
    tag_ids: Option<Vec<Id>>,
) -> Result<TagsetWithTags, Error> {
    let name = required_name(name)?;
    tagset::find_by_id(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))?;

    tagset::update(db, id, name.clone(), tag_ids)
        .await
        .map_err(|err| {
            Error::from(err)
                .with_not_found_message("Unknown tag id in tag_ids.")
                .with_conflict_message(duplicate_message(&name))
        })?;
    find_with_tags(db, id).await
}

pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    tagset::delete(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))
}

fn required_name(name: String) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        Err(Error::validation(vec!["Tagset name is required.".to_string()]))
    } else {
        Ok(name.to_owned())
    }
}

fn not_found_message(id: Id) -> String {
    format!("Tagset with id {id} not found")
}

fn duplicate_message(name: &str) -> String {
    format!("A tagset named {name} already exists.")
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::projects;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn tagsets_of_an_unknown_project_are_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<projects::Model>::new()])
            .into_connection();

        let err = find_page_by_project(&db, 12, 1).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(format!("{:?}", err.error_kind).contains("Project with id 12 not found"));
    }

    #[tokio::test]
    async fn blank_names_are_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(create(&db, " ".to_owned(), vec![]).await.is_err());
        assert!(db.into_transaction_log().is_empty());
    }
}
