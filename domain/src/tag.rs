use crate::error::Error;
use crate::{tags, Id};
use entity_api::tag;
use sea_orm::DatabaseConnection;

pub use entity_api::tag::find_page;

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<tags::Model, Error> {
    tag::find_by_id(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))
}

pub async fn create(db: &DatabaseConnection, name: String) -> Result<tags::Model, Error> {
    let name = required_name(name)?;
    tag::create(db, name.clone())
        .await
        .map_err(|err| Error::from(err).with_conflict_message(duplicate_message(&name)))
}

pub async fn update(db: &DatabaseConnection, id: Id, name: String) -> Result<tags::Model, Error> {
    let name = required_name(name)?;
    tag::update(db, id, name.clone()).await.map_err(|err| {
        Error::from(err)
            .with_not_found_message(not_found_message(id))
            .with_conflict_message(duplicate_message(&name))
    })
}

/// Deletes the tag together with every annotation using it.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    tag::delete(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))
}

fn required_name(name: String) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        Err(Error::validation(vec!["Tag name is required.".to_string()]))
    } else {
        Ok(name.to_owned())
    }
}

fn not_found_message(id: Id) -> String {
    format!("Tag with id {id} not found")
}

fn duplicate_message(name: &str) -> String {
    format!("A tag named {name} already exists.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(required_name("  crow ".to_owned()).unwrap(), "crow");
        assert!(required_name("   ".to_owned()).is_err());
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn creating_a_known_tag_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[tags::Model {
                id: 1,
                name: "crow".to_owned(),
            }]])
            .into_connection();

        let err = create(&db, "crow".to_owned()).await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict(
                "A tag named crow already exists.".to_string()
            )))
        );
    }
}
