use crate::error::Error;
use crate::{audios, Id};
use sea_orm::DatabaseConnection;

/// One page of the audios of a project the caller administers.
pub async fn find_page_by_project(
    db: &DatabaseConnection,
    project_id: Id,
    page: u64,
) -> Result<Vec<audios::Model>, Error> {
    Ok(entity_api::audio::find_page_by_project(db, project_id, page).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    entity_api::audio::delete(db, id).await.map_err(|err| {
        Error::from(err).with_not_found_message(format!("Audio with id {id} not found"))
    })
}
