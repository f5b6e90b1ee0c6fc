use super::error::Error;
use entity::annotations::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, Set};

/// Inserts an annotation authored by `user_id`; any user id carried by the model is ignored.
pub async fn create(
    db: &impl ConnectionTrait,
    annotation_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!("New Annotation Model to be inserted: {annotation_model:?}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        start_time: Set(annotation_model.start_time),
        end_time: Set(annotation_model.end_time),
        tag_id: Set(annotation_model.tag_id),
        project_id: Set(annotation_model.project_id),
        audio_id: Set(annotation_model.audio_id),
        user_id: Set(user_id),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn count_by_project(db: &impl ConnectionTrait, project_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::ProjectId.eq(project_id))
        .count(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_always_records_the_given_author() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let submitted = Model {
            id: 0,
            start_time: 1.5,
            end_time: Some(2.5),
            tag_id: 3,
            project_id: 4,
            audio_id: 5,
            user_id: 99,
            created_at: now.into(),
        };
        let stored = Model {
            id: 1,
            user_id: 7,
            ..submitted.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored.clone()]])
            .into_connection();

        let annotation = create(&db, submitted, 7).await?;

        assert_eq!(annotation.user_id, 7);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Int(Some(7))"));
        assert!(!log.contains("Int(Some(99))"));

        Ok(())
    }
}
