use super::error::Error;
use crate::{audio, mutate, query, tag, tagset};
use entity::projects::{ActiveModel, Column, Entity, Model};
use entity::{annotations, memberships, projects_audios, projects_tagsets, roles::Role, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashSet;

/// The validated contents of a project's audio and tag lists.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectLists {
    /// Audio paths, one per list line.
    pub audio_paths: Vec<String>,
    /// `(tagset name, tag name)` pairs, one per list line.
    pub tags: Vec<(String, String)>,
}

/// Creates a project, ingests its lists and makes `admin_user_id` its admin.
///
/// Everything happens in one transaction: existing audios, tags and tagsets are reused by
/// exact path or name, missing ones are created, and duplicate lines are linked once.
pub async fn create(
    db: &DatabaseConnection,
    project_model: Model,
    admin_user_id: Id,
    lists: ProjectLists,
) -> Result<Model, Error> {
    debug!("New Project Model to be inserted: {project_model:?}");

    if find_by_name(db, &project_model.name).await?.is_some() {
        warn!("Project named {} already exists", project_model.name);
        return Err(Error::already_exists());
    }

    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    let project = ActiveModel {
        name: Set(project_model.name),
        visualization_type: Set(project_model.visualization_type),
        allow_regions: Set(project_model.allow_regions),
        audiolist_filename: Set(project_model.audiolist_filename),
        taglist_filename: Set(project_model.taglist_filename),
        n_annotations_per_file: Set(project_model.n_annotations_per_file),
        created_by_id: Set(project_model.created_by_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    ingest_lists(&txn, project.id, lists).await?;

    memberships::ActiveModel {
        user_id: Set(admin_user_id),
        project_id: Set(project.id),
        role: Set(Role::Admin),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("Created project {} ({})", project.name, project.id);
    Ok(project)
}

async fn ingest_lists(
    db: &impl ConnectionTrait,
    project_id: Id,
    lists: ProjectLists,
) -> Result<(), Error> {
    let mut linked_audios = HashSet::new();
    for path in &lists.audio_paths {
        let audio = audio::find_or_create_by_path(db, path).await?;
        if linked_audios.insert(audio.id) {
            projects_audios::ActiveModel {
                project_id: Set(project_id),
                audio_id: Set(audio.id),
            }
            .insert(db)
            .await?;
        }
    }

    let mut linked_tagsets = HashSet::new();
    let mut linked_tags = HashSet::new();
    for (tagset_name, tag_name) in &lists.tags {
        let tagset = tagset::find_or_create_by_name(db, tagset_name).await?;
        if linked_tagsets.insert(tagset.id) {
            projects_tagsets::ActiveModel {
                project_id: Set(project_id),
                tagset_id: Set(tagset.id),
            }
            .insert(db)
            .await?;
        }

        let tag = tag::find_or_create_by_name(db, tag_name).await?;
        if linked_tags.insert((tagset.id, tag.id)) {
            tagset::link_tag(db, tagset.id, tag.id).await?;
        }
    }

    debug!(
        "Ingested {} audios and {} tagsets into project {project_id}",
        linked_audios.len(),
        linked_tagsets.len()
    );
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

/// One page of all projects, ordered by name.
pub async fn find_page(db: &impl ConnectionTrait, page: u64) -> Result<Vec<Model>, Error> {
    let query = Entity::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id);
    query::fetch_page(db, query, page).await
}

pub async fn count_audios(db: &impl ConnectionTrait, project_id: Id) -> Result<u64, Error> {
    Ok(projects_audios::Entity::find()
        .filter(projects_audios::Column::ProjectId.eq(project_id))
        .count(db)
        .await?)
}

/// Applies the columns present in `update_map` to the project.
///
/// Renaming onto the name of another project fails with `RecordAlreadyExists`.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    update_map: mutate::UpdateMap,
) -> Result<Model, Error> {
    let project = find_by_id(db, id).await?;
    debug!("Existing Project model to be Updated: {project:?}");

    if let Some(sea_orm::Value::String(Some(name))) = update_map.get("name") {
        if let Some(other) = find_by_name(db, name).await? {
            if other.id != id {
                return Err(Error::already_exists());
            }
        }
    }

    let mut active_model: ActiveModel = project.into();
    active_model.updated_at = Set(chrono::Utc::now().into());

    mutate::update::<ActiveModel, Column>(db, active_model, update_map).await
}

/// Deletes the project along with its annotations, memberships and links.
/// Returns the deleted project so callers can clean up its uploaded list files.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let project = find_by_id(&txn, id).await?;

    annotations::Entity::delete_many()
        .filter(annotations::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    memberships::Entity::delete_many()
        .filter(memberships::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    projects_audios::Entity::delete_many()
        .filter(projects_audios::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    projects_tagsets::Entity::delete_many()
        .filter(projects_tagsets::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!("Deleted project {} ({id})", project.name);
    Ok(project)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::{audios, memberships, tags, tagsets, tagsets_tags, visualization_type::VisualizationType};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn project_model(id: Id, name: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id,
            name: name.to_owned(),
            visualization_type: VisualizationType::Spectrogram,
            allow_regions: true,
            audiolist_filename: Some("a.csv".to_owned()),
            taglist_filename: Some("t.csv".to_owned()),
            n_annotations_per_file: Some(2),
            created_by_id: Some(1),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_already_exists_for_a_duplicate_name() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[project_model(1, "birds")]])
            .into_connection();

        let result = create(
            &db,
            project_model(0, "birds"),
            1,
            ProjectLists::default(),
        )
        .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordAlreadyExists
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_reuses_existing_rows_and_links_duplicates_once() -> Result<(), Error> {
        let project = project_model(10, "frogs");
        let audio = audios::Model {
            id: 20,
            path: "a.wav".to_owned(),
        };
        let tagset = tagsets::Model {
            id: 30,
            name: "calls".to_owned(),
        };
        let tag = tags::Model {
            id: 40,
            name: "croak".to_owned(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // no project with that name yet
            .append_query_results([Vec::<Model>::new()])
            // project insert
            .append_query_results([[project.clone()]])
            // both audio lines resolve to the same existing audio
            .append_query_results([[audio.clone()]])
            .append_query_results([[projects_audios::Model {
                project_id: 10,
                audio_id: 20,
            }]])
            .append_query_results([[audio.clone()]])
            // both tag lines resolve to the same existing tagset and tag
            .append_query_results([[tagset.clone()]])
            .append_query_results([[projects_tagsets::Model {
                project_id: 10,
                tagset_id: 30,
            }]])
            .append_query_results([[tag.clone()]])
            // the tagset already holds the tag
            .append_query_results([[tagsets_tags::Model {
                tagset_id: 30,
                tag_id: 40,
            }]])
            .append_query_results([[tagset.clone()]])
            .append_query_results([[tag.clone()]])
            // admin membership insert
            .append_query_results([[memberships::Model {
                user_id: 1,
                project_id: 10,
                role: Role::Admin,
            }]])
            .into_connection();

        let lists = ProjectLists {
            audio_paths: vec!["a.wav".to_owned(), "a.wav".to_owned()],
            tags: vec![
                ("calls".to_owned(), "croak".to_owned()),
                ("calls".to_owned(), "croak".to_owned()),
            ],
        };

        let created = create(&db, project_model(0, "frogs"), 1, lists).await?;
        assert_eq!(created.id, 10);

        let log = format!("{:?}", db.into_transaction_log());
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"projects_audios\""#).count(), 1);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"projects_tagsets\""#).count(), 1);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"tagsets\""#).count(), 0);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"tags\""#).count(), 0);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"audios\""#).count(), 0);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"tagsets_tags\""#).count(), 0);
        assert_eq!(log.matches(r#"INSERT INTO \"phaunos\".\"memberships\""#).count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_dependent_rows_and_returns_the_project() -> Result<(), Error> {
        let exec = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[project_model(3, "owls")]])
            .append_exec_results([exec(), exec(), exec(), exec(), exec()])
            .into_connection();

        let deleted = delete(&db, 3).await?;

        assert_eq!(deleted.name, "owls");
        let log = format!("{:?}", db.into_transaction_log());
        for table in [
            "annotations",
            "memberships",
            "projects_audios",
            "projects_tagsets",
            "projects",
        ] {
            assert!(log.contains(&format!(r#"DELETE FROM \"phaunos\".\"{table}\""#)));
        }

        Ok(())
    }
}
