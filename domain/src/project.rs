use crate::error::Error;
use crate::storage::{self, ListKind};
use crate::{lists, memberships, projects, users, Id, UpdateMap, VisualizationType};
use entity_api::{annotation, membership, project, user};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

pub use entity_api::project::find_page;

/// A project together with its annotation progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetail {
    pub project: projects::Model,
    pub n_audios: u64,
    pub n_annotations: u64,
    pub is_completed: bool,
    /// Percentage in `0..=100`, absent when no target is set or the project has no audio.
    pub completion: Option<u8>,
}

/// Everything submitted with the project creation form.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub visualization_type: VisualizationType,
    pub allow_regions: bool,
    pub n_annotations_per_file: Option<i32>,
    /// Defaults to the creating user.
    pub admin_user_id: Option<Id>,
    pub audio_list: Vec<u8>,
    pub tag_list: Vec<u8>,
}

/// The administration view of a project.
#[derive(Debug, Clone)]
pub struct ProjectEdit {
    pub project: projects::Model,
    pub memberships: Vec<(memberships::Model, Option<users::Model>)>,
    pub audiolist_url: Option<String>,
    pub taglist_url: Option<String>,
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<projects::Model, Error> {
    project::find_by_id(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))
}

fn not_found_message(id: Id) -> String {
    format!("Project with id {id} not found")
}

/// Whether every audio of the project holds its target number of annotations.
pub fn is_completed(n_annotations_per_file: Option<i32>, n_audios: u64, n_annotations: u64) -> bool {
    match n_annotations_per_file {
        Some(n) if n > 0 => n_annotations >= n_audios * n as u64,
        _ => false,
    }
}

pub fn completion(n_annotations_per_file: Option<i32>, n_audios: u64, n_annotations: u64) -> Option<u8> {
    let per_file = u64::try_from(n_annotations_per_file?).ok().filter(|n| *n > 0)?;
    let target = n_audios.checked_mul(per_file).filter(|t| *t > 0)?;
    Some((n_annotations.saturating_mul(100) / target).min(100) as u8)
}

pub async fn find_detail(db: &DatabaseConnection, id: Id) -> Result<ProjectDetail, Error> {
    let project = find_by_id(db, id).await?;
    let n_audios = project::count_audios(db, id).await?;
    let n_annotations = annotation::count_by_project(db, id).await?;

    Ok(ProjectDetail {
        is_completed: is_completed(project.n_annotations_per_file, n_audios, n_annotations),
        completion: completion(project.n_annotations_per_file, n_audios, n_annotations),
        project,
        n_audios,
        n_annotations,
    })
}

pub async fn find_edit(db: &DatabaseConnection, id: Id) -> Result<ProjectEdit, Error> {
    let project = find_by_id(db, id).await?;
    let memberships = membership::find_by_project_with_users(db, id).await?;

    Ok(ProjectEdit {
        audiolist_url: project
            .audiolist_filename
            .as_deref()
            .map(|name| ListKind::Audio.download_path(name)),
        taglist_url: project
            .taglist_filename
            .as_deref()
            .map(|name| ListKind::Tag.download_path(name)),
        project,
        memberships,
    })
}

/// Validates the form, stores both lists and creates the project with its admin.
///
/// Stored files are removed again when the database work fails.
pub async fn create(
    db: &DatabaseConnection,
    config: &Config,
    creator: &users::Model,
    new_project: NewProject,
) -> Result<projects::Model, Error> {
    let name = new_project.name.trim().to_owned();
    check_settings(Some(&name), new_project.n_annotations_per_file)?;

    let audio_list = decode_list("Audio list", &new_project.audio_list)?;
    let tag_list = decode_list("Tag list", &new_project.tag_list)?;
    let lists = lists::parse_project_lists(audio_list, tag_list)?;

    if project::find_by_name(db, &name).await?.is_some() {
        return Err(Error::conflict(duplicate_message(&name)));
    }

    let admin_user_id = new_project.admin_user_id.unwrap_or(creator.id);
    user::find_by_id(db, admin_user_id).await.map_err(|err| {
        Error::from(err).with_not_found_message(format!("User with id {admin_user_id} not found"))
    })?;

    let audiolist_filename =
        storage::store_list(config, ListKind::Audio, &new_project.audio_list).await?;
    let taglist_filename =
        match storage::store_list(config, ListKind::Tag, &new_project.tag_list).await {
            Ok(filename) => filename,
            Err(err) => {
                discard_list(config, ListKind::Audio, &audiolist_filename).await;
                return Err(err);
            }
        };

    let now = chrono::Utc::now();
    let model = projects::Model {
        id: 0,
        name: name.clone(),
        visualization_type: new_project.visualization_type,
        allow_regions: new_project.allow_regions,
        audiolist_filename: Some(audiolist_filename.clone()),
        taglist_filename: Some(taglist_filename.clone()),
        n_annotations_per_file: new_project.n_annotations_per_file,
        created_by_id: Some(creator.id),
        created_at: now.into(),
        updated_at: now.into(),
    };

    match project::create(db, model, admin_user_id, lists).await {
        Ok(project) => Ok(project),
        Err(err) => {
            warn!("Project {name} was not created, removing its stored lists");
            discard_list(config, ListKind::Audio, &audiolist_filename).await;
            discard_list(config, ListKind::Tag, &taglist_filename).await;
            Err(Error::from(err).with_conflict_message(duplicate_message(&name)))
        }
    }
}

/// Removes a list stored for a project that was never created. Failures are only logged so
/// the caller keeps reporting the error that made the creation fail.
async fn discard_list(config: &Config, kind: ListKind, filename: &str) {
    if let Err(err) = storage::remove_list(config, kind, filename).await {
        error!("Could not remove stored list {filename}: {err:?}");
    }
}

/// Checks the editable settings shared by creation and update. A name, when given, must not
/// be blank once trimmed.
fn check_settings(name: Option<&str>, n_annotations_per_file: Option<i32>) -> Result<(), Error> {
    let mut messages = Vec::new();
    if matches!(name, Some(name) if name.trim().is_empty()) {
        messages.push("Project name is required.".to_string());
    }
    if matches!(n_annotations_per_file, Some(n) if n < 1) {
        messages.push("Number of annotations per file must be at least 1.".to_string());
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(messages))
    }
}

fn decode_list<'a>(label: &str, content: &'a [u8]) -> Result<&'a str, Error> {
    std::str::from_utf8(content)
        .map_err(|_| Error::validation(vec![format!("{label} file is not valid UTF-8 text.")]))
}

fn duplicate_message(name: &str) -> String {
    format!("A project named {name} already exists.")
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    update_map: UpdateMap,
) -> Result<projects::Model, Error> {
    let name = match update_map.get("name") {
        Some(sea_orm::Value::String(Some(name))) => Some(name.to_string()),
        _ => None,
    };
    let n_annotations_per_file = match update_map.get("n_annotations_per_file") {
        Some(sea_orm::Value::Int(n)) => *n,
        _ => None,
    };
    check_settings(name.as_deref(), n_annotations_per_file)?;

    project::update(db, id, update_map).await.map_err(|err| {
        let err = Error::from(err).with_not_found_message(not_found_message(id));
        match name {
            Some(name) => err.with_conflict_message(duplicate_message(&name)),
            None => err,
        }
    })
}

/// Deletes the project with everything attached to it, then its uploaded lists.
pub async fn delete(db: &DatabaseConnection, config: &Config, id: Id) -> Result<(), Error> {
    let project = project::delete(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(not_found_message(id)))?;

    if let Some(filename) = &project.audiolist_filename {
        storage::remove_list(config, ListKind::Audio, filename).await?;
    }
    if let Some(filename) = &project.taglist_filename {
        storage::remove_list(config, ListKind::Tag, filename).await?;
    }
    Ok(())
}
