use crate::error::Error;
use crate::membership::{self, ProjectAccess};
use crate::{annotations, projects, users, Id, QueryFilterMap};
use entity_api::{annotation, audio, query, tag};
use log::*;
use sea_orm::{DatabaseConnection, Value};

/// Annotations returned to a caller: the whole matching set for an export, one page otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationList {
    Export(Vec<annotations::Model>),
    Page(Vec<annotations::Model>),
}

/// Records an annotation by `user` after checking it fits the project.
pub async fn create(
    db: &DatabaseConnection,
    user: &users::Model,
    annotation_model: annotations::Model,
) -> Result<annotations::Model, Error> {
    let project_id = annotation_model.project_id;
    let access = membership::project_access(db, user, project_id).await?;
    membership::require_member(access)?;

    let project = crate::project::find_by_id(db, project_id).await?;
    check_times(&project, annotation_model.start_time, annotation_model.end_time)?;

    let mut messages = Vec::new();
    if !audio::is_in_project(db, annotation_model.audio_id, project_id).await? {
        messages.push(format!(
            "Audio with id {} is not part of project {project_id}.",
            annotation_model.audio_id
        ));
    }
    if !tag::is_in_project(db, annotation_model.tag_id, project_id).await? {
        messages.push(format!(
            "Tag with id {} is not part of project {project_id}.",
            annotation_model.tag_id
        ));
    }
    if !messages.is_empty() {
        return Err(Error::validation(messages));
    }

    let annotation = annotation::create(db, annotation_model, user.id).await?;
    debug!(
        "User {} annotated audio {} in project {project_id}",
        user.username, annotation.audio_id
    );
    Ok(annotation)
}

/// Checks the time range of an annotation against the project settings.
pub fn check_times(
    project: &projects::Model,
    start_time: f64,
    end_time: Option<f64>,
) -> Result<(), Error> {
    let mut messages = Vec::new();

    if !start_time.is_finite() || start_time < 0.0 {
        messages.push("Start time must be a positive number.".to_string());
    }
    match end_time {
        Some(_) if !project.allow_regions => {
            messages.push("This project only accepts point annotations.".to_string())
        }
        Some(end_time) if !end_time.is_finite() || end_time <= start_time => {
            messages.push("End time must be greater than start time.".to_string())
        }
        _ => {}
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(messages))
    }
}

/// Lists annotations of the project in `query_filter_map`.
///
/// Members only ever see their own annotations. Project admins see everyone's and may ask
/// for the whole set at once with `export`.
pub async fn find_by(
    db: &DatabaseConnection,
    user: &users::Model,
    access: ProjectAccess,
    mut query_filter_map: QueryFilterMap,
    export: bool,
    page: u64,
) -> Result<AnnotationList, Error> {
    membership::require_member(access)?;

    if let Some(audio_id) = id_filter(&query_filter_map, "audio_id") {
        audio::find_by_id(db, audio_id).await.map_err(|err| {
            Error::from(err).with_not_found_message(format!("Audio with id {audio_id} not found"))
        })?;
    }
    if let Some(tag_id) = id_filter(&query_filter_map, "tag_id") {
        tag::find_by_id(db, tag_id).await.map_err(|err| {
            Error::from(err).with_not_found_message(format!("Tag with id {tag_id} not found"))
        })?;
    }

    if access.is_admin() {
        if export {
            info!("User {} exports annotations", user.username);
            let annotations = query::find_by::<annotations::Entity, annotations::Column>(
                db,
                query_filter_map,
            )
            .await?;
            return Ok(AnnotationList::Export(annotations));
        }
    } else {
        query_filter_map.insert("user_id".to_string(), Some(Value::Int(Some(user.id))));
    }

    let annotations = query::find_page_by::<annotations::Entity, annotations::Column>(
        db,
        query_filter_map,
        page,
    )
    .await?;
    Ok(AnnotationList::Page(annotations))
}

fn id_filter(query_filter_map: &QueryFilterMap, key: &str) -> Option<Id> {
    match query_filter_map.get(key) {
        Some(Value::Int(Some(id))) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use crate::VisualizationType;

    fn project(allow_regions: bool) -> projects::Model {
        let now = chrono::Utc::now();
        projects::Model {
            id: 1,
            name: "birds".to_owned(),
            visualization_type: VisualizationType::Spectrogram,
            allow_regions,
            audiolist_filename: None,
            taglist_filename: None,
            n_annotations_per_file: None,
            created_by_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn messages(err: Error) -> Vec<String> {
        match err.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation(messages)) => messages,
            other => panic!("unexpected error kind {other:?}"),
        }
    }

    #[test]
    fn regions_and_points_are_accepted_when_regions_are_allowed() {
        assert!(check_times(&project(true), 0.0, Some(1.5)).is_ok());
        assert!(check_times(&project(true), 2.0, None).is_ok());
    }

    #[test]
    fn end_time_must_follow_start_time() {
        let err = check_times(&project(true), 2.0, Some(2.0)).unwrap_err();
        assert_eq!(messages(err), vec!["End time must be greater than start time."]);

        assert!(check_times(&project(true), 2.0, Some(1.0)).is_err());
    }

    #[test]
    fn negative_start_time_is_rejected() {
        let err = check_times(&project(true), -0.5, None).unwrap_err();
        assert_eq!(messages(err), vec!["Start time must be a positive number."]);
    }

    #[test]
    fn point_only_projects_refuse_regions() {
        let err = check_times(&project(false), 1.0, Some(3.0)).unwrap_err();
        assert_eq!(
            messages(err),
            vec!["This project only accepts point annotations."]
        );
        assert!(check_times(&project(false), 1.0, None).is_ok());
    }

    #[test]
    fn id_filters_read_integer_values_only() {
        let mut map = QueryFilterMap::new();
        map.insert("audio_id".to_string(), Some(Value::Int(Some(4))));
        map.insert("tag_id".to_string(), None);

        assert_eq!(id_filter(&map, "audio_id"), Some(4));
        assert_eq!(id_filter(&map, "tag_id"), None);
        assert_eq!(id_filter(&map, "project_id"), None);
    }
}
