use sea_orm::Value;
use serde::Deserialize;
use utoipa::ToSchema;

use domain::error::Error as DomainError;
use domain::project::NewProject;
use domain::{Id, IntoUpdateMap, Role, UpdateMap, VisualizationType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParams {
    pub name: Option<String>,
    pub visualization_type: Option<VisualizationType>,
    pub allow_regions: Option<bool>,
    pub n_annotations_per_file: Option<i32>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(name) = self.name {
            update_map.insert(
                "name".to_string(),
                Some(Value::String(Some(Box::new(name.trim().to_owned())))),
            );
        }
        if let Some(visualization_type) = self.visualization_type {
            update_map.insert(
                "visualization_type".to_string(),
                Some(visualization_type.into()),
            );
        }
        if let Some(allow_regions) = self.allow_regions {
            update_map.insert(
                "allow_regions".to_string(),
                Some(Value::Bool(Some(allow_regions))),
            );
        }
        if let Some(n) = self.n_annotations_per_file {
            update_map.insert(
                "n_annotations_per_file".to_string(),
                Some(Value::Int(Some(n))),
            );
        }
        update_map
    }
}

/// Adds a user to a project, or changes the role they already hold there.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MembershipParams {
    pub user_id: Id,
    #[serde(default)]
    pub role: Role,
}

/// OpenAPI description of the multipart project creation form.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct NewProjectForm {
    name: String,
    visualization_type: Option<VisualizationType>,
    allow_regions: Option<bool>,
    n_annotations_per_file: Option<i32>,
    /// Defaults to the caller
    admin_user_id: Option<Id>,
    /// One audio path per line, `.wav` or `.mp3`
    #[schema(value_type = String, format = Binary)]
    audiolist: Vec<u8>,
    /// One `tagset_name,tag_name` pair per line
    #[schema(value_type = String, format = Binary)]
    taglist: Vec<u8>,
}

/// Fields of the multipart project creation form, collected as they stream in.
#[derive(Debug, Default)]
pub(crate) struct ProjectForm {
    name: Option<String>,
    visualization_type: Option<String>,
    allow_regions: Option<String>,
    n_annotations_per_file: Option<String>,
    admin_user_id: Option<String>,
    audio_list: Option<Vec<u8>>,
    tag_list: Option<Vec<u8>>,
}

impl ProjectForm {
    /// Stores a text field. Returns false for field names the form does not know.
    pub(crate) fn set_text(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "visualization_type" => &mut self.visualization_type,
            "allow_regions" => &mut self.allow_regions,
            "n_annotations_per_file" => &mut self.n_annotations_per_file,
            "admin_user_id" => &mut self.admin_user_id,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Stores an uploaded list. Returns false for field names the form does not know.
    pub(crate) fn set_file(&mut self, field: &str, content: Vec<u8>) -> bool {
        match field {
            "audiolist" => self.audio_list = Some(content),
            "taglist" => self.tag_list = Some(content),
            _ => return false,
        }
        true
    }

    /// Checks every field and reports all problems at once.
    pub(crate) fn into_new_project(self) -> Result<NewProject, DomainError> {
        let mut messages = Vec::new();

        let visualization_type = match non_blank(self.visualization_type) {
            Some(value) => value.parse::<VisualizationType>().unwrap_or_else(|err| {
                messages.push(format!("{err}."));
                VisualizationType::default()
            }),
            None => VisualizationType::default(),
        };

        let allow_regions = match non_blank(self.allow_regions).map(|v| v.to_lowercase()) {
            None => false,
            Some(value) => match value.as_str() {
                "1" | "true" | "on" | "yes" | "y" => true,
                "0" | "false" | "off" | "no" | "n" => false,
                _ => {
                    messages.push(format!("allow_regions must be a boolean, got {value}."));
                    false
                }
            },
        };

        let n_annotations_per_file =
            parse_number(self.n_annotations_per_file, "n_annotations_per_file", &mut messages);
        let admin_user_id = parse_number(self.admin_user_id, "admin_user_id", &mut messages);

        if self.audio_list.is_none() {
            messages.push("Audio list file is required.".to_string());
        }
        if self.tag_list.is_none() {
            messages.push("Tag list file is required.".to_string());
        }

        match (self.audio_list, self.tag_list) {
            (Some(audio_list), Some(tag_list)) if messages.is_empty() => Ok(NewProject {
                name: self.name.unwrap_or_default(),
                visualization_type,
                allow_regions,
                n_annotations_per_file,
                admin_user_id,
                audio_list,
                tag_list,
            }),
            _ => Err(DomainError::validation(messages)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_number(value: Option<String>, field: &str, messages: &mut Vec<String>) -> Option<Id> {
    let value = non_blank(value)?;
    match value.parse::<Id>() {
        Ok(number) => Some(number),
        Err(_) => {
            messages.push(format!("{field} must be an integer, got {value}."));
            None
        }
    }
}
