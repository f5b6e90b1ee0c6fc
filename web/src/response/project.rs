use domain::project::{ProjectDetail as DomainProjectDetail, ProjectEdit as DomainProjectEdit};
use domain::{projects::Model as ProjectModel, Id, Role};
use serde::Serialize;
use utoipa::ToSchema;

/// A project with its annotation progress.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectModel,
    pub n_audios: u64,
    pub n_annotations: u64,
    pub is_completed: bool,
    /// Percentage of the annotation target reached, when the project sets one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<u8>,
}

impl From<DomainProjectDetail> for ProjectDetail {
    fn from(detail: DomainProjectDetail) -> Self {
        Self {
            project: detail.project,
            n_audios: detail.n_audios,
            n_annotations: detail.n_annotations,
            is_completed: detail.is_completed,
            completion: detail.completion,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Member {
    pub user_id: Id,
    /// Absent only if the user row disappeared underneath the membership
    pub username: Option<String>,
    pub role: Role,
}

/// The administration view of a project.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectEdit {
    #[serde(flatten)]
    pub project: ProjectModel,
    pub memberships: Vec<Member>,
    pub audiolist_url: Option<String>,
    pub taglist_url: Option<String>,
}

impl From<DomainProjectEdit> for ProjectEdit {
    fn from(edit: DomainProjectEdit) -> Self {
        let memberships = edit
            .memberships
            .into_iter()
            .map(|(membership, user)| Member {
                user_id: membership.user_id,
                username: user.map(|user| user.username),
                role: membership.role,
            })
            .collect();

        Self {
            project: edit.project,
            memberships,
            audiolist_url: edit.audiolist_url,
            taglist_url: edit.taglist_url,
        }
    }
}
