use domain::user::UserWithMemberships as DomainUserWithMemberships;
use domain::{users::Model as UserModel, Id, Role};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectRole {
    pub project_id: Id,
    pub project_name: Option<String>,
    pub role: Role,
}

/// A user with the projects they belong to. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithMemberships {
    #[serde(flatten)]
    pub user: UserModel,
    pub projects: Vec<ProjectRole>,
}

impl From<DomainUserWithMemberships> for UserWithMemberships {
    fn from((user, memberships): DomainUserWithMemberships) -> Self {
        let projects = memberships
            .into_iter()
            .map(|(membership, project)| ProjectRole {
                project_id: membership.project_id,
                project_name: project.map(|project| project.name),
                role: membership.role,
            })
            .collect();

        Self { user, projects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::memberships;

    #[test]
    fn password_hash_stays_out_of_the_user_view() {
        let now = chrono::Utc::now();
        let user = UserModel {
            id: 1,
            username: "user1".to_owned(),
            email: "user1@test.com".to_owned(),
            password: "secret-hash".to_owned(),
            is_admin: true,
            confirmed_on: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let membership = memberships::Model {
            user_id: 1,
            project_id: 2,
            role: Role::Member,
        };

        let view = UserWithMemberships::from((user, vec![(membership, None)]));
        let serialized = serde_json::to_string(&view).unwrap();

        assert!(!serialized.contains("secret-hash"));
        assert!(serialized.contains(r#""project_id":2"#));
        assert!(serialized.contains(r#""username":"user1""#));
    }
}
