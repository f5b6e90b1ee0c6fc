pub use super::annotations::Entity as Annotations;
pub use super::audios::Entity as Audios;
pub use super::memberships::Entity as Memberships;
pub use super::projects::Entity as Projects;
pub use super::projects_audios::Entity as ProjectsAudios;
pub use super::projects_tagsets::Entity as ProjectsTagsets;
pub use super::tags::Entity as Tags;
pub use super::tagsets::Entity as Tagsets;
pub use super::tagsets_tags::Entity as TagsetsTags;
pub use super::users::Entity as Users;
