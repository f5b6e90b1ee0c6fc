pub mod prelude;

// Catalog entities
pub mod audios;
pub mod tags;
pub mod tagsets;

// Project aggregate and its link tables
pub mod annotations;
pub mod memberships;
pub mod projects;
pub mod projects_audios;
pub mod projects_tagsets;
pub mod tagsets_tags;

pub mod jwt;
pub mod roles;
pub mod users;
pub mod visualization_type;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = i32;
