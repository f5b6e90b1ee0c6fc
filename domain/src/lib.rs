//! This module re-exports various items from the `entity_api` crate.
//!
//! Consumers of the `domain` crate, `web` in particular, never depend on `entity_api`
//! directly. The query filter and update maps, the entity models and the shared types are
//! all reached through here, while persistence details stay in `entity_api`.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    project::ProjectLists,
    IntoQueryFilterMap, QueryFilterMap, MAX_PAGE, PAGE_SIZE,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    annotations, audios, memberships, projects, tags, tagsets, users, Id, Role, VisualizationType,
};

pub mod annotation;
pub mod audio;
pub mod emails;
pub mod error;
pub mod jwt;
pub mod lists;
pub mod membership;
pub mod project;
pub mod storage;
pub mod tag;
pub mod tagset;
pub mod user;

pub mod gateway;
