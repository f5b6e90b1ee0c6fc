//! The administration API. Every route here takes a global admin, except the membership
//! routes which the admins of the project may use too.

pub(crate) mod audio_controller;
pub(crate) mod membership_controller;
pub(crate) mod project_controller;
pub(crate) mod tag_controller;
pub(crate) mod tagset_controller;
pub(crate) mod user_controller;
