//! Response DTOs for the views that combine several records.
//!
//! Plain records are serialized straight from their entity models. The types here shape the
//! joined views, reusing the entity models where they can.

pub(crate) mod project;
pub(crate) mod tagset;
pub(crate) mod user;
