//! This module holds typed parameters for various endpoint inputs.
//!
//! Query strings and request bodies are deserialized into these structs before any handler
//! runs, and converted into the `QueryFilterMap`s and `UpdateMap`s the domain layer consumes.

pub(crate) mod annotation;
pub(crate) mod project;
pub(crate) mod tag;
pub(crate) mod tagset;
pub(crate) mod user;

use domain::{error::Error as DomainError, Id, MAX_PAGE};
use serde::{Deserialize, Deserializer};

/// The requested 1-based page. Missing, zero and negative pages all mean the first one, and
/// pages past `MAX_PAGE` mean the last one.
pub(crate) fn page_number(page: Option<i64>) -> u64 {
    page.map_or(1, |page| page.clamp(1, MAX_PAGE as i64) as u64)
}

/// The `project_id` a project scoped listing cannot do without.
pub(crate) fn required_project_id(project_id: Option<Id>) -> Result<Id, DomainError> {
    project_id
        .ok_or_else(|| DomainError::validation(vec!["Missing project_id parameter.".to_string()]))
}

/// Reads the `web` flag the front end sends as `web=1`.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        value.map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    ))
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub(crate) struct PageParams {
    pub(crate) page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub(crate) struct ProjectPageParams {
    pub(crate) project_id: Option<Id>,
    pub(crate) page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Flagged {
        #[serde(default, deserialize_with = "deserialize_flag")]
        web: bool,
    }

    fn flag(query: &str) -> bool {
        let uri: axum::http::Uri = format!("/x?{query}").parse().unwrap();
        axum::extract::Query::<Flagged>::try_from_uri(&uri)
            .unwrap()
            .0
            .web
    }

    #[test]
    fn pages_start_at_one() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some(0)), 1);
        assert_eq!(page_number(Some(-3)), 1);
        assert_eq!(page_number(Some(4)), 4);
    }

    #[test]
    fn huge_pages_are_capped() {
        assert_eq!(page_number(Some(i64::MAX)), MAX_PAGE);
        assert_eq!(page_number(Some(MAX_PAGE as i64)), MAX_PAGE);
        assert!(page_number(Some(i64::MAX)).checked_mul(domain::PAGE_SIZE).is_some());
    }

    #[test]
    fn missing_project_id_is_a_validation_error() {
        assert_eq!(required_project_id(Some(2)).unwrap(), 2);
        assert!(required_project_id(None).is_err());
    }

    #[test]
    fn web_flag_accepts_one_and_true() {
        assert!(flag("web=1"));
        assert!(flag("web=True"));
        assert!(!flag("web=0"));
        assert!(!flag("page=2"));
    }
}
