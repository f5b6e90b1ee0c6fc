use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::deserialize_flag;
use domain::{annotations, Id, IntoQueryFilterMap, QueryFilterMap};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) project_id: Option<Id>,
    pub(crate) audio_id: Option<Id>,
    pub(crate) tag_id: Option<Id>,
    /// `1` asks for a downloadable export of every matching annotation.
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<u8>)]
    pub(crate) web: bool,
    pub(crate) page: Option<i64>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        for (key, id) in [
            ("project_id", self.project_id),
            ("audio_id", self.audio_id),
            ("tag_id", self.tag_id),
        ] {
            if let Some(id) = id {
                query_filter_map.insert(key.to_string(), Some(Value::Int(Some(id))));
            }
        }
        query_filter_map
    }
}

/// Body of a new annotation. The author is always the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateParams {
    pub project_id: Id,
    pub audio_id: Id,
    pub tag_id: Id,
    pub start_time: f64,
    pub end_time: Option<f64>,
}

impl From<CreateParams> for annotations::Model {
    fn from(params: CreateParams) -> Self {
        annotations::Model {
            id: 0,
            start_time: params.start_time,
            end_time: params.end_time,
            tag_id: params.tag_id,
            project_id: params.project_id,
            audio_id: params.audio_id,
            user_id: 0,
            created_at: chrono::Utc::now().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_ids_become_filters() {
        let params = IndexParams {
            project_id: Some(1),
            audio_id: None,
            tag_id: Some(3),
            web: false,
            page: None,
        };

        let map = params.into_query_filter_map();

        assert_eq!(map.get("project_id"), Some(Value::Int(Some(1))));
        assert_eq!(map.get("audio_id"), None);
        assert_eq!(map.get("tag_id"), Some(Value::Int(Some(3))));
    }
}
