use chrono::Utc;
use log::*;
use password_auth::generate_hash;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set, Value};
use std::collections::HashMap;

pub use entity::{
    annotations, audios, jwt, memberships, projects, projects_audios, projects_tagsets,
    roles::Role, tags, tagsets, tagsets_tags, users, visualization_type::VisualizationType, Id,
};

pub mod annotation;
pub mod audio;
pub mod error;
pub mod membership;
pub mod mutate;
pub mod project;
pub mod query;
pub mod tag;
pub mod tagset;
pub mod user;

/// Maximum number of records returned by one page of any list query.
pub const PAGE_SIZE: u64 = 10;

/// Highest page number whose offset still fits a Postgres `BIGINT`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// This structure is particularly useful in scenarios where you need to pass filter parameters
/// from a web request down to the database query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("project_id".to_string(), Some(Value::Int(Some(1))));
/// let filter_value = query_filter_map.get("project_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
///
/// Implementing this trait for a struct allows you to define how the fields of the struct should be
/// mapped to the keys and values of the `QueryFilterMap`. This ensures that the data is passed
/// in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use entity_api::QueryFilterMap;
/// use entity_api::IntoQueryFilterMap;
///
/// #[derive(Debug)]
/// struct MyParams {
///     project_id: i32,
/// }
///
/// impl IntoQueryFilterMap for MyParams {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "project_id".to_string(),
///             Some(sea_orm::Value::Int(Some(self.project_id))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Fills an empty database with dummy users, tagsets, projects, audios and annotations.
///
/// `user0` is a global admin and the admin of every project; the other users are members.
/// Every seeded account is confirmed and uses the password `password`.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), DbErr> {
    const N_USERS: usize = 5;
    const N_TAGSETS: usize = 3;
    const N_TAGS_PER_TAGSET: usize = 5;
    const N_PROJECTS: usize = 3;
    const N_AUDIOS: usize = 20;
    const N_ANNOTATIONS_PER_PROJECT: usize = 30;

    let now = Utc::now();
    let mut rng = StdRng::from_entropy();

    let mut users = Vec::with_capacity(N_USERS);
    for i in 0..N_USERS {
        let user = users::ActiveModel {
            username: Set(format!("user{i}")),
            email: Set(format!("user{i}@phaunos.local")),
            password: Set(generate_hash("password")),
            is_admin: Set(i == 0),
            confirmed_on: Set(Some(now.into())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        users.push(user);
    }

    let mut tagsets = Vec::with_capacity(N_TAGSETS);
    for i in 0..N_TAGSETS {
        let tagset = tagsets::ActiveModel {
            name: Set(format!("tagset{i}")),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let mut tags = Vec::with_capacity(N_TAGS_PER_TAGSET);
        for j in 0..N_TAGS_PER_TAGSET {
            let tag = tags::ActiveModel {
                name: Set(format!("tag{i}_{j}")),
                ..Default::default()
            }
            .insert(db)
            .await?;
            tagsets_tags::ActiveModel {
                tagset_id: Set(tagset.id),
                tag_id: Set(tag.id),
            }
            .insert(db)
            .await?;
            tags.push(tag);
        }
        tagsets.push((tagset, tags));
    }

    let mut audios = Vec::with_capacity(N_AUDIOS);
    for i in 0..N_AUDIOS {
        let audio = audios::ActiveModel {
            path: Set(format!("audio/file{i}.wav")),
            ..Default::default()
        }
        .insert(db)
        .await?;
        audios.push(audio);
    }

    for i in 0..N_PROJECTS {
        let project = projects::ActiveModel {
            name: Set(format!("project{i}")),
            visualization_type: Set(if i % 2 == 0 {
                VisualizationType::Spectrogram
            } else {
                VisualizationType::Waveform
            }),
            allow_regions: Set(true),
            audiolist_filename: Set(None),
            taglist_filename: Set(None),
            n_annotations_per_file: Set(Some(rng.gen_range(1..=3))),
            created_by_id: Set(Some(users[0].id)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let project_audios: Vec<&audios::Model> =
            audios.choose_multiple(&mut rng, N_AUDIOS / 2).collect();
        for audio in &project_audios {
            projects_audios::ActiveModel {
                project_id: Set(project.id),
                audio_id: Set(audio.id),
            }
            .insert(db)
            .await?;
        }

        let (tagset, tags) = &tagsets[i % N_TAGSETS];
        projects_tagsets::ActiveModel {
            project_id: Set(project.id),
            tagset_id: Set(tagset.id),
        }
        .insert(db)
        .await?;

        for (k, user) in users.iter().enumerate() {
            memberships::ActiveModel {
                user_id: Set(user.id),
                project_id: Set(project.id),
                role: Set(if k == 0 { Role::Admin } else { Role::Member }),
            }
            .insert(db)
            .await?;
        }

        for _ in 0..N_ANNOTATIONS_PER_PROJECT {
            let (Some(audio), Some(tag), Some(user)) = (
                project_audios.choose(&mut rng),
                tags.choose(&mut rng),
                users.choose(&mut rng),
            ) else {
                continue;
            };
            let start_time: f64 = rng.gen_range(0.0..50.0);
            let end_time = start_time + rng.gen_range(0.5..10.0);

            annotations::ActiveModel {
                start_time: Set(start_time),
                end_time: Set(Some(end_time)),
                tag_id: Set(tag.id),
                project_id: Set(project.id),
                audio_id: Set(audio.id),
                user_id: Set(user.id),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        info!("Seeded project {} ({})", project.name, project.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filter_map_flattens_missing_and_empty_values() {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("project_id".to_string(), Some(Value::Int(Some(4))));
        query_filter_map.insert("audio_id".to_string(), None);

        assert_eq!(query_filter_map.get("project_id"), Some(Value::Int(Some(4))));
        assert_eq!(query_filter_map.get("audio_id"), None);
        assert_eq!(query_filter_map.get("tag_id"), None);
    }
}
