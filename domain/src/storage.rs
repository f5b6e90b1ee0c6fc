//! Local storage of uploaded project list files.
//!
//! Lists live under `<upload_folder>/audiolist_filenames/` and
//! `<upload_folder>/taglist_filenames/`, named `<uuid-v4>.csv`. The same folders are served
//! read-only under `/files`.

use crate::error::Error;
use log::*;
use service::config::Config;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Audio,
    Tag,
}

impl ListKind {
    pub fn folder(&self) -> &'static str {
        match self {
            ListKind::Audio => "audiolist_filenames",
            ListKind::Tag => "taglist_filenames",
        }
    }

    /// Public path the stored file is served from.
    pub fn download_path(&self, filename: &str) -> String {
        format!("/files/{}/{filename}", self.folder())
    }
}

pub fn generate_filename() -> String {
    format!("{}.csv", Uuid::new_v4())
}

fn path_of(config: &Config, kind: ListKind, filename: &str) -> PathBuf {
    config.upload_folder().join(kind.folder()).join(filename)
}

/// Writes a list under a freshly generated name and returns that name.
pub async fn store_list(config: &Config, kind: ListKind, content: &[u8]) -> Result<String, Error> {
    let folder = config.upload_folder().join(kind.folder());
    tokio::fs::create_dir_all(&folder).await?;

    let filename = generate_filename();
    tokio::fs::write(folder.join(&filename), content).await?;

    debug!("Stored {} as {filename}", kind.folder());
    Ok(filename)
}

/// Removes a stored list. A file that is already gone is not an error.
pub async fn remove_list(config: &Config, kind: ListKind, filename: &str) -> Result<(), Error> {
    match tokio::fs::remove_file(path_of(config, kind, filename)).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("List file {filename} was already removed");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_in(folder: &std::path::Path) -> Config {
        Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_upload_folder(folder.to_path_buf())
    }

    #[test]
    fn generated_names_are_unique_csv_files() {
        let first = generate_filename();
        let second = generate_filename();

        assert!(first.ends_with(".csv"));
        assert_eq!(first.len(), 36 + 4);
        assert_ne!(first, second);
    }

    #[test]
    fn download_paths_point_at_the_list_folders() {
        assert_eq!(
            ListKind::Audio.download_path("x.csv"),
            "/files/audiolist_filenames/x.csv"
        );
        assert_eq!(
            ListKind::Tag.download_path("y.csv"),
            "/files/taglist_filenames/y.csv"
        );
    }

    #[tokio::test]
    async fn stored_lists_can_be_read_back_and_removed_twice() {
        let folder = std::env::temp_dir().join(format!("phaunos-storage-{}", Uuid::new_v4()));
        let config = config_in(&folder);

        let filename = store_list(&config, ListKind::Tag, b"birds,crow\n")
            .await
            .unwrap();
        let stored = tokio::fs::read(folder.join("taglist_filenames").join(&filename))
            .await
            .unwrap();
        assert_eq!(stored, b"birds,crow\n");

        remove_list(&config, ListKind::Tag, &filename).await.unwrap();
        remove_list(&config, ListKind::Tag, &filename).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&folder).await;
    }
}
