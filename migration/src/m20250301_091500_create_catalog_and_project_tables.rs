use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Link tables carry no ON DELETE CASCADE: deletes are cleaned up explicitly by
// the entity_api layer inside a transaction.
const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS phaunos.users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(20) NOT NULL UNIQUE,
        email VARCHAR(120) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT FALSE,
        confirmed_on TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.tags (
        id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.tagsets (
        id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.tagsets_tags (
        tagset_id INTEGER NOT NULL REFERENCES phaunos.tagsets(id),
        tag_id INTEGER NOT NULL REFERENCES phaunos.tags(id),
        PRIMARY KEY (tagset_id, tag_id)
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.audios (
        id SERIAL PRIMARY KEY,
        path VARCHAR NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.projects (
        id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL UNIQUE,
        visualization_type phaunos.visualization_type NOT NULL DEFAULT 'spectrogram',
        allow_regions BOOLEAN NOT NULL DEFAULT TRUE,
        audiolist_filename VARCHAR,
        taglist_filename VARCHAR,
        n_annotations_per_file INTEGER,
        created_by_id INTEGER REFERENCES phaunos.users(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.projects_audios (
        project_id INTEGER NOT NULL REFERENCES phaunos.projects(id),
        audio_id INTEGER NOT NULL REFERENCES phaunos.audios(id),
        PRIMARY KEY (project_id, audio_id)
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.projects_tagsets (
        project_id INTEGER NOT NULL REFERENCES phaunos.projects(id),
        tagset_id INTEGER NOT NULL REFERENCES phaunos.tagsets(id),
        PRIMARY KEY (project_id, tagset_id)
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.memberships (
        user_id INTEGER NOT NULL REFERENCES phaunos.users(id),
        project_id INTEGER NOT NULL REFERENCES phaunos.projects(id),
        role phaunos.role NOT NULL DEFAULT 'member',
        PRIMARY KEY (user_id, project_id)
    )",
    "CREATE TABLE IF NOT EXISTS phaunos.annotations (
        id SERIAL PRIMARY KEY,
        start_time DOUBLE PRECISION NOT NULL,
        end_time DOUBLE PRECISION,
        tag_id INTEGER NOT NULL REFERENCES phaunos.tags(id),
        project_id INTEGER NOT NULL REFERENCES phaunos.projects(id),
        audio_id INTEGER NOT NULL REFERENCES phaunos.audios(id),
        user_id INTEGER NOT NULL REFERENCES phaunos.users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS annotations_project_audio_idx
        ON phaunos.annotations(project_id, audio_id)",
    "CREATE INDEX IF NOT EXISTS annotations_project_user_idx
        ON phaunos.annotations(project_id, user_id)",
];

const DROP_TABLES: &[&str] = &[
    "annotations",
    "memberships",
    "projects_tagsets",
    "projects_audios",
    "projects",
    "audios",
    "tagsets_tags",
    "tagsets",
    "tags",
    "users",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for sql in CREATE_TABLES {
            db.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in DROP_TABLES {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS phaunos.{table}"))
                .await?;
        }
        Ok(())
    }
}
