use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE SCHEMA IF NOT EXISTS phaunos")
            .await?;

        db.execute_unprepared("CREATE TYPE phaunos.role AS ENUM ('member', 'admin')")
            .await?;

        db.execute_unprepared(
            "CREATE TYPE phaunos.visualization_type AS ENUM ('waveform', 'spectrogram')",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TYPE IF EXISTS phaunos.visualization_type")
            .await?;
        db.execute_unprepared("DROP TYPE IF EXISTS phaunos.role")
            .await?;
        db.execute_unprepared("DROP SCHEMA IF EXISTS phaunos")
            .await?;

        Ok(())
    }
}
