use chrono::Utc;
use password_auth::generate_hash;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DbBackend, Statement, Value};

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@phaunos.local";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        insert_initial_admin_user(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM phaunos.users WHERE username = $1",
            vec![Value::String(Some(Box::new(ADMIN_USERNAME.to_owned())))],
        ))
        .await?;
        Ok(())
    }
}

// Raw SQL keeps this migration stable when the users entity changes later.
// The admin account is confirmed so it can log in before any mail is configured.
async fn insert_initial_admin_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let now = Utc::now();

    let password_hash = generate_hash("password");

    let user_sql = r#"
        INSERT INTO phaunos.users (
            username, email, password, is_admin, confirmed_on, created_at, updated_at
        ) VALUES ($1, $2, $3, TRUE, $4, $5, $6)
        ON CONFLICT (username) DO NOTHING
    "#;
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        user_sql,
        vec![
            Value::String(Some(Box::new(ADMIN_USERNAME.to_owned()))),
            Value::String(Some(Box::new(ADMIN_EMAIL.to_owned()))),
            Value::String(Some(Box::new(password_hash))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
        ],
    ))
    .await?;

    Ok(())
}
