use rocket_db_pools::{Database, sqlx};

#[derive(Database)]
#[database("consultancy_db")]
pub struct SiteDb(sqlx::PgPool);

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply pending schema migrations. Called from an ignite fairing on startup
/// and by the test database factory.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
