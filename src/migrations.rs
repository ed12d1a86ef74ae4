use sqlx::{Pool, Postgres};

// Embed SQL migrations at compile time for deterministic startup
const MIG_0001: &str = include_str!("../migrations/0001_create_conversations.sql");
const MIG_0002: &str = include_str!("../migrations/0002_create_messages.sql");

/// Apply all migrations in order. Statements are idempotent
/// (`IF NOT EXISTS`), so reruns on an up-to-date schema are no-ops.
pub async fn run_all(db: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    for (i, sql) in [MIG_0001, MIG_0002].into_iter().enumerate() {
        let label = i + 1;
        // raw_sql: migration files contain multiple statements
        sqlx::raw_sql(sql).execute(db).await?;
        tracing::info!(migration = %label, "chat-service migration applied");
    }
    Ok(())
}
