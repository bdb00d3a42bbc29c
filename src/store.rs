//! SQLite-backed snapshot storage.
//!
//! The whole [`AppState`] is kept as one JSON document in a single-row
//! table. Loading never fails on bad data: a missing or unreadable snapshot
//! yields the default state.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::models::AppState;

pub type DB = SqlitePool;

pub async fn open(path: &Path) -> Result<DB> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &DB) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_state (
            id       INTEGER PRIMARY KEY CHECK (id = 1),
            snapshot TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn load(pool: &DB) -> Result<AppState> {
    let raw: Option<String> = sqlx::query_scalar("SELECT snapshot FROM app_state WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    let Some(raw) = raw else {
        log::debug!("no stored snapshot, starting from defaults");
        return Ok(AppState::default());
    };

    match serde_json::from_str(&raw) {
        Ok(state) => Ok(state),
        Err(e) => {
            log::warn!("stored snapshot is unreadable ({e}), falling back to defaults");
            Ok(AppState::default())
        }
    }
}

pub async fn save(pool: &DB, state: &AppState) -> Result<()> {
    let snapshot = serde_json::to_string(state)?;
    sqlx::query(
        r#"
        INSERT INTO app_state (id, snapshot, saved_at)
        VALUES (1, ?, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            snapshot = excluded.snapshot,
            saved_at = excluded.saved_at
        "#,
    )
    .bind(snapshot)
    .execute(pool)
    .await
    .context("Failed to save snapshot")?;
    log::debug!("snapshot saved");
    Ok(())
}

/// Pretty JSON in the same shape the mobile app exports.
pub fn export_json(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn import_json(json: &str) -> Result<AppState> {
    serde_json::from_str(json).context("Invalid snapshot JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::SetField, tracker::Tracker};

    async fn temp_db() -> (tempfile::TempDir, DB) {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir.path().join("nested").join("irontrack.db"))
            .await
            .unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn empty_database_loads_defaults() {
        let (_dir, pool) = temp_db().await;
        let state = load(&pool).await.unwrap();
        assert_eq!(state, AppState::default());
    }

    #[tokio::test]
    async fn save_then_load_keeps_active_session() {
        let (_dir, pool) = temp_db().await;
        let mut tracker = Tracker::new(load(&pool).await.unwrap());
        tracker.start(None, 1_000);
        tracker.add_exercise("squat").unwrap();
        tracker.update_set(0, 0, SetField::Weight(140.0)).unwrap();
        save(&pool, tracker.state()).await.unwrap();

        // Overwrites the single row rather than adding one.
        save(&pool, tracker.state()).await.unwrap();
        let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM app_state")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let loaded = load(&pool).await.unwrap();
        assert_eq!(&loaded, tracker.state());
        assert_eq!(loaded.active_workout.unwrap().exercises[0].sets[0].weight, 140.0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_falls_back_to_defaults() {
        let (_dir, pool) = temp_db().await;
        sqlx::query("INSERT INTO app_state (id, snapshot, saved_at) VALUES (1, '{oops', 'x')")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(load(&pool).await.unwrap(), AppState::default());
    }

    #[test]
    fn import_rejects_garbage_and_accepts_exports() {
        assert!(import_json("not json").is_err());
        let state = AppState::default();
        let json = export_json(&state).unwrap();
        assert!(json.contains("\"activeWorkout\": null"));
        assert_eq!(import_json(&json).unwrap(), state);
    }
}
