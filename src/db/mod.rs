mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{Task, TaskId};
use crate::store::{StoreError, TaskStore};

/// SQLite-backed task store.
///
/// Clones share one connection; every operation takes the lock for the
/// duration of a single statement.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!(path = %path.display(), "Opened task database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }
}

/// Location of the database file in the platform data directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "tasklist")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("tasklist.db"))
}

impl TaskStore for Database {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name, done FROM tasks ORDER BY id")?;

        let tasks = stmt
            .query_map([], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    done: row.get::<_, i32>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    fn create_task(&self, name: &str) -> Result<Task, StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("INSERT INTO tasks (name, done) VALUES (?, 0)", [name])?;

        Ok(Task {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            done: false,
        })
    }

    fn update_task_name(&self, id: TaskId, name: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("UPDATE tasks SET name = ? WHERE id = ?", (name, id))?;
        found(rows, id)
    }

    fn set_task_done(&self, id: TaskId, done: bool) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "UPDATE tasks SET done = ? WHERE id = ?",
            (if done { 1 } else { 0 }, id),
        )?;
        found(rows, id)
    }

    fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        found(rows, id)
    }
}

fn found(rows: usize, id: TaskId) -> Result<(), StoreError> {
    if rows == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}
