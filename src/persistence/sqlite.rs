use super::{PersistenceResult, StyleStore, validate_styles, validate_user_id};
use crate::style::Style;
use rusqlite::{Connection, params};
use std::sync::Mutex;
use tracing::info;

pub struct SqliteStyleStore {
    connection: Mutex<Connection>,
}

impl SqliteStyleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS user_styles (
                user_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                style_json TEXT NOT NULL,
                PRIMARY KEY (user_id, position)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// Users with at least one saved style, sorted.
    pub fn users(&self) -> PersistenceResult<Vec<String>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT DISTINCT user_id FROM user_styles ORDER BY user_id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }
}

impl StyleStore for SqliteStyleStore {
    fn save_styles(&self, user_id: &str, styles: &[Style]) -> PersistenceResult<()> {
        validate_user_id(user_id)?;
        validate_styles(styles)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM user_styles WHERE user_id = ?1", params![user_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO user_styles (user_id, position, style_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, style) in styles.iter().enumerate() {
                let json = serde_json::to_string(style)?;
                stmt.execute(params![user_id, position as i64, json])?;
            }
        }
        tx.commit()?;
        info!(user_id, styles = styles.len(), "saved styles to sqlite");
        Ok(())
    }

    fn load_styles(&self, user_id: &str) -> PersistenceResult<Vec<Style>> {
        validate_user_id(user_id)?;
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT style_json FROM user_styles WHERE user_id = ?1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

        let mut styles = Vec::new();
        for json in rows {
            let json = json?;
            let style: Style = serde_json::from_str(&json)?;
            styles.push(style);
        }
        validate_styles(&styles)?;
        Ok(styles)
    }
}
