//! SQLite-backed projects table.
//!
//! List-valued columns (`tags`, `technologies`, `links`) are stored as JSON
//! text.  The connection sits behind an async mutex; every query is short.

use std::path::Path;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use thiserror::Error;
use tokio::sync::Mutex;

use super::model::{NewProject, Project, ProjectPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project not found")]
    NotFound,
    #[error("duplicate slug `{0}`")]
    DuplicateSlug(String),
    #[error("{0}")]
    Invalid(String),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("column encoding: {0}")]
    Json(#[from] serde_json::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    slug         TEXT NOT NULL UNIQUE,
    title        TEXT NOT NULL,
    summary      TEXT NOT NULL,
    content      TEXT NOT NULL DEFAULT '',
    cover_image  TEXT,
    featured     INTEGER NOT NULL DEFAULT 0,
    tags         TEXT NOT NULL DEFAULT '[]',
    technologies TEXT NOT NULL DEFAULT '[]',
    links        TEXT NOT NULL DEFAULT '[]',
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);";

const COLUMNS: &str = "id, slug, title, summary, content, cover_image, featured, \
                       tags, technologies, links, created_at, updated_at";

/// Raw row before JSON columns are decoded.
struct RawRow {
    id: i64,
    slug: String,
    title: String,
    summary: String,
    content: String,
    cover_image: Option<String>,
    featured: bool,
    tags: String,
    technologies: String,
    links: String,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            title: row.get(2)?,
            summary: row.get(3)?,
            content: row.get(4)?,
            cover_image: row.get(5)?,
            featured: row.get(6)?,
            tags: row.get(7)?,
            technologies: row.get(8)?,
            links: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn decode(self) -> Result<Project, StoreError> {
        Ok(Project {
            id: self.id,
            slug: self.slug,
            title: self.title,
            summary: self.summary,
            content: self.content,
            cover_image: self.cover_image,
            featured: self.featured,
            tags: serde_json::from_str(&self.tags)?,
            technologies: serde_json::from_str(&self.technologies)?,
            links: serde_json::from_str(&self.links)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_unique(err: rusqlite::Error, slug: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::DuplicateSlug(slug.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub struct ProjectStore {
    conn: Mutex<Connection>,
}

impl ProjectStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Featured first, then newest.
    pub async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY featured DESC, created_at DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map([], RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(RawRow::decode).collect()
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Project, StoreError> {
        let conn = self.conn.lock().await;
        Self::fetch(&conn, "slug = ?1", slug)
    }

    #[cfg(test)]
    pub async fn by_id(&self, id: i64) -> Result<Project, StoreError> {
        let conn = self.conn.lock().await;
        Self::fetch(&conn, "id = ?1", id)
    }

    fn fetch<P: rusqlite::ToSql>(conn: &Connection, filter: &str, value: P) -> Result<Project, StoreError> {
        let raw = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM projects WHERE {filter}"),
                params![value],
                RawRow::from_row,
            )
            .optional()?;
        raw.ok_or(StoreError::NotFound)?.decode()
    }

    pub async fn insert(&self, new: NewProject) -> Result<Project, StoreError> {
        let conn = self.conn.lock().await;
        let stamp = now();
        conn.execute(
            "INSERT INTO projects (slug, title, summary, content, cover_image, featured, \
             tags, technologies, links, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                new.slug,
                new.title,
                new.summary,
                new.content,
                new.cover_image,
                new.featured,
                serde_json::to_string(&new.tags)?,
                serde_json::to_string(&new.technologies)?,
                serde_json::to_string(&new.links)?,
                stamp,
            ],
        )
        .map_err(|e| map_unique(e, &new.slug))?;
        let id = conn.last_insert_rowid();
        Self::fetch(&conn, "id = ?1", id)
    }

    /// Apply `patch` to the record; the merged record is validated before
    /// anything is written.
    pub async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project, StoreError> {
        let conn = self.conn.lock().await;
        let mut project = Self::fetch(&conn, "id = ?1", id)?;
        patch.apply(&mut project);
        project.validate().map_err(StoreError::Invalid)?;
        project.updated_at = now();
        conn.execute(
            "UPDATE projects SET slug = ?2, title = ?3, summary = ?4, content = ?5, \
             cover_image = ?6, featured = ?7, tags = ?8, technologies = ?9, links = ?10, \
             updated_at = ?11 WHERE id = ?1",
            params![
                id,
                project.slug,
                project.title,
                project.summary,
                project.content,
                project.cover_image,
                project.featured,
                serde_json::to_string(&project.tags)?,
                serde_json::to_string(&project.technologies)?,
                serde_json::to_string(&project.links)?,
                project.updated_at,
            ],
        )
        .map_err(|e| map_unique(e, &project.slug))?;
        Ok(project)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
