//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over the `entries` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate field sets before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it;
//!   the one deliberate exception is entry content, which is normalized
//!   by the document decoder and never fails a read.
//! - Listings are ordered by `created_at DESC, uuid ASC` so equal
//!   timestamps still produce a stable order.

use crate::db::DbError;
use crate::model::document::Document;
use crate::model::entry::{
    Emotion, Entry, EntryChanges, EntryId, EntryValidationError, NewEntry, Weather,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    emotion,
    weather,
    diary_date,
    created_at,
    updated_at
FROM entries";

const DIARY_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    /// Case-insensitive substring filter against the title.
    pub title_contains: Option<String>,
    /// Maximum rows to return; `None` returns the full collection.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for entry CRUD and calendar queries.
pub trait EntryRepository {
    /// Creates one entry; storage assigns id and timestamps.
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId>;
    /// Gets one entry by id.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Lists entries, newest first, with optional title filter.
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
    /// Replaces every user-editable field of one entry.
    fn update_entry(&self, id: EntryId, changes: &EntryChanges) -> RepoResult<()>;
    /// Removes one entry permanently.
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    /// Returns the distinct diary dates having at least one entry, ascending.
    fn list_diary_dates(&self) -> RepoResult<Vec<NaiveDate>>;
    /// Returns every entry for one diary date, newest first.
    fn list_by_diary_date(&self, date: NaiveDate) -> RepoResult<Vec<Entry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entry_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        entry.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO entries (
                uuid,
                title,
                content,
                emotion,
                weather,
                diary_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                entry.title.as_str(),
                encode_document(&entry.content)?,
                entry.emotion.as_str(),
                entry.weather.as_str(),
                entry.diary_date.format(DIARY_DATE_FORMAT).to_string(),
            ],
        )?;

        Ok(id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(term) = query.title_contains.as_deref() {
            // SQLite LIKE folds ASCII case, which gives the title filter
            // its case-insensitive substring semantics.
            sql.push_str(" AND title LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like(term))));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn update_entry(&self, id: EntryId, changes: &EntryChanges) -> RepoResult<()> {
        changes.validate()?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                title = ?1,
                content = ?2,
                emotion = ?3,
                weather = ?4,
                diary_date = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                changes.title.as_str(),
                encode_document(&changes.content)?,
                changes.emotion.as_str(),
                changes.weather.as_str(),
                changes.diary_date.format(DIARY_DATE_FORMAT).to_string(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_diary_dates(&self) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT diary_date FROM entries ORDER BY diary_date ASC;")?;
        let mut rows = stmt.query([])?;
        let mut dates = Vec::new();

        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            dates.push(parse_diary_date(&value)?);
        }

        Ok(dates)
    }

    fn list_by_diary_date(&self, date: NaiveDate) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE diary_date = ?1
             ORDER BY created_at DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([date.format(DIARY_DATE_FORMAT).to_string()])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

/// Escapes `LIKE` wildcards so a user term matches literally.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn encode_document(document: &Document) -> RepoResult<String> {
    document
        .encode()
        .map_err(|err| RepoError::InvalidData(format!("failed to encode document tree: {err}")))
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in entries.uuid"))
    })?;

    let emotion_text: String = row.get("emotion")?;
    let emotion = Emotion::parse(&emotion_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid emotion `{emotion_text}` in entries.emotion"
        ))
    })?;

    let weather_text: String = row.get("weather")?;
    let weather = Weather::parse(&weather_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid weather `{weather_text}` in entries.weather"
        ))
    })?;

    let diary_date_text: String = row.get("diary_date")?;
    let diary_date = parse_diary_date(&diary_date_text)?;

    let content_text: String = row.get("content")?;

    Ok(Entry {
        id,
        title: row.get("title")?,
        content: Document::decode_stored(&content_text),
        emotion,
        weather,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        diary_date,
    })
}

fn parse_diary_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DIARY_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid diary date `{value}` in entries.diary_date"
        ))
    })
}

fn ensure_entry_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "entries")? {
        return Err(RepoError::InvalidData(
            "required table `entries` is missing; was the database migrated?".to_string(),
        ));
    }

    for column in [
        "uuid",
        "title",
        "content",
        "emotion",
        "weather",
        "diary_date",
        "created_at",
        "updated_at",
    ] {
        if !table_has_column(conn, "entries", column)? {
            return Err(RepoError::InvalidData(format!(
                "required column `entries.{column}` is missing; was the database migrated?"
            )));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
