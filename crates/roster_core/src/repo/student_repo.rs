//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Mutations re-check their preconditions inside an immediate
//!   transaction, so precondition and statement cannot be interleaved by a
//!   concurrent writer.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::student::StudentRecord;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT id, name, age, course, email FROM students";
const STUDENT_COLUMNS: [&str; 5] = ["id", "name", "age", "course", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    DuplicateId(String),
    EmailInUse(String),
    NotFound(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "student id already exists: `{id}`"),
            Self::EmailInUse(email) => write!(f, "email already in use: `{email}`"),
            Self::NotFound(id) => write!(f, "no such student: `{id}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Validated column assignments for one dynamic update statement.
///
/// Unset columns are left untouched by the statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFieldSet {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub course: Option<String>,
    pub email: Option<String>,
}

impl StudentFieldSet {
    /// Returns true when no column assignment is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.course.is_none() && self.email.is_none()
    }
}

/// Repository interface for student record operations.
pub trait StudentRepository {
    /// Inserts one record; fails on duplicate id or email conflict.
    fn insert(&mut self, record: &StudentRecord) -> RepoResult<()>;
    /// Applies the supplied column assignments to one existing record.
    fn update_fields(&mut self, id: &str, fields: &StudentFieldSet) -> RepoResult<()>;
    /// Deletes one record by id; fails when the record does not exist.
    fn delete(&mut self, id: &str) -> RepoResult<()>;
    /// Gets one record by id.
    fn get(&self, id: &str) -> RepoResult<Option<StudentRecord>>;
    /// Returns whether a record with the given id exists.
    fn exists(&self, id: &str) -> RepoResult<bool>;
    /// Returns whether the email is taken, optionally excluding one id.
    fn email_in_use(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool>;
    /// Case-insensitive substring match over id, name and course.
    fn search(&self, keyword: &str) -> RepoResult<Vec<StudentRecord>>;
    /// Returns every record ordered by ascending id.
    fn list_all(&self) -> RepoResult<Vec<StudentRecord>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert(&mut self, record: &StudentRecord) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if exists_on(&tx, &record.id)? {
            return Err(RepoError::DuplicateId(record.id.clone()));
        }
        if email_in_use_on(&tx, &record.email, None)? {
            return Err(RepoError::EmailInUse(record.email.clone()));
        }

        tx.execute(
            "INSERT INTO students (id, name, age, course, email)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.id.as_str(),
                record.name.as_str(),
                record.age,
                record.course.as_str(),
                record.email.as_str(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn update_fields(&mut self, id: &str, fields: &StudentFieldSet) -> RepoResult<()> {
        if fields.is_empty() {
            return Err(RepoError::InvalidData(
                "update requires at least one column assignment".to_string(),
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !exists_on(&tx, id)? {
            return Err(RepoError::NotFound(id.to_string()));
        }
        if let Some(email) = fields.email.as_deref() {
            if email_in_use_on(&tx, email, Some(id))? {
                return Err(RepoError::EmailInUse(email.to_string()));
            }
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = fields.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }
        if let Some(age) = fields.age {
            assignments.push("age = ?");
            bind_values.push(Value::Integer(i64::from(age)));
        }
        if let Some(course) = fields.course.as_deref() {
            assignments.push("course = ?");
            bind_values.push(Value::Text(course.to_string()));
        }
        if let Some(email) = fields.email.as_deref() {
            assignments.push("email = ?");
            bind_values.push(Value::Text(email.to_string()));
        }

        let sql = format!(
            "UPDATE students SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(id.to_string()));

        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<StudentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn exists(&self, id: &str) -> RepoResult<bool> {
        exists_on(self.conn, id)
    }

    fn email_in_use(&self, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
        email_in_use_on(self.conn, email, exclude_id)
    }

    fn search(&self, keyword: &str) -> RepoResult<Vec<StudentRecord>> {
        // Empty keyword degenerates to `%%`, matching every row.
        let pattern = format!("%{}%", escape_like_pattern(keyword));

        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE id LIKE ?1 ESCAPE '\\'
                OR name LIKE ?1 ESCAPE '\\'
                OR course LIKE ?1 ESCAPE '\\'
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([pattern.as_str()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_student_row(row)?);
        }

        Ok(records)
    }

    fn list_all(&self) -> RepoResult<Vec<StudentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_student_row(row)?);
        }

        Ok(records)
    }
}

fn exists_on(conn: &Connection, id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn email_in_use_on(conn: &Connection, email: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
    let in_use: i64 = match exclude_id {
        Some(id) => conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE email = ?1 AND id <> ?2);",
            params![email, id],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?,
    };
    Ok(in_use == 1)
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<StudentRecord> {
    let age_raw: i64 = row.get("age")?;
    let age = u32::try_from(age_raw).map_err(|_| {
        RepoError::InvalidData(format!("invalid age value `{age_raw}` in students.age"))
    })?;

    Ok(StudentRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        age,
        course: row.get("course")?,
        email: row.get("email")?,
    })
}

/// Escapes LIKE wildcards so the keyword matches as a literal substring.
fn escape_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "students")? {
        return Err(RepoError::MissingRequiredTable("students"));
    }

    for column in STUDENT_COLUMNS {
        if !table_has_column(conn, "students", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column,
            });
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

#[cfg(test)]
mod tests {
    use super::escape_like_pattern;

    #[test]
    fn escape_like_pattern_quotes_wildcards_and_backslash() {
        assert_eq!(escape_like_pattern("plain"), "plain");
        assert_eq!(escape_like_pattern("50%"), "50\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("c\\d"), "c\\\\d");
    }
}
