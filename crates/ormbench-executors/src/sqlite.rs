//! SQLite strategies built on `rusqlite`.
//!
//! All four strategies issue the same two queries against the same file and
//! differ only in how statements are prepared and how rows become [`Post`]s.
//! [`executors`] also hands out the `sqlx` strategies for the same file.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, info};

use ormbench::{Error, Executor, ItemId, Result};

use crate::post::{post_columns, Post};

pub(crate) const SELECT_POST_BY_ID: &str = concat!("SELECT ", post_columns!(), " FROM post WHERE id = ?1");
pub(crate) const SELECT_ALL_POSTS: &str = concat!("SELECT ", post_columns!(), " FROM post");

/// URL-style prefix accepted in front of a database path.
pub const SCHEME: &str = "sqlite://";

/// Strip the optional `sqlite://` prefix from a connection target.
pub fn database_path(target: &str) -> &str {
    target.strip_prefix(SCHEME).unwrap_or(target)
}

/// Create (or recreate) the `post` table.
pub fn setup_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS post;

        CREATE TABLE post (
            id INTEGER PRIMARY KEY,
            text TEXT NOT NULL,
            creation_date TEXT NOT NULL,
            last_change_date TEXT NOT NULL,
            counter1 INTEGER,
            counter2 INTEGER,
            counter3 INTEGER,
            counter4 INTEGER,
            counter5 INTEGER,
            counter6 INTEGER,
            counter7 INTEGER,
            counter8 INTEGER,
            counter9 INTEGER
        );
        "#,
    )
}

/// Insert posts in a single transaction.
pub fn populate(conn: &mut Connection, posts: &[Post]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO post (id, text, creation_date, last_change_date, \
             counter1, counter2, counter3, counter4, counter5, counter6, counter7, counter8, counter9) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;

        for post in posts {
            stmt.execute(params![
                post.id,
                &post.text,
                post.creation_date,
                post.last_change_date,
                post.counter1,
                post.counter2,
                post.counter3,
                post.counter4,
                post.counter5,
                post.counter6,
                post.counter7,
                post.counter8,
                post.counter9,
            ])?;
        }
    }
    tx.commit()
}

/// Create the schema at `target` and fill it with `posts`.
pub fn seed(target: &str, posts: &[Post]) -> Result<()> {
    let path = database_path(target);
    let mut conn = Connection::open(path).map_err(connection_error)?;

    setup_schema(&conn).map_err(execution_error)?;
    populate(&mut conn, posts).map_err(execution_error)?;

    info!(path, rows = posts.len(), "Seeded SQLite database");
    Ok(())
}

/// The strategies available for a SQLite target, in report order: the
/// `rusqlite` ones first, then the `sqlx` ones.
pub fn executors() -> Vec<Box<dyn Executor<Item = Post>>> {
    let mut executors: Vec<Box<dyn Executor<Item = Post>>> = vec![
        Box::new(RawStatementExecutor::default()),
        Box::new(CachedStatementExecutor::default()),
        Box::new(QueryRowExecutor::default()),
        Box::new(NamedColumnExecutor::default()),
    ];
    executors.extend(crate::sqlx_sqlite::executors());
    executors
}

// -------------------------------------------------------------------------
// Session
// -------------------------------------------------------------------------

/// A read-only connection owned by one strategy between `init` and `teardown`.
#[derive(Default)]
struct Session {
    conn: Option<Connection>,
}

impl Session {
    fn open(&mut self, target: &str) -> Result<()> {
        let path = database_path(target);
        // Read-only, so a missing file fails here instead of being created empty.
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(path, flags).map_err(connection_error)?;

        // Opening is lazy; touch the schema so an unreadable file fails now.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;

        debug!(path, "Opened SQLite connection");
        self.conn = Some(conn);
        Ok(())
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::Execution("connection not initialized".to_string()))
    }

    fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, err)| Error::Teardown(err.to_string())),
            None => Ok(()),
        }
    }
}

// -------------------------------------------------------------------------
// Row mapping
// -------------------------------------------------------------------------

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        text: row.get(1)?,
        creation_date: row.get(2)?,
        last_change_date: row.get(3)?,
        counter1: row.get(4)?,
        counter2: row.get(5)?,
        counter3: row.get(6)?,
        counter4: row.get(7)?,
        counter5: row.get(8)?,
        counter6: row.get(9)?,
        counter7: row.get(10)?,
        counter8: row.get(11)?,
        counter9: row.get(12)?,
    })
}

fn post_from_named_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        text: row.get("text")?,
        creation_date: row.get("creation_date")?,
        last_change_date: row.get("last_change_date")?,
        counter1: row.get("counter1")?,
        counter2: row.get("counter2")?,
        counter3: row.get("counter3")?,
        counter4: row.get("counter4")?,
        counter5: row.get("counter5")?,
        counter6: row.get("counter6")?,
        counter7: row.get("counter7")?,
        counter8: row.get("counter8")?,
        counter9: row.get("counter9")?,
    })
}

fn connection_error(err: rusqlite::Error) -> Error {
    Error::Connection(err.to_string())
}

fn execution_error(err: rusqlite::Error) -> Error {
    Error::Execution(err.to_string())
}

// -------------------------------------------------------------------------
// Strategies
// -------------------------------------------------------------------------

/// Prepares a fresh statement on every call and maps columns by index.
#[derive(Default)]
pub struct RawStatementExecutor {
    session: Session,
}

impl Executor for RawStatementExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "rusqlite (raw statement)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        self.session.open(connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        let conn = self.session.conn()?;
        let mut stmt = conn
            .prepare(SELECT_POST_BY_ID)
            .map_err(execution_error)?;
        let mut rows = stmt.query([id]).map_err(execution_error)?;

        let post = match rows.next().map_err(execution_error)? {
            Some(row) => Some(post_from_row(row).map_err(execution_error)?),
            None => None,
        };
        Ok(post)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        let conn = self.session.conn()?;
        let mut stmt = conn.prepare(SELECT_ALL_POSTS).map_err(execution_error)?;
        let mut rows = stmt.query([]).map_err(execution_error)?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next().map_err(execution_error)? {
            posts.push(post_from_row(row).map_err(execution_error)?);
        }
        Ok(posts)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

/// Reuses prepared statements from the connection's statement cache.
#[derive(Default)]
pub struct CachedStatementExecutor {
    session: Session,
}

impl Executor for CachedStatementExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "rusqlite (cached statement)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        self.session.open(connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        let conn = self.session.conn()?;
        let mut stmt = conn
            .prepare_cached(SELECT_POST_BY_ID)
            .map_err(execution_error)?;
        let mut posts = stmt
            .query_map([id], post_from_row)
            .map_err(execution_error)?;

        let post = posts.next().transpose().map_err(execution_error)?;
        Ok(post)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        fetch_all_cached(self.session.conn()?, post_from_row)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

/// Uses the single-row helper, which yields the first matching row or nothing.
#[derive(Default)]
pub struct QueryRowExecutor {
    session: Session,
}

impl Executor for QueryRowExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "rusqlite (query_row)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        self.session.open(connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        self.session
            .conn()?
            .query_row(SELECT_POST_BY_ID, [id], post_from_row)
            .optional()
            .map_err(execution_error)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        fetch_all_cached(self.session.conn()?, post_from_row)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

/// Maps columns by name instead of position.
#[derive(Default)]
pub struct NamedColumnExecutor {
    session: Session,
}

impl Executor for NamedColumnExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "rusqlite (named columns)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        self.session.open(connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        let conn = self.session.conn()?;
        let mut stmt = conn
            .prepare_cached(SELECT_POST_BY_ID)
            .map_err(execution_error)?;

        let post = stmt
            .query_row([id], post_from_named_row)
            .optional()
            .map_err(execution_error)?;
        Ok(post)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        fetch_all_cached(self.session.conn()?, post_from_named_row)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

fn fetch_all_cached(
    conn: &Connection,
    map: fn(&Row<'_>) -> rusqlite::Result<Post>,
) -> Result<Vec<Post>> {
    let mut stmt = conn
        .prepare_cached(SELECT_ALL_POSTS)
        .map_err(execution_error)?;
    let posts = stmt
        .query_map([], map)
        .map_err(execution_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(execution_error)?;
    Ok(posts)
}
