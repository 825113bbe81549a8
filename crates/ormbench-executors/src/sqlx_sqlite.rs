//! SQLite strategies built on `sqlx`.
//!
//! They read the same file as the `rusqlite` strategies, so a SQLite run
//! compares two libraries on one store.

use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, Sqlite};

use ormbench::{Executor, ItemId, Result};

use crate::post::Post;
use crate::sqlite::{database_path, SELECT_ALL_POSTS, SELECT_POST_BY_ID};
use crate::sqlx_session::{execution_error, single_connection, Session};

/// The `sqlx` strategies for a SQLite target, in report order.
pub fn executors() -> Vec<Box<dyn Executor<Item = Post>>> {
    vec![
        Box::new(ManualMappingExecutor::default()),
        Box::new(FromRowExecutor::default()),
    ]
}

/// Read-only, so a missing file is a connection error rather than a new
/// empty database.
fn connect_options(target: &str) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(database_path(target))
        .read_only(true)
        .create_if_missing(false)
}

fn open(session: &mut Session<Sqlite>, target: &str) -> Result<()> {
    session.open(single_connection::<Sqlite>().connect_with(connect_options(target)))
}

fn post_from_row(row: &SqliteRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        creation_date: row.try_get("creation_date")?,
        last_change_date: row.try_get("last_change_date")?,
        counter1: row.try_get("counter1")?,
        counter2: row.try_get("counter2")?,
        counter3: row.try_get("counter3")?,
        counter4: row.try_get("counter4")?,
        counter5: row.try_get("counter5")?,
        counter6: row.try_get("counter6")?,
        counter7: row.try_get("counter7")?,
        counter8: row.try_get("counter8")?,
        counter9: row.try_get("counter9")?,
    })
}

/// Untyped query; each column is pulled out of the row by name.
#[derive(Default)]
pub struct ManualMappingExecutor {
    session: Session<Sqlite>,
}

impl Executor for ManualMappingExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "sqlx (manual row mapping)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        open(&mut self.session, connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        let (rt, pool) = self.session.get()?;
        let row = rt
            .block_on(sqlx::query(SELECT_POST_BY_ID).bind(id).fetch_optional(pool))
            .map_err(execution_error)?;

        row.as_ref()
            .map(post_from_row)
            .transpose()
            .map_err(execution_error)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        let (rt, pool) = self.session.get()?;
        let rows = rt
            .block_on(sqlx::query(SELECT_ALL_POSTS).fetch_all(pool))
            .map_err(execution_error)?;

        rows.iter()
            .map(post_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(execution_error)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

/// Typed query; rows are decoded through the derived `FromRow` impl.
#[derive(Default)]
pub struct FromRowExecutor {
    session: Session<Sqlite>,
}

impl Executor for FromRowExecutor {
    type Item = Post;

    fn name(&self) -> &str {
        "sqlx (FromRow mapping)"
    }

    fn init(&mut self, connection_target: &str) -> Result<()> {
        open(&mut self.session, connection_target)
    }

    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Post>> {
        let (rt, pool) = self.session.get()?;
        rt.block_on(
            sqlx::query_as::<_, Post>(SELECT_POST_BY_ID)
                .bind(id)
                .fetch_optional(pool),
        )
        .map_err(execution_error)
    }

    fn fetch_all(&mut self) -> Result<Vec<Post>> {
        let (rt, pool) = self.session.get()?;
        rt.block_on(sqlx::query_as::<_, Post>(SELECT_ALL_POSTS).fetch_all(pool))
            .map_err(execution_error)
    }

    fn teardown(&mut self) -> Result<()> {
        self.session.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormbench::Error;

    #[test]
    fn test_init_on_missing_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let mut executor = FromRowExecutor::default();
        let err = executor.init(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(!path.exists());
    }
}
