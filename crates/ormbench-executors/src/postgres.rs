//! PostgreSQL strategies built on `sqlx`.
//!
//! Enable with `--features postgres`.

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Postgres, Row};
use tracing::info;

use ormbench::{Error, Executor, ItemId, Result};

use crate::post::{post_columns, Post};
use crate::sqlx_session::{
    connection_error, execution_error, runtime, single_connection, Session,
};

const SELECT_POST_BY_ID: &str = concat!("SELECT ", post_columns!(), " FROM post WHERE id = $1");
const SELECT_ALL_POSTS: &str = concat!("SELECT ", post_columns!(), " FROM post");

/// The strategies available for a PostgreSQL target, in report order.
pub fn executors() -> Vec<Box<dyn Executor<Item = Post>>> {
    vec![
        Box::new(ManualMappingExecutor::default()),
        Box::new(FromRowExecutor::default()),
    ]
}

/// Create (or recreate) the `post` table at `target` and fill it with `posts`.
pub fn seed(target: &str, posts: &[Post]) -> Result<()> {
    let rt = runtime()?;

    rt.block_on(async {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(target)
            .await
            .map_err(connection_error)?;

        sqlx::query("DROP TABLE IF EXISTS post")
            .execute(&pool)
            .await
            .map_err(execution_error)?;
        sqlx::query(
            r#"
            CREATE TABLE post (
                id BIGINT PRIMARY KEY,
                text TEXT NOT NULL,
                creation_date TIMESTAMP NOT NULL,
                last_change_date TIMESTAMP NOT NULL,
                counter1 INTEGER,
                counter2 INTEGER,
                counter3 INTEGER,
                counter4 INTEGER,
                counter5 INTEGER,
                counter6 INTEGER,
                counter7 INTEGER,
                counter8 INTEGER,
                counter9 INTEGER
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(execution_error)?;

        let mut tx = pool.begin().await.map_err(execution_error)?;
        for post in posts {
            sqlx::query(
                "INSERT INTO post (id, text, creation_date, last_change_date, \
                 counter1, counter2, counter3, counter4, counter5, counter6, counter7, counter8, counter9) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            )
            .bind(post.id)
            .bind(&post.text)
            .bind(post.creation_date)
            .bind(post.last_change_date)
            .bind(post.counter1)
            .bind(post.counter2)
            .bind(post.counter3)
            .bind(post.counter4)
            .bind(post.counter5)
            .bind(post.counter6)
            .bind(post.counter7)
            .bind(post.counter8)
            .bind(post.counter9)
            .execute(&mut *tx)
            .await
            .map_err(execution_error)?;
        }
        tx.commit().await.map_err(execution_error)?;

        pool.close().await;
        Ok::<_, Error>(())
    })?;

    info!(rows = posts.len(), "Seeded PostgreSQL database");
    Ok(())
}

fn open(session: &mut Session<Postgres>, target: &str) -> Result<()> {
    session.open(single_connection::<Postgres>().connect(target))
}

// -------------------------------------------------------------------------
// Strategies
// -------------------------------------------------------------------------

/// Untyped query; each column is pulled out of the row by name.
#[derive(Default)]
pub struct ManualMappingExecutor {
    session: Session<Postgres>,
}

fn post_from_row(row: &PgRow) -> std::result::Result<Post, sqlx::Error> {
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
    session: Session<Postgres>,
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

    #[test]
    fn test_fetch_before_init_is_execution_error() {
        let mut executor = FromRowExecutor::default();
        assert!(matches!(executor.fetch_all(), Err(Error::Execution(_))));
    }
}
