//! Concrete data-access strategies for the ormbench harness.
//!
//! Each strategy is a thin [`Executor`] over one database library and one way
//! of using it. The harness never sees these types directly; it receives
//! them boxed from [`executors_for`].
//!
//! # Strategy families
//!
//! - **SQLite** via `rusqlite`: raw statements, cached statements, the
//!   single-row helper and name-based column mapping. Via `sqlx`: manual
//!   row mapping and derived `FromRow` mapping.
//! - **PostgreSQL** via `sqlx` (feature `postgres`): manual row mapping and
//!   derived `FromRow` mapping.

pub mod fixtures;
pub mod post;
pub mod sqlite;
pub mod sqlx_sqlite;

mod sqlx_session;

#[cfg(feature = "postgres")]
pub mod postgres;

use ormbench::{Executor, Result};

pub use fixtures::{generate_posts, DEFAULT_POST_COUNT};
pub use post::Post;

/// URL schemes routed to the PostgreSQL strategies.
pub const POSTGRES_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];

/// The backing store family named by a connection target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// A SQLite database file.
    Sqlite,
    /// A PostgreSQL server.
    Postgres,
}

impl Backend {
    /// Classify a connection target. Anything that is not a PostgreSQL URL is
    /// treated as a SQLite path.
    pub fn from_target(target: &str) -> Self {
        if POSTGRES_SCHEMES.iter().any(|scheme| target.starts_with(scheme)) {
            Backend::Postgres
        } else {
            Backend::Sqlite
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Every strategy that can run against `target`, in report order.
pub fn executors_for(target: &str) -> Result<Vec<Box<dyn Executor<Item = Post>>>> {
    match Backend::from_target(target) {
        Backend::Sqlite => Ok(sqlite::executors()),
        #[cfg(feature = "postgres")]
        Backend::Postgres => Ok(postgres::executors()),
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => Err(postgres_disabled()),
    }
}

/// Recreate the `post` table at `target` with `rows` generated posts.
pub fn seed(target: &str, rows: usize) -> Result<()> {
    let posts = generate_posts(rows);
    match Backend::from_target(target) {
        Backend::Sqlite => sqlite::seed(target, &posts),
        #[cfg(feature = "postgres")]
        Backend::Postgres => postgres::seed(target, &posts),
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => Err(postgres_disabled()),
    }
}

#[cfg(not(feature = "postgres"))]
fn postgres_disabled() -> ormbench::Error {
    ormbench::Error::Config("PostgreSQL strategies require the `postgres` feature".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_target() {
        assert_eq!(Backend::from_target("bench.db"), Backend::Sqlite);
        assert_eq!(Backend::from_target("sqlite://bench.db"), Backend::Sqlite);
        assert_eq!(Backend::from_target("postgres://localhost/bench"), Backend::Postgres);
        assert_eq!(Backend::from_target("postgresql://localhost/bench"), Backend::Postgres);
    }

    #[test]
    fn test_sqlite_executors_for_path() {
        let executors = executors_for("bench.db").unwrap();
        assert_eq!(executors.len(), 6);

        let libraries: Vec<_> = executors
            .iter()
            .filter_map(|e| e.name().split_whitespace().next())
            .collect();
        assert!(libraries.contains(&"rusqlite"));
        assert!(libraries.contains(&"sqlx"));
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn test_postgres_without_feature_is_config_error() {
        let err = executors_for("postgres://localhost/bench").err().unwrap();
        assert!(matches!(err, ormbench::Error::Config(_)));
    }
}
