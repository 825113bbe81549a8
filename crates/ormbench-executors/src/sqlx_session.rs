//! Blocking bridge shared by the `sqlx` strategies.
//!
//! `sqlx` is async; every strategy owns a single-threaded Tokio runtime and a
//! one-connection pool and blocks on them, so from the harness's point of view
//! each call returns only once the query has completed.

use std::future::Future;

use sqlx::pool::PoolOptions;
use sqlx::{Database, Pool};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use ormbench::{Error, Result};

pub(crate) fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Error::Connection(format!("failed to start Tokio runtime: {}", err)))
}

/// A pool holding exactly one live connection.
pub(crate) fn single_connection<DB: Database>() -> PoolOptions<DB> {
    PoolOptions::new().max_connections(1).min_connections(1)
}

pub(crate) fn connection_error(err: sqlx::Error) -> Error {
    Error::Connection(err.to_string())
}

pub(crate) fn execution_error(err: sqlx::Error) -> Error {
    Error::Execution(err.to_string())
}

/// Runtime and pool owned by one strategy between `init` and `teardown`.
pub(crate) struct Session<DB: Database> {
    state: Option<(Runtime, Pool<DB>)>,
}

impl<DB: Database> Default for Session<DB> {
    fn default() -> Self {
        Self { state: None }
    }
}

impl<DB: Database> Session<DB> {
    /// Drive `connect` to completion on a fresh runtime and keep the pool.
    pub(crate) fn open<F>(&mut self, connect: F) -> Result<()>
    where
        F: Future<Output = std::result::Result<Pool<DB>, sqlx::Error>>,
    {
        let rt = runtime()?;
        let pool = rt.block_on(connect).map_err(connection_error)?;

        debug!(database = DB::NAME, "Opened sqlx pool");
        self.state = Some((rt, pool));
        Ok(())
    }

    pub(crate) fn get(&self) -> Result<(&Runtime, &Pool<DB>)> {
        self.state
            .as_ref()
            .map(|(rt, pool)| (rt, pool))
            .ok_or_else(|| Error::Execution("connection not initialized".to_string()))
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        if let Some((rt, pool)) = self.state.take() {
            rt.block_on(pool.close());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Sqlite;

    #[test]
    fn test_get_before_open_is_execution_error() {
        let session = Session::<Sqlite>::default();
        assert!(matches!(session.get(), Err(Error::Execution(_))));
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut session = Session::<Sqlite>::default();
        assert!(session.close().is_ok());
    }
}
