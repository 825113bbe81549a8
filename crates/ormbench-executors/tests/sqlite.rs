//! SQLite strategies against a seeded temporary database.

use ormbench::{Benchmarker, Error, HarnessConfig};
use ormbench_executors::{executors_for, generate_posts, seed, sqlite};

const ROWS: usize = 50;

struct TestDb {
    target: String,
    _dir: tempfile::TempDir,
}

impl TestDb {
    fn seeded() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bench.db").to_str().unwrap().to_string();
        seed(&target, ROWS).unwrap();
        Self { target, _dir: dir }
    }
}

#[test]
fn test_every_strategy_fetches_seeded_rows() {
    let db = TestDb::seeded();
    let expected = generate_posts(ROWS);
    let mut libraries = Vec::new();

    for mut executor in sqlite::executors() {
        libraries.push(executor.name().split(' ').next().unwrap_or_default().to_string());
        executor.init(&db.target).unwrap();

        let post = executor.fetch_one(1).unwrap();
        assert_eq!(post.as_ref(), Some(&expected[0]), "{}", executor.name());

        let post = executor.fetch_one(ROWS as i64).unwrap();
        assert_eq!(post.as_ref(), expected.last(), "{}", executor.name());

        let all = executor.fetch_all().unwrap();
        assert_eq!(all, expected, "{}", executor.name());

        executor.teardown().unwrap();
    }

    // rusqlite and sqlx read the same file.
    libraries.dedup();
    assert_eq!(libraries, vec!["rusqlite", "sqlx"]);
}

#[test]
fn test_missing_item_is_none() {
    let db = TestDb::seeded();

    for mut executor in sqlite::executors() {
        executor.init(&db.target).unwrap();
        assert!(executor.fetch_one(10_000).unwrap().is_none(), "{}", executor.name());
        assert!(executor.fetch_one(-1).unwrap().is_none(), "{}", executor.name());
        executor.teardown().unwrap();
    }
}

#[test]
fn test_repeated_fetches_are_stable() {
    let db = TestDb::seeded();

    for mut executor in sqlite::executors() {
        executor.init(&db.target).unwrap();
        let first = executor.fetch_one(3).unwrap();
        for _ in 0..5 {
            assert_eq!(executor.fetch_one(3).unwrap(), first);
        }
        assert_eq!(executor.fetch_all().unwrap().len(), ROWS);
        assert_eq!(executor.fetch_all().unwrap().len(), ROWS);
        executor.teardown().unwrap();
    }
}

#[test]
fn test_sqlite_prefix_is_accepted() {
    let db = TestDb::seeded();
    let target = format!("{}{}", sqlite::SCHEME, db.target);

    for mut executor in executors_for(&target).unwrap() {
        executor.init(&target).unwrap();
        assert!(executor.fetch_one(1).unwrap().is_some(), "{}", executor.name());
        executor.teardown().unwrap();
    }
}

#[test]
fn test_init_on_missing_file_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("absent.db").to_str().unwrap().to_string();

    for mut executor in sqlite::executors() {
        let err = executor.init(&target).unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{}: {}", executor.name(), err);
    }
    assert!(!dir.path().join("absent.db").exists());
}

#[test]
fn test_harness_run_over_sqlite() {
    let db = TestDb::seeded();
    let config = HarnessConfig::new(db.target.clone()).with_iterations(10);

    let mut bench = Benchmarker::new(config).unwrap();
    for executor in executors_for(&db.target).unwrap() {
        bench.register(executor);
    }

    bench.run(true).unwrap();
    let results = bench.results();

    for collection in [&results.warm_up, &results.single_item, &results.all_items] {
        assert_eq!(collection.len(), 6);
        for result in collection {
            assert!(!result.is_skipped(), "{} was skipped: {:?}", result.name(), result.error());
        }
    }
    for result in &results.single_item {
        assert!(result.first_item_exec_time() <= result.exec_time());
    }
}

#[test]
fn test_harness_run_aborts_on_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("absent.db").to_str().unwrap().to_string();

    let mut bench = Benchmarker::new(HarnessConfig::new(target.clone())).unwrap();
    for executor in executors_for(&target).unwrap() {
        bench.register(executor);
    }

    let err = bench.run(false).unwrap_err();
    assert!(matches!(err, Error::Connection(_)));
    assert!(bench.results().is_empty());
}

#[test]
fn test_missing_table_records_zero_times() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")
        .unwrap();
    let target = path.to_str().unwrap().to_string();

    let mut bench = Benchmarker::new(HarnessConfig::new(target.clone()).with_iterations(2)).unwrap();
    for executor in executors_for(&target).unwrap() {
        bench.register(executor);
    }

    bench.run(false).unwrap();
    let results = bench.results();
    assert_eq!(results.single_item.len(), 6);
    assert!(results.single_item.iter().all(|r| r.is_skipped()));
    assert!(results.all_items.iter().all(|r| r.is_skipped()));
}
