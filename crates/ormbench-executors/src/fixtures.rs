//! Deterministic `post` rows for seeding a backing store.

use chrono::{DateTime, NaiveDateTime};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::post::Post;

/// Row count of the reference data set.
pub const DEFAULT_POST_COUNT: usize = 5_000;

const SEED: u64 = 12345;

/// 2020-01-01T00:00:00Z
const BASE_TIMESTAMP: i64 = 1_577_836_800;

const TEXT_LEN: usize = 200;

/// Generate `count` posts with ids `1..=count`.
///
/// The same count always yields the same rows, so every strategy and every
/// run sees identical data.
pub fn generate_posts(count: usize) -> Vec<Post> {
    let mut rng = StdRng::seed_from_u64(SEED);

    (0..count)
        .map(|i| {
            let created = BASE_TIMESTAMP + (i as i64) * 60;
            let changed = created + rng.gen_range(0..86_400);
            let text = random_text(&mut rng, TEXT_LEN);
            let mut counter = || rng.gen_bool(0.8).then(|| rng.gen_range(0..1_000));

            Post {
                id: i as i64 + 1,
                text,
                creation_date: timestamp(created),
                last_change_date: timestamp(changed),
                counter1: counter(),
                counter2: counter(),
                counter3: counter(),
                counter4: counter(),
                counter5: counter(),
                counter6: counter(),
                counter7: counter(),
                counter8: counter(),
                counter9: counter(),
            }
        })
        .collect()
}

fn random_text(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

fn timestamp(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .naive_utc()
}
