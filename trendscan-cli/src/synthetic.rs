//! Seeded random-walk bars for demos and smoke runs.
//!
//! Weekdays only. The same seed always yields the same series.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trendscan_core::domain::Bar;

/// Generate `count` daily bars starting at `start` (weekends skipped).
pub fn random_walk(seed: u64, count: usize, start: NaiveDate) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let mut current = start;

    // Slow regime drift so the walk alternates trending and ranging stretches.
    let mut drift = 0.0_f64;
    while bars.len() < count {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }
        if bars.len() % 60 == 0 {
            drift = rng.gen_range(-0.004..0.004);
        }

        let daily_return: f64 = drift + rng.gen_range(-0.025..0.025);
        let open = price;
        let close = (price * (1.0 + daily_return)).max(1.0);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.012));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.012));
        let volume = rng.gen_range(400_000..4_000_000u64);

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
        current += chrono::Duration::days(1);
    }
    bars
}
