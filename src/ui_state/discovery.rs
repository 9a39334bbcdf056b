use crate::instrument::Instrument;
use chrono::{DateTime, Utc};
use rand::Rng;

const HIDDEN_GEM_TAG: &str = "Hidden Gem";
/// Stand-in age for instruments that were never used.
const NEVER_USED_DAYS: f64 = 999.0;
const MAX_AGE_FACTOR: f64 = 10.0;

/// Discovery weight: hidden gems count triple, never-used instruments five
/// times, and staleness scales the score by up to ten.
pub fn discovery_weight(inst: &Instrument, now: DateTime<Utc>) -> f64 {
    let mut score = 1.0;

    if inst.has_tag(HIDDEN_GEM_TAG) {
        score *= 3.0;
    }

    let days_since_used = match inst.metadata.last_used {
        Some(last_used) => (now - last_used).num_milliseconds() as f64 / 86_400_000.0,
        None => {
            score *= 5.0;
            NEVER_USED_DAYS
        }
    };

    score * (days_since_used / 30.0).min(MAX_AGE_FACTOR)
}

/// Single-pass weighted draw over the collection.
pub fn pick_suggestion<'a, R: Rng>(
    instruments: &'a [Instrument],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<&'a str> {
    if instruments.is_empty() {
        return None;
    }

    let weights: Vec<f64> = instruments
        .iter()
        .map(|inst| discovery_weight(inst, now))
        .collect();
    let total: f64 = weights.iter().sum();
    let mut threshold = rng.gen::<f64>() * total;

    for (inst, weight) in instruments.iter().zip(weights) {
        threshold -= weight;
        if threshold <= 0.0 {
            return Some(&inst.id);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{instrument, used};
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_used_hidden_gem_gets_the_cap() {
        let now = Utc::now();
        let mut gem = instrument("gem", "Gem");
        gem.tags = vec![HIDDEN_GEM_TAG.to_string()];

        assert_eq!(discovery_weight(&gem, now), 150.0);
        assert_eq!(discovery_weight(&instrument("plain", "Plain"), now), 50.0);
    }

    #[test]
    fn staleness_scales_weight() {
        let now = Utc::now();
        let month_old = used(instrument("a", "A"), 3, now - Duration::days(30));
        let ancient = used(instrument("b", "B"), 3, now - Duration::days(3000));
        let fresh = used(instrument("c", "C"), 3, now);

        assert!((discovery_weight(&month_old, now) - 1.0).abs() < 1e-9);
        assert_eq!(discovery_weight(&ancient, now), MAX_AGE_FACTOR);
        assert_eq!(discovery_weight(&fresh, now), 0.0);
    }

    #[test]
    fn empty_collection_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_suggestion(&[], Utc::now(), &mut rng), None);
    }

    #[test]
    fn unused_gem_is_reachable_and_fresh_instruments_are_not() {
        let now = Utc::now();
        let fresh = used(instrument("fresh", "Fresh"), 10, now);
        let mut gem = instrument("gem", "Gem");
        gem.tags = vec![HIDDEN_GEM_TAG.to_string()];
        let instruments = vec![fresh, gem];

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(pick_suggestion(&instruments, now, &mut rng), Some("gem"));
        }
    }

    #[test]
    fn picks_spread_over_candidates() {
        let now = Utc::now();
        let instruments = vec![instrument("a", "A"), instrument("b", "B")];
        let mut rng = StdRng::seed_from_u64(42);

        let picks: Vec<_> = (0..200)
            .filter_map(|_| pick_suggestion(&instruments, now, &mut rng))
            .collect();

        assert_eq!(picks.len(), 200);
        assert!(picks.contains(&"a"));
        assert!(picks.contains(&"b"));
    }
}
