use crate::instrument::{Category, Instrument};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics<'a> {
    pub total: usize,
    pub used: usize,
    pub never_used: usize,
    pub most_used: Vec<&'a Instrument>,
    /// Instruments with a last use, stalest first, with whole days since.
    pub least_recently_used: Vec<(&'a Instrument, i64)>,
    /// Category counts, largest first.
    pub by_category: Vec<(Category, usize)>,
}

impl<'a> Analytics<'a> {
    pub fn compute(instruments: &'a [Instrument], now: DateTime<Utc>) -> Self {
        let used = instruments
            .iter()
            .filter(|inst| inst.metadata.usage_count > 0)
            .count();
        let never_used = instruments
            .iter()
            .filter(|inst| inst.metadata.last_used.is_none())
            .count();

        let mut most_used: Vec<&Instrument> = instruments.iter().collect();
        most_used.sort_by(|a, b| b.metadata.usage_count.cmp(&a.metadata.usage_count));
        most_used.truncate(TOP_N);

        let mut least_recently_used: Vec<(&Instrument, i64)> = instruments
            .iter()
            .filter_map(|inst| {
                let last_used = inst.metadata.last_used?;
                Some((inst, (now - last_used).num_days()))
            })
            .collect();
        least_recently_used.sort_by(|a, b| b.1.cmp(&a.1));
        least_recently_used.truncate(TOP_N);

        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        for inst in instruments {
            *counts.entry(inst.category).or_insert(0) += 1;
        }
        let mut by_category: Vec<(Category, usize)> = counts.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total: instruments.len(),
            used,
            never_used,
            most_used,
            least_recently_used,
            by_category,
        }
    }
}
