use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    /// Share of all records, 0..=100.
    pub percent: f64,
}

/// Occurrence counts for one categorical column, most frequent first.
/// Equal counts keep the order in which values were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
}

/// Accumulates counts while records stream past.
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    positions: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        match self.positions.get(value) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(value.to_string(), self.counts.len());
                self.counts.push((value.to_string(), 1));
            }
        }
    }

    pub fn finish(self, total: usize) -> FrequencyTable {
        let mut counts = self.counts;
        // sort_by is stable: ties stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let entries = counts
            .into_iter()
            .map(|(value, count)| FrequencyEntry {
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
                value,
                count,
            })
            .collect();
        FrequencyTable { entries }
    }
}

impl FrequencyTable {
    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

#[cfg(test)]
impl FrequencyTable {
    pub fn count_of(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[&str]) -> FrequencyTable {
        let mut counter = FrequencyCounter::new();
        for v in values {
            counter.add(v);
        }
        counter.finish(values.len())
    }

    #[test]
    fn sorted_by_descending_count() {
        let t = table(&["West", "Midwest", "West", "South", "West", "Midwest"]);
        let order: Vec<_> = t.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["West", "Midwest", "South"]);
        assert_eq!(t.count_of("West"), 3);
        assert_eq!(t.count_of("North"), 0);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let t = table(&["Cash", "Gift Card", "Debit Card", "Gift Card", "Cash", "Debit Card"]);
        let order: Vec<_> = t.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["Cash", "Gift Card", "Debit Card"]);
    }

    #[test]
    fn counts_and_percentages_cover_everything() {
        let t = table(&["a", "b", "c", "a", "b", "a", "d"]);
        assert_eq!(t.total(), 7);
        let pct: f64 = t.entries.iter().map(|e| e.percent).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn top_is_bounded_by_table_size() {
        let t = table(&["a", "b"]);
        assert_eq!(t.top(5).len(), 2);
        assert_eq!(t.top(1)[0].value, "a");
        assert!(t.top(0).is_empty());
    }
}
