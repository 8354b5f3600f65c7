use crate::config::Weighted;
use crate::model::ConfigError;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Discrete distribution over a fixed set of values.
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    values: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Clone> WeightedChoice<T> {
    pub fn new(field: &str, entries: &[Weighted<T>]) -> Result<Self, ConfigError> {
        let index = WeightedIndex::new(entries.iter().map(|e| e.weight)).map_err(|e| {
            ConfigError::InvalidWeights {
                field: field.to_string(),
                detail: e.to_string(),
            }
        })?;
        Ok(Self {
            values: entries.iter().map(|e| e.value.clone()).collect(),
            index,
        })
    }

    /// Every value equally likely.
    pub fn uniform(field: &str, values: &[T]) -> Result<Self, ConfigError> {
        let entries: Vec<Weighted<T>> = values
            .iter()
            .cloned()
            .map(|v| Weighted::new(v, 1))
            .collect();
        Self::new(field, &entries)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[self.index.sample(rng)]
    }
}
