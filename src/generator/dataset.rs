use crate::config::GeneratorConfig;
use crate::generator::synthesizer::RecordSynthesizer;
use crate::model::{ConfigError, TransactionRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

/// Seeded when the config carries a seed, otherwise from the OS.
pub fn rng_for(cfg: &GeneratorConfig) -> StdRng {
    match cfg.seed {
        Some(seed) => {
            info!("Using RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

/// Runs the synthesizer `record_count` times. Fails before producing any
/// record when the config is out of domain.
pub fn build_records(
    cfg: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Vec<TransactionRecord>, ConfigError> {
    let synthesizer = RecordSynthesizer::new(cfg)?;
    let capacity = usize::try_from(cfg.record_count).unwrap_or(usize::MAX).min(1 << 20);
    let mut records = Vec::with_capacity(capacity);
    for index in 0..cfg.record_count {
        records.push(synthesizer.synthesize(index, rng));
    }
    info!("Synthesized {} records", records.len());
    Ok(records)
}
