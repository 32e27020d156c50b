//! Sampler implementations.

use rand::Rng;
use rand::distr::StandardUniform;

use crate::SampleRate;

/// Good number for Knuth hashing: large, prime, and fits into 64 bits.
const SAMPLER_HASHER: u64 = 1_111_111_111_111_111_111;

/// A sampling decision source.
///
/// Implementations must be safe to share between threads, as telemetry may be sent from any
/// thread.
pub trait Sampling: Send + Sync {
    /// Returns `true` if the input should be kept.
    fn sample(&self) -> bool;

    /// Returns the configured sample rate.
    fn sample_rate(&self) -> SampleRate;
}

/// A probabilistic sampler.
///
/// Every call to [`sample`](Sampling::sample) is an independent Bernoulli trial with a success
/// probability of the configured rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    sample_rate: SampleRate,
}

impl Sampler {
    /// Creates a sampler keeping the given percentage of inputs.
    pub fn new(sample_rate: SampleRate) -> Self {
        Self { sample_rate }
    }

    /// Creates a sampler that keeps every input.
    pub fn keep_all() -> Self {
        Self::new(SampleRate::ALL)
    }

    /// Creates a sampler that rejects every input.
    pub fn reject_all() -> Self {
        Self::new(SampleRate::NONE)
    }
}

impl Sampling for Sampler {
    fn sample(&self) -> bool {
        let proportion = self.sample_rate.proportion();

        if proportion <= 0.0 {
            false
        } else if proportion >= 1.0 {
            true
        } else {
            let mut rng = rand::rng();
            let s: f64 = rng.sample(StandardUniform);
            s < proportion
        }
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }
}

/// A sampler whose decision is the same each time.
///
/// The decision is derived from a 64-bit base id and the sample rate when the sampler is
/// created, so it is stable across calls, time and processes. Samplers built from the same id
/// and rate always agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeterministicSampler {
    sample_rate: SampleRate,
    /// Persisted sampling decision.
    should_sample: bool,
}

impl DeterministicSampler {
    /// Creates a sampler for the given id.
    pub fn new(base_id: u64, sample_rate: SampleRate) -> Self {
        Self {
            sample_rate,
            should_sample: decide(base_id, sample_rate),
        }
    }

    /// Creates a sampler for a 128-bit trace id.
    ///
    /// Only the lower 64 bits participate in the decision, so 64-bit and 128-bit representations
    /// of the same trace sample identically.
    pub fn from_trace_id(trace_id: u128, sample_rate: SampleRate) -> Self {
        Self::new(trace_id as u64, sample_rate)
    }
}

impl Sampling for DeterministicSampler {
    fn sample(&self) -> bool {
        self.should_sample
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }
}

fn decide(base_id: u64, sample_rate: SampleRate) -> bool {
    let proportion = sample_rate.proportion();

    // `u64::MAX as f64` rounds up to 2^64, which would make the comparison below reject the
    // largest hashes at 100%.
    if proportion <= 0.0 {
        return false;
    } else if proportion >= 1.0 {
        return true;
    }

    // Overflowing multiplication disperses sequential ids over the full 64-bit range.
    let hash = base_id.wrapping_mul(SAMPLER_HASHER);
    let threshold = u64::MAX as f64 * proportion;
    (hash as f64) < threshold
}
