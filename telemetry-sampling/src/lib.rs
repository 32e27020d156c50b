//! Sampling decisions for the SDK's self-telemetry channel.
//!
//! Telemetry about the SDK itself must never grow unbounded, so every message passes through at
//! least one sampler before it becomes an event. Two kinds of samplers exist, both configured
//! with a [`SampleRate`] in percent:
//!
//! - [`Sampler`]: a probabilistic sampler. Every call to [`Sampling::sample`] is an independent
//!   Bernoulli trial.
//! - [`DeterministicSampler`]: a sampler whose decision is a pure function of a 64-bit id and the
//!   rate. The decision is computed once at construction and never changes afterwards.
//!
//! # Sampling Determinism
//!
//! Deterministic sampling allows related telemetry to be sampled consistently. When two
//! processes build a [`DeterministicSampler`] from the same id (for instance the lower 64 bits of
//! a trace id) and the same rate, they reach the same decision without coordination. The id is
//! dispersed with Knuth's multiplicative hashing and compared against a threshold proportional
//! to the rate.
//!
//! # Boundaries
//!
//! A rate of `0` never samples and a rate of `100` always samples, for both samplers. There is no
//! residual randomness or rounding at the boundaries.
//!
//! # Example
//!
//! ```
//! use telemetry_sampling::{DeterministicSampler, SampleRate, Sampler, Sampling};
//!
//! let rate = SampleRate::new(20.0).unwrap();
//!
//! let sampler = Sampler::new(rate);
//! let _keep = sampler.sample();
//!
//! let deterministic = DeterministicSampler::new(42, rate);
//! assert_eq!(deterministic.sample(), DeterministicSampler::new(42, rate).sample());
//! ```

#![warn(missing_docs)]

mod rate;
mod sampler;

pub use self::rate::*;
pub use self::sampler::*;
