use rill_util::logging::LoggingPreset;
use serde::Deserialize;

/// Note that the field of this struct are not capitalized.
/// Envy is case-insensitive, and expects Rust fields to be snake_case.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
	/// The logging level to run with
	#[serde(default)]
	pub replay_loglevel: LoggingPreset,

	/// How many records to replay
	#[serde(default = "ReplayConfig::default_records")]
	pub replay_records: usize,

	/// How many stores to simulate.
	/// Every day produces one record per store.
	#[serde(default = "ReplayConfig::default_stores")]
	pub replay_stores: usize,

	/// How many past targets the per-store rolling mean remembers
	#[serde(default = "ReplayConfig::default_window")]
	pub replay_window: usize,

	/// Seed for the synthetic stream.
	/// The same seed always produces the same stream.
	#[serde(default = "ReplayConfig::default_seed")]
	pub replay_seed: u64,

	/// Initial learning rate of the regression
	#[serde(default = "ReplayConfig::default_learning_rate")]
	pub replay_learning_rate: f64,

	/// Log progress every this many records
	#[serde(default = "ReplayConfig::default_log_every")]
	pub replay_log_every: usize,
}

impl ReplayConfig {
	fn default_records() -> usize {
		10_000
	}

	fn default_stores() -> usize {
		10
	}

	fn default_window() -> usize {
		7
	}

	fn default_seed() -> u64 {
		42
	}

	fn default_learning_rate() -> f64 {
		0.1
	}

	fn default_log_every() -> usize {
		1000
	}
}
