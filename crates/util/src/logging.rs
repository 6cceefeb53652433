use serde::Deserialize;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
	Trace,
	Debug,
	#[default]
	Info,
	Warn,
	Error,
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Trace => write!(f, "trace"),
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
		}
	}
}

/// A named set of log levels, selectable from config.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingPreset {
	#[default]
	Default,
	Verbose,
	Develop,
	Trace,
}

impl LoggingPreset {
	pub fn get_config(&self) -> LoggingConfig {
		match self {
			Self::Default => LoggingConfig {
				other: LogLevel::Warn,
				pipeline: LogLevel::Warn,
				evaluate: LogLevel::Info,
				stages: LogLevel::Warn,
				replay: LogLevel::Info,
			},

			Self::Verbose => LoggingConfig {
				other: LogLevel::Warn,
				pipeline: LogLevel::Info,
				evaluate: LogLevel::Debug,
				stages: LogLevel::Warn,
				replay: LogLevel::Debug,
			},

			Self::Develop => LoggingConfig {
				other: LogLevel::Debug,
				pipeline: LogLevel::Debug,
				evaluate: LogLevel::Debug,
				stages: LogLevel::Debug,
				replay: LogLevel::Trace,
			},

			Self::Trace => LoggingConfig {
				other: LogLevel::Trace,
				pipeline: LogLevel::Trace,
				evaluate: LogLevel::Trace,
				stages: LogLevel::Trace,
				replay: LogLevel::Trace,
			},
		}
	}
}

pub struct LoggingConfig {
	other: LogLevel,

	pipeline: LogLevel,
	evaluate: LogLevel,
	stages: LogLevel,

	replay: LogLevel,
}

impl LoggingConfig {
	/// The filter directives for this config, in `EnvFilter` syntax.
	pub fn directives(&self) -> String {
		return [
			// More specific directives must come first
			format!("rill_pipeline::evaluate={}", self.evaluate),
			format!("rill_pipeline={}", self.pipeline),
			format!("rill_stages={}", self.stages),
			format!("rill_replay={}", self.replay),
			self.other.to_string(),
		]
		.join(",");
	}
}

impl From<LoggingConfig> for EnvFilter {
	fn from(value: LoggingConfig) -> Self {
		EnvFilter::builder().parse_lossy(value.directives())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_preset_directives() {
		let d = LoggingPreset::Default.get_config().directives();
		assert_eq!(
			d,
			"rill_pipeline::evaluate=info,rill_pipeline=warn,rill_stages=warn,rill_replay=info,warn"
		);
	}

	#[test]
	fn trace_preset_traces_everything() {
		let d = LoggingPreset::Trace.get_config().directives();
		assert!(d.split(',').all(|x| x.ends_with("trace")));
	}
}
