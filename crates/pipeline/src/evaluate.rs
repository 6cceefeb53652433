//! Progressive validation over a stream

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{errors::StageError, pipeline::Pipeline, record::Record};

/// A running score, updated one prediction at a time
pub trait Metric {
	/// Fold one (target, prediction) pair into this metric
	fn update(&mut self, y_true: f64, y_pred: f64);

	/// The current value of this metric
	fn get(&self) -> f64;

	fn name(&self) -> &str;

	/// Render this metric as `name: value`
	fn report(&self) -> String {
		format!("{}: {:.6}", self.name(), self.get())
	}
}

/// Options for [`online_score_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineScoreConfig {
	/// Log progress every this many records.
	/// `None` disables progress logging.
	pub log_every: Option<usize>,
}

impl Default for OnlineScoreConfig {
	fn default() -> Self {
		Self {
			log_every: Some(1000),
		}
	}
}

/// The per-record history of an evaluation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTrace {
	/// The prediction made for each record, before its target was seen
	pub predictions: Vec<f64>,

	/// The metric's value after each record
	pub scores: Vec<f64>,
}

impl ScoreTrace {
	/// The metric's value after the last record
	pub fn last(&self) -> Option<f64> {
		self.scores.last().copied()
	}
}

/// Score `pipeline` on `stream` with progressive validation.
///
/// For every record, the pipeline first predicts its target,
/// `metric` is updated with that prediction, and only then is the
/// pipeline fit on the record and its true target.
///
/// Returns the metric's final value. The first error aborts the stream.
pub fn online_score<M: Metric>(
	stream: impl IntoIterator<Item = (Record, f64)>,
	pipeline: &mut Pipeline,
	metric: &mut M,
) -> Result<f64, StageError> {
	return online_score_with(stream, pipeline, metric, OnlineScoreConfig::default());
}

/// [`online_score`], with options
pub fn online_score_with<M: Metric>(
	stream: impl IntoIterator<Item = (Record, f64)>,
	pipeline: &mut Pipeline,
	metric: &mut M,
	config: OnlineScoreConfig,
) -> Result<f64, StageError> {
	run(stream, pipeline, metric, config, |_, _| {})?;
	return Ok(metric.get());
}

/// [`online_score`], keeping every prediction and intermediate score.
pub fn online_trace<M: Metric>(
	stream: impl IntoIterator<Item = (Record, f64)>,
	pipeline: &mut Pipeline,
	metric: &mut M,
) -> Result<ScoreTrace, StageError> {
	let mut trace = ScoreTrace::default();
	run(
		stream,
		pipeline,
		metric,
		OnlineScoreConfig { log_every: None },
		|y_pred, score| {
			trace.predictions.push(y_pred);
			trace.scores.push(score);
		},
	)?;
	return Ok(trace);
}

fn run<M: Metric>(
	stream: impl IntoIterator<Item = (Record, f64)>,
	pipeline: &mut Pipeline,
	metric: &mut M,
	config: OnlineScoreConfig,
	mut on_record: impl FnMut(f64, f64),
) -> Result<(), StageError> {
	let mut n_records = 0usize;

	for (record, y_true) in stream {
		let y_pred = pipeline.predict_one(&record)?;
		metric.update(y_true, y_pred);
		pipeline.fit_one(&record, y_true)?;

		n_records += 1;
		on_record(y_pred, metric.get());

		if let Some(every) = config.log_every {
			if every != 0 && n_records % every == 0 {
				debug!(
					message = "Evaluation progress",
					records = n_records,
					metric = metric.name(),
					value = metric.get()
				);
			}
		}
	}

	info!(
		message = "Evaluation finished",
		pipeline = %pipeline.name(),
		records = n_records,
		metric = metric.name(),
		value = metric.get()
	);

	return Ok(());
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		compose::then,
		errors::SchemaError,
		stage::StageRoles,
		testing::{Event, EventLog, Memory, RunningSum},
	};

	/// Sum of absolute errors
	#[derive(Default)]
	struct TotalError(f64);

	impl Metric for TotalError {
		fn update(&mut self, y_true: f64, y_pred: f64) {
			self.0 += (y_true - y_pred).abs();
		}

		fn get(&self) -> f64 {
			self.0
		}

		fn name(&self) -> &str {
			"total_error"
		}
	}

	fn stream() -> Vec<(Record, f64)> {
		vec![
			(Record::from([("x", 0.0)]), 1.0),
			(Record::from([("x", 0.0)]), 2.0),
			(Record::from([("x", 0.0)]), 4.0),
		]
	}

	#[test]
	fn predicts_before_fitting() {
		let log = EventLog::new();
		let mut p = then(
			log.stage("features", StageRoles::TRANSFORMER),
			log.stage("model", StageRoles::PREDICTOR),
		)
		.unwrap();

		online_score(stream().into_iter().take(1), &mut p, &mut TotalError::default()).unwrap();
		assert_eq!(
			log.take(),
			vec![
				Event::Transform("features"),
				Event::Predict("model"),
				Event::Transform("features"),
				Event::Fit("features"),
				Event::Fit("model"),
			]
		);
	}

	#[test]
	fn predictions_never_see_their_own_target() {
		let mut p = Pipeline::new().then(RunningSum::new("sum")).unwrap();

		let trace = online_trace(stream(), &mut p, &mut TotalError::default()).unwrap();
		assert_eq!(trace.predictions, vec![0.0, 1.0, 3.0]);
		assert_eq!(trace.scores, vec![1.0, 2.0, 3.0]);
		assert_eq!(trace.last(), Some(3.0));
	}

	#[test]
	fn fresh_pipelines_give_identical_trajectories() {
		let run = || {
			let mut p = then(Memory::new("memory", "last"), RunningSum::new("sum")).unwrap();
			online_trace(stream(), &mut p, &mut TotalError::default()).unwrap()
		};

		assert_eq!(run(), run());
	}

	#[test]
	fn errors_abort_the_stream() {
		let mut metric = TotalError::default();
		let mut p = Pipeline::new().then(RunningSum::new("sum")).unwrap();

		let s = vec![
			(Record::from([("x", 0.0)]), 1.0),
			(Record::from([("x", "oops")]), 2.0),
			(Record::from([("x", 0.0)]), 4.0),
		];

		assert_eq!(
			online_score(s, &mut p, &mut metric),
			Err(SchemaError::BadFieldType {
				field: "x".into(),
				expected: "number",
				found: "text",
			}
			.into())
		);
		assert_eq!(metric.get(), 1.0);
	}

	#[test]
	fn report_format() {
		let mut m = TotalError::default();
		m.update(1.0, 0.5);
		assert_eq!(m.report(), "total_error: 0.500000");
	}
}
