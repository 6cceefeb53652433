//! Whole pipelines, run over streams

use rill_pipeline::{
	online_trace, parallel, then, FilterStage, FuncStage, Pipeline, Record, Stage, StageRef,
	Value,
};

use crate::{
	feature::{StandardScaler, TargetRollingMean},
	metrics::Mae,
	model::{LinearRegression, MeanRegressor},
	optim::InverseScalingLr,
};

fn sales(n: usize) -> Vec<(Record, f64)> {
	(0..n)
		.map(|i| {
			let store = ["s1", "s2", "s3"][i % 3];
			let day = i64::try_from(i % 7).unwrap();
			let y = 10.0 + 2.0 * day as f64 + if store == "s2" { 5.0 } else { 0.0 };
			(
				Record::from([
					("store_id", Value::from(store)),
					("day", Value::Integer(day)),
					("on_promotion", Value::Boolean(i % 5 == 0)),
				]),
				y,
			)
		})
		.collect()
}

fn model() -> Pipeline {
	let features = parallel(
		TargetRollingMean::new("store_id", 7).unwrap(),
		FuncStage::with_name("weekend", |r: &Record| {
			let day = r.get_f64("day").unwrap_or(0.0);
			Record::from([("weekend", day >= 5.0)])
		})
		.unwrap(),
	)
	.unwrap();

	return then(features, FilterStage::new(["store_id"]))
		.unwrap()
		.then(StandardScaler::new())
		.unwrap()
		.then(LinearRegression::new().with_lr(InverseScalingLr {
			lr: 0.1,
			power: 0.25,
		}))
		.unwrap();
}

#[test]
fn rolling_mean_never_sees_current_target() {
	let rolling = StageRef::new(TargetRollingMean::new("group", 2).unwrap());
	let mut p = then(&rolling, MeanRegressor::new()).unwrap();
	let feature = "target_rolling_2_mean_by_group";

	let record = Record::from([("group", "s1")]);
	let mut predictions = Vec::new();
	let mut features = Vec::new();

	for target in [10.0, 20.0, 30.0] {
		features.push(rolling.transform_one(&record).unwrap().get_f64(feature).unwrap());
		predictions.push(p.predict_one(&record).unwrap());
		p.fit_one(&record, target).unwrap();
	}

	assert_eq!(features, vec![0.0, 10.0, 15.0]);
	assert_eq!(predictions, vec![0.0, 10.0, 15.0]);
}

#[test]
fn fresh_pipelines_score_identically() {
	let a = online_trace(sales(200), &mut model(), &mut Mae::new()).unwrap();
	let b = online_trace(sales(200), &mut model(), &mut Mae::new()).unwrap();

	assert_eq!(a.predictions.len(), 200);
	assert_eq!(a, b);
}

#[test]
fn composite_structure() {
	let p = model();
	assert_eq!(
		p.name().as_str(),
		"target_rolling_7_mean_by_store_id + weekend | ~[store_id] | standard_scaler | linear_regression"
	);
	assert_eq!(p.len(), 4);
	assert_eq!(p.graph().len_nodes(), 7);
	assert!(p.predict_one(&sales(1)[0].0).is_ok());
}

#[test]
fn model_learns() {
	let trace = online_trace(sales(3000), &mut model(), &mut Mae::new()).unwrap();

	let early = trace.scores[99];
	let late = trace.last().unwrap();
	assert!(late < early, "early = {early}, late = {late}");
}

#[test]
fn stages_report_their_names() {
	assert_eq!(MeanRegressor::new().name().as_str(), "mean_regressor");
	assert_eq!(StandardScaler::new().name().as_str(), "standard_scaler");
	assert_eq!(LinearRegression::new().name().as_str(), "linear_regression");
}

#[test]
fn scaled_values_survive_a_union() {
	let scaler = StageRef::new(StandardScaler::new());
	let mut features = parallel(&scaler, TargetRollingMean::new("store", 2).unwrap()).unwrap();
	for x in [1.0, 3.0, 8.0] {
		let record = Record::from([("x", Value::Float(x)), ("store", Value::from("a"))]);
		features.fit_one(&record, x).unwrap();
	}

	let record = Record::from([("x", Value::Float(3.0)), ("store", Value::from("a"))]);
	let scaled = scaler.transform_one(&record).unwrap().get_f64("x").unwrap();
	let out = features.transform_one(&record).unwrap();

	assert!(scaled < 0.0);
	assert_eq!(out.get_f64("x"), Ok(scaled));
	assert_eq!(out.get_f64("target_rolling_2_mean_by_store"), Ok(5.5));
	assert_eq!(out.get("store"), Some(&Value::from("a")));
}
