//! The pipeline we replay

use rill_pipeline::{parallel, then, FilterStage, FuncStage, Pipeline, Record, StageError, Value};
use rill_stages::{
	feature::{StandardScaler, TargetRollingMean},
	model::LinearRegression,
	optim::InverseScalingLr,
};

use crate::config::ReplayConfig;

/// Weekday of `date`, from 0 (Monday) to 6.
/// Records without a date get no weekday.
fn day_of_week(record: &Record) -> Record {
	match record.get("date") {
		Some(Value::Timestamp(date)) => Record::from([(
			"day_of_week",
			Value::Integer(date.weekday().number_days_from_monday().into()),
		)]),
		_ => Record::new(),
	}
}

/// Promotions as a number, since regressions ignore booleans
fn promotion(record: &Record) -> Record {
	let promo = record.get_f64("on_promotion").unwrap_or(0.0);
	return Record::from([("promotion", promo)]);
}

/// `rolling mean + day_of_week + promotion | ~[date, store_id] | scaler | regression`
pub fn build(config: &ReplayConfig) -> Result<Pipeline, StageError> {
	let features = parallel(
		TargetRollingMean::new("store_id", config.replay_window)?,
		FuncStage::new(day_of_week),
	)?
	.parallel(FuncStage::new(promotion))?;

	let model = LinearRegression::new().with_lr(InverseScalingLr {
		lr: config.replay_learning_rate,
		power: 0.25,
	});

	return then(features, FilterStage::new(["store_id", "date"]))?
		.then(StandardScaler::new())?
		.then(model);
}

#[cfg(test)]
mod tests {
	use super::*;
	use time::{Date, Month};

	#[test]
	fn weekday() {
		let monday = Date::from_calendar_date(2024, Month::January, 1)
			.unwrap()
			.midnight()
			.assume_utc();

		let r = Record::from([("date", Value::Timestamp(monday))]);
		assert_eq!(day_of_week(&r), Record::from([("day_of_week", 0)]));
		assert_eq!(day_of_week(&Record::new()), Record::new());
	}
}
