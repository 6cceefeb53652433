//! A synthetic stream of daily sales

use rand::{rngs::StdRng, Rng, SeedableRng};
use rill_pipeline::{Record, Value};
use time::{Date, Duration, Month, OffsetDateTime};

/// Generates one record per store per day, in date order.
///
/// Each store sells a different base amount. Sales are higher late in
/// the week and on promotion days, with some uniform noise on top.
pub struct SalesStream {
	rng: StdRng,
	start: OffsetDateTime,
	stores: usize,

	day: i64,
	store: usize,
}

impl SalesStream {
	pub fn new(seed: u64, stores: usize) -> Result<Self, time::error::ComponentRange> {
		let start = Date::from_calendar_date(2024, Month::January, 1)?
			.midnight()
			.assume_utc();

		return Ok(Self {
			rng: StdRng::seed_from_u64(seed),
			start,
			stores,
			day: 0,
			store: 0,
		});
	}
}

impl Iterator for SalesStream {
	type Item = (Record, f64);

	fn next(&mut self) -> Option<Self::Item> {
		if self.stores == 0 {
			return None;
		}

		let date = self.start + Duration::days(self.day);
		let weekday = f64::from(date.weekday().number_days_from_monday());
		let on_promotion = self.rng.gen_bool(0.2);

		let base = 20.0 + 5.0 * self.store as f64;
		let target = base
			+ 1.5 * weekday
			+ if on_promotion { 8.0 } else { 0.0 }
			+ self.rng.gen_range(-2.0..2.0);

		let record = Record::from([
			("store_id", Value::from(format!("s{}", self.store).as_str())),
			("day", Value::Integer(self.day)),
			("on_promotion", Value::Boolean(on_promotion)),
			("date", Value::Timestamp(date)),
		]);

		self.store += 1;
		if self.store == self.stores {
			self.store = 0;
			self.day += 1;
		}

		return Some((record, target));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_seed_same_stream() {
		let a: Vec<_> = SalesStream::new(7, 3).unwrap().take(50).collect();
		let b: Vec<_> = SalesStream::new(7, 3).unwrap().take(50).collect();
		assert_eq!(a, b);
	}

	#[test]
	fn one_record_per_store_per_day() {
		let days: Vec<_> = SalesStream::new(0, 3)
			.unwrap()
			.take(6)
			.map(|(r, _)| (r.get("store_id").cloned(), r.get("day").cloned()))
			.collect();

		assert_eq!(
			days,
			vec![
				(Some(Value::from("s0")), Some(Value::Integer(0))),
				(Some(Value::from("s1")), Some(Value::Integer(0))),
				(Some(Value::from("s2")), Some(Value::Integer(0))),
				(Some(Value::from("s0")), Some(Value::Integer(1))),
				(Some(Value::from("s1")), Some(Value::Integer(1))),
				(Some(Value::from("s2")), Some(Value::Integer(1))),
			]
		);
	}

	#[test]
	fn no_stores_no_records() {
		assert_eq!(SalesStream::new(0, 0).unwrap().count(), 0);
	}
}
