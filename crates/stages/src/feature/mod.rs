//! Transformers

mod rolling;
mod scale;

pub use rolling::TargetRollingMean;
pub use scale::StandardScaler;
