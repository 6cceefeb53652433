//! Predictors

mod linear;
mod mean;

pub use linear::LinearRegression;
pub use mean::MeanRegressor;
