//! Stages, metrics and optimizers to compose with `rill-pipeline`

pub mod feature;
pub mod metrics;
pub mod model;
pub mod optim;
pub mod stats;

#[cfg(test)]
mod tests;
