pub mod ai;
pub mod calculators;
pub mod conditions;
pub mod engine;
pub mod registry;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
pub(crate) mod tests;
