pub mod genres;
pub mod recommend;
pub mod scoring;

#[cfg(test)]
mod scoring_tests;

pub use genres::*;
pub use recommend::*;
pub use scoring::*;
