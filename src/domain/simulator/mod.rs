pub mod leaky_bucket;

pub use leaky_bucket::{LeakyBucket, SimulationResult, drop_rate, simulate};
