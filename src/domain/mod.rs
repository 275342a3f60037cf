pub mod aligner;
pub mod config;
pub mod financial;
pub mod network_analysis;
pub mod optimizer;
pub mod series;
pub mod simulator;
pub mod topology;
pub mod utils;
