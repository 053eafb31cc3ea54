pub mod benchmarks;
pub mod instance_reader;

pub use benchmarks::*;
pub use instance_reader::*;
