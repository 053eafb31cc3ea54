pub mod neighbourhood;
pub mod optimizer;
pub mod search;

pub use neighbourhood::*;
pub use optimizer::*;
pub use search::*;
