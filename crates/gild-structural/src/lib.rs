pub mod report;
pub mod tree;

pub use report::*;
pub use tree::*;
