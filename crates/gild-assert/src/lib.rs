pub mod engine;
pub mod line_diff;
pub mod orchestrator;
pub mod resolve;
pub mod structural;

pub use engine::*;
pub use line_diff::*;
pub use orchestrator::*;
pub use resolve::*;
pub use structural::*;
