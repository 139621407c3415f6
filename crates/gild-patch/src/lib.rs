pub mod capability;
pub mod error;
pub mod pipeline;

pub use capability::*;
pub use error::*;
pub use pipeline::*;
