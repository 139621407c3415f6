pub mod errors;
pub mod expand;
pub mod model;
pub mod types;

pub use errors::*;
pub use expand::*;
pub use model::*;
pub use types::*;
