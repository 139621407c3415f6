pub mod expand;
pub mod suite;

pub use expand::*;
pub use suite::*;
