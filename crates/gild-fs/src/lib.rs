pub mod copy;
pub mod memory;
pub mod os;
pub mod traits;

pub use copy::*;
pub use memory::*;
pub use os::*;
pub use traits::*;
