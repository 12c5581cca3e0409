pub mod capacity;
pub mod lst;
pub mod target;
pub mod trimester;

pub use capacity::*;
pub use lst::*;
pub use target::*;
pub use trimester::*;
