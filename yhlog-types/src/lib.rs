pub mod error;
pub mod mode;
pub mod serial;
pub mod tenths;
pub mod yh550;
pub mod yh580;

pub use error::*;
pub use mode::*;
pub use serial::*;
pub use tenths::*;
pub use yh550::*;
pub use yh580::*;
