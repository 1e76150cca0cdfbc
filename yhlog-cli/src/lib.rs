pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod metrics;
pub mod pipeline;
pub mod report;

pub use config::*;
pub use discovery::*;
pub use error::*;
pub use metrics::*;
pub use pipeline::*;
