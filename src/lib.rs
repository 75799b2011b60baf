pub mod config;
pub mod error;
pub mod executor;
pub mod harvest;
pub mod model;
pub mod traits;
pub mod transport;

// Re-export common types for convenience
pub use config::*;
pub use error::*;
pub use executor::*;
pub use harvest::{CommentHarvester, HarvestOptions};
pub use model::*;
pub use traits::*;
pub use transport::*;
