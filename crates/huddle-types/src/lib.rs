pub mod app;
pub mod error;

// Re-export common types
pub use app::AppDescriptor;
pub use error::{HostError, Result};
