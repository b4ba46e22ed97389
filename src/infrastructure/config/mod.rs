//! Infrastructure configuration modules.

pub mod allocation;
pub mod logging;
pub mod settings;

pub use allocation::AllocationConfig;
pub use logging::LoggingConfig;
pub use settings::Config;
