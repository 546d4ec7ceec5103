//! Infrastructure configuration modules.

pub mod logging;
pub mod optimizer;
pub mod output;
pub mod settings;

pub use logging::LoggingConfig;
pub use optimizer::OptimizerConfig;
pub use output::OutputConfig;
pub use settings::Config;
