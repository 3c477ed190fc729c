pub mod assertion;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod runner;

// Re-export commonly used types
pub use assertion::Assert;
pub use config::Config;
pub use error::{Result, RutestError, UsageError, UsagePolicy};
pub use runner::ambient::{main, test};
pub use runner::{
    AmbientSuite, Outcome, ReportFormat, Signal, TestContext, TestResult, TestSuite,
};
