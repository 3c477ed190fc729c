pub mod ambient;
pub mod case;
pub mod context;
pub mod reporter;
pub mod signal;
pub mod suite;
pub mod types;

pub use ambient::{AmbientPhase, AmbientReport, AmbientSuite};
pub use case::{TestCase, TestFn, TestFnResult, TestRun};
pub use context::TestContext;
pub use reporter::{ReportFormat, TestReporter, render};
pub use signal::{Completion, Signal};
pub use suite::TestSuite;
pub use types::{Outcome, TestResult, TestSummary};
