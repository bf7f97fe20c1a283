pub mod bank;
pub mod benchmarks;
pub mod config;
pub mod diagnostics;
pub mod session;
pub mod store;
pub mod vocab;

pub use diagnostics::{DiagnosticReport, generate_report};
pub use session::{ExamEngine, ExamMode, ExamSession};
pub use vocab::{VocabEngine, VocabMode, VocabReport};
