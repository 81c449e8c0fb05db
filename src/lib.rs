// Tremor Detection Core - motion signal analysis engine
// Accelerometer stream processing with per-session DSP pipelines

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod manager;
pub mod pipeline;
pub mod sample;
pub mod session;

// Re-exports for convenience
pub use analysis::classifier::{Classification, Severity};
pub use analysis::features::FeatureVector;
pub use analysis::WindowResult;
pub use config::AppConfig;
pub use error::{AnalysisError, ErrorCode, SessionError};
pub use manager::SessionManager;
pub use pipeline::TremorPipeline;
pub use sample::Sample;
pub use session::{SessionState, SessionSummary};

/// Initialize logging for binaries and embedders
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
