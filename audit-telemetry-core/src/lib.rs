pub mod audit;
pub mod browserless;
pub mod config;
pub mod error;
pub mod facade;
pub mod metrics;
pub mod middleware;
pub mod span;
pub mod urls;

pub use audit::PipelineOutcome;
pub use config::TelemetryConfig;
pub use error::{ErrorKind, Result, TelemetryError};
pub use facade::{global_facade, init_global, shutdown_global, TracingFacade};
pub use span::SpanHandle;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,audit_telemetry_core=debug"))
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
