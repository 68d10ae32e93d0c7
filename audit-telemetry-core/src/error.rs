use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("OTLP trace exporter: {0}")]
    TraceExporter(String),

    #[error("OTLP metric exporter: {0}")]
    MetricExporter(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Classification reported on failed spans as the `error.kind` attribute.
pub trait ErrorKind: std::error::Error {
    /// Stable identifier for the error category.
    fn kind(&self) -> &str;
}

impl ErrorKind for TelemetryError {
    fn kind(&self) -> &str {
        match self {
            TelemetryError::Config(_) => "config",
            TelemetryError::TraceExporter(_) => "trace_exporter",
            TelemetryError::MetricExporter(_) => "metric_exporter",
        }
    }
}
