use crate::facade::TracingFacade;
use crate::urls::{get_domain, hash_url};
use opentelemetry::trace::Status;
use opentelemetry::KeyValue;
use std::future::Future;
use std::time::Instant;

/// Execution mode a pipeline step reports on its span, e.g. "cached"
/// or "live". The default reports nothing.
pub trait PipelineOutcome {
    fn mode(&self) -> Option<&str> {
        None
    }
}

impl PipelineOutcome for () {}

impl TracingFacade {
    /// Runs one audit pipeline step under a span named
    /// `audit_pipeline.<step>`. The step's own result is returned
    /// unchanged; errors are recorded on the span and re-raised.
    pub async fn trace_audit_pipeline<F, T, E>(
        &self,
        step: &str,
        job_id: &str,
        url: &str,
        op: F,
    ) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        T: PipelineOutcome,
        E: std::error::Error,
    {
        let mut span = self.create_span(
            &format!("audit_pipeline.{}", step),
            vec![
                KeyValue::new("audit.job_id", job_id.to_string()),
                KeyValue::new("audit.url_hash", hash_url(url)),
                KeyValue::new("audit.domain", get_domain(url)),
            ],
        );
        let start = Instant::now();

        let result = op.await;
        let duration_ms = start.elapsed().as_millis() as i64;

        match &result {
            Ok(outcome) => {
                span.set_attributes([
                    KeyValue::new("duration_ms", duration_ms),
                    KeyValue::new("success", true),
                ]);
                if let Some(mode) = outcome.mode() {
                    span.set_attribute(KeyValue::new("audit.mode", mode.to_string()));
                }
                span.set_status(Status::Ok);
            }
            Err(e) => {
                span.set_attributes([
                    KeyValue::new("duration_ms", duration_ms),
                    KeyValue::new("success", false),
                    KeyValue::new("error.message", e.to_string()),
                ]);
                span.record_error(e);
                span.set_status(Status::error(e.to_string()));
            }
        }

        span.end();
        result
    }
}
