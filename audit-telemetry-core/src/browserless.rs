use crate::error::ErrorKind;
use crate::facade::TracingFacade;
use crate::urls::hash_url;
use opentelemetry::trace::Status;
use opentelemetry::KeyValue;
use std::future::Future;
use std::time::Instant;

impl TracingFacade {
    /// Runs one headless-browser call under a span named
    /// `browserless.<operation>`, tagged with the configured websocket
    /// endpoint. Errors carry their `error.kind` classification.
    pub async fn trace_browserless_operation<F, T, E>(
        &self,
        operation: &str,
        url: &str,
        op: F,
    ) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: ErrorKind,
    {
        let mut span = self.create_span(
            &format!("browserless.{}", operation),
            vec![
                KeyValue::new("browserless.operation", operation.to_string()),
                KeyValue::new("browserless.url_hash", hash_url(url)),
                KeyValue::new("browserless.endpoint", self.browserless_endpoint().to_string()),
            ],
        );
        let start = Instant::now();

        let result = op.await;
        let duration_ms = start.elapsed().as_millis() as i64;

        match &result {
            Ok(_) => {
                span.set_attributes([
                    KeyValue::new("duration_ms", duration_ms),
                    KeyValue::new("success", true),
                ]);
                span.set_status(Status::Ok);
            }
            Err(e) => {
                span.set_attributes([
                    KeyValue::new("duration_ms", duration_ms),
                    KeyValue::new("success", false),
                    KeyValue::new("error.message", e.to_string()),
                    KeyValue::new("error.kind", e.kind().to_string()),
                ]);
                span.record_error(e);
                span.set_status(Status::error(e.to_string()));
            }
        }

        span.end();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::Value;
    use opentelemetry_sdk::export::trace::SpanData;
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::TracerProvider;
    use thiserror::Error;

    #[derive(Error, Debug)]
    enum BrowserError {
        #[error("navigation timed out after {0}ms")]
        NavigationTimeout(u64),
        #[error("websocket closed: {0}")]
        ConnectionLost(String),
    }

    impl ErrorKind for BrowserError {
        fn kind(&self) -> &str {
            match self {
                BrowserError::NavigationTimeout(_) => "navigation_timeout",
                BrowserError::ConnectionLost(_) => "connection_lost",
            }
        }
    }

    fn facade_with(exporter: &InMemorySpanExporter) -> TracingFacade {
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        TracingFacade::for_tests(Some(provider), None)
    }

    fn attr<'a>(span: &'a SpanData, key: &str) -> Option<&'a Value> {
        span.attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }

    #[tokio::test]
    async fn test_success_tags_the_endpoint() {
        let exporter = InMemorySpanExporter::default();
        let facade = facade_with(&exporter);

        let result = facade
            .trace_browserless_operation("screenshot", "https://example.com", async {
                Ok::<_, BrowserError>(vec![0u8; 16])
            })
            .await;
        assert_eq!(result.unwrap().len(), 16);

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);

        let span = &spans[0];
        assert_eq!(span.name, "browserless.screenshot");
        assert!(matches!(span.status, Status::Ok));
        assert_eq!(attr(span, "success"), Some(&Value::Bool(true)));
        assert_eq!(
            attr(span, "browserless.operation").unwrap().as_str(),
            "screenshot"
        );
        assert_eq!(
            attr(span, "browserless.endpoint").unwrap().as_str(),
            "ws://browserless:3000"
        );
    }

    #[tokio::test]
    async fn test_failure_records_error_kind_and_reraises() {
        let exporter = InMemorySpanExporter::default();
        let facade = facade_with(&exporter);

        let result: std::result::Result<Vec<u8>, BrowserError> = facade
            .trace_browserless_operation("pdf", "https://example.com/report", async {
                Err(BrowserError::NavigationTimeout(30_000))
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, BrowserError::NavigationTimeout(30_000)));

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);

        let span = &spans[0];
        assert!(matches!(span.status, Status::Error { .. }));
        assert_eq!(attr(span, "success"), Some(&Value::Bool(false)));
        assert_eq!(
            attr(span, "error.kind").unwrap().as_str(),
            "navigation_timeout"
        );
        assert_eq!(
            attr(span, "error.message").unwrap().as_str(),
            "navigation timed out after 30000ms"
        );
    }

    #[test]
    fn test_error_kind_per_variant() {
        assert_eq!(
            BrowserError::ConnectionLost("reset".to_string()).kind(),
            "connection_lost"
        );
        assert_eq!(BrowserError::NavigationTimeout(5).kind(), "navigation_timeout");
    }
}
