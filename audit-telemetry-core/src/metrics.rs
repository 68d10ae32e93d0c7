use crate::facade::TracingFacade;
use opentelemetry::metrics::MeterProvider as _;
use opentelemetry::KeyValue;

impl TracingFacade {
    /// Adds `value` to a counter named `metric_name`. The SDK reuses the
    /// instrument when the same name is requested again. No-op when
    /// tracing is disabled.
    pub fn record_metric(
        &self,
        span_name: &str,
        metric_name: &str,
        value: f64,
        attributes: &[KeyValue],
    ) {
        let Some(provider) = self.meter_provider() else {
            return;
        };

        let scope =
            opentelemetry::InstrumentationScope::builder(self.service_name().to_string()).build();
        let meter = provider.meter_with_scope(scope);
        let counter = meter
            .f64_counter(metric_name.to_string())
            .with_description(format!("Counter for {}", span_name))
            .build();

        counter.add(value, attributes);
    }
}
