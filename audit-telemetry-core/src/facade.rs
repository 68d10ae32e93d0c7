use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetryError};
use crate::span::SpanHandle;
use once_cell::sync::OnceCell;
use opentelemetry::trace::{Tracer, TracerProvider as _};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{PeriodicReader, SdkMeterProvider},
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions as semconv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

static GLOBAL_FACADE: OnceCell<Arc<TracingFacade>> = OnceCell::new();

pub struct TracingFacade {
    enabled: bool,
    service_name: String,
    service_version: String,
    browserless_endpoint: String,
    tracer_provider: Option<TracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl TracingFacade {
    /// Never fails: any provider initialization error is logged and the
    /// facade falls back to disabled mode.
    pub fn new(config: &TelemetryConfig) -> Self {
        if !config.enable_tracing {
            info!("Tracing disabled");
            return Self::disabled(config);
        }

        match Self::init_providers(config) {
            Ok((tracer_provider, meter_provider)) => {
                info!(
                    "OpenTelemetry initialized for service {} v{}",
                    config.service_name, config.service_version
                );

                Self {
                    enabled: true,
                    service_name: config.service_name.clone(),
                    service_version: config.service_version.clone(),
                    browserless_endpoint: config.browserless_ws.clone(),
                    tracer_provider: Some(tracer_provider),
                    meter_provider: Some(meter_provider),
                }
            }
            Err(e) => {
                error!("Failed to initialize OpenTelemetry, tracing disabled: {}", e);
                Self::disabled(config)
            }
        }
    }

    fn disabled(config: &TelemetryConfig) -> Self {
        Self {
            enabled: false,
            service_name: config.service_name.clone(),
            service_version: config.service_version.clone(),
            browserless_endpoint: config.browserless_ws.clone(),
            tracer_provider: None,
            meter_provider: None,
        }
    }

    fn init_providers(config: &TelemetryConfig) -> Result<(TracerProvider, SdkMeterProvider)> {
        let resource = Resource::new(vec![
            KeyValue::new(semconv::resource::SERVICE_NAME, config.service_name.clone()),
            KeyValue::new(semconv::resource::SERVICE_VERSION, config.service_version.clone()),
            KeyValue::new("deployment.environment", config.deployment_env.clone()),
        ]);

        let metric_exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(&config.otlp_endpoint)
            .with_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| TelemetryError::MetricExporter(e.to_string()))?;

        let reader = PeriodicReader::builder(metric_exporter, runtime::Tokio)
            .with_interval(Duration::from_secs(10))
            .build();

        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource.clone())
            .with_reader(reader)
            .build();

        let span_exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&config.otlp_endpoint)
            .with_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| TelemetryError::TraceExporter(e.to_string()))?;

        let tracer_provider = TracerProvider::builder()
            .with_batch_exporter(span_exporter, runtime::Tokio)
            .with_resource(resource)
            .with_sampler(Sampler::AlwaysOn)
            .with_id_generator(RandomIdGenerator::default())
            .build();

        global::set_tracer_provider(tracer_provider.clone());

        Ok((tracer_provider, meter_provider))
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn service_version(&self) -> &str {
        &self.service_version
    }

    pub fn browserless_endpoint(&self) -> &str {
        &self.browserless_endpoint
    }

    pub(crate) fn meter_provider(&self) -> Option<&SdkMeterProvider> {
        self.meter_provider.as_ref()
    }

    /// Starts a span carrying the caller's attributes plus a base
    /// `operation` attribute. Returns a no-op handle when disabled.
    pub fn create_span(&self, name: &str, attributes: Vec<KeyValue>) -> SpanHandle {
        let Some(provider) = &self.tracer_provider else {
            return SpanHandle::Noop;
        };

        let tracer = provider.tracer(self.service_name.clone());

        let mut attrs = attributes;
        attrs.push(KeyValue::new("operation", name.to_string()));

        let span = tracer
            .span_builder(name.to_string())
            .with_attributes(attrs)
            .start(&tracer);

        SpanHandle::Active(span)
    }

    /// Drains both providers. Failures are logged, never propagated.
    pub fn shutdown(&self) {
        if let Some(mp) = &self.meter_provider {
            if let Err(e) = mp.shutdown() {
                error!("Failed to shutdown meter provider: {:?}", e);
            }
        }

        if let Some(tp) = &self.tracer_provider {
            if let Err(e) = tp.shutdown() {
                error!("Failed to shutdown tracer provider: {:?}", e);
            }
        }

        if self.enabled {
            global::shutdown_tracer_provider();
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        tracer_provider: Option<TracerProvider>,
        meter_provider: Option<SdkMeterProvider>,
    ) -> Self {
        Self {
            enabled: true,
            service_name: "seo-audit-backend".to_string(),
            service_version: "2.1.0".to_string(),
            browserless_endpoint: "ws://browserless:3000".to_string(),
            tracer_provider,
            meter_provider,
        }
    }
}

/// Installs the process-wide facade. Later calls return the instance
/// installed first.
pub fn init_global(config: &TelemetryConfig) -> Arc<TracingFacade> {
    GLOBAL_FACADE
        .get_or_init(|| Arc::new(TracingFacade::new(config)))
        .clone()
}

/// Returns the process-wide facade, constructing it from environment
/// configuration on first access.
pub fn global_facade() -> Arc<TracingFacade> {
    GLOBAL_FACADE
        .get_or_init(|| {
            let config = TelemetryConfig::load().unwrap_or_else(|e| {
                error!("Failed to load telemetry configuration: {}", e);
                TelemetryConfig::default()
            });
            Arc::new(TracingFacade::new(&config))
        })
        .clone()
}

/// Drains the process-wide facade at teardown. Safe to call when it was
/// never initialized.
pub fn shutdown_global() {
    if let Some(facade) = GLOBAL_FACADE.get() {
        facade.shutdown();
    }
}
