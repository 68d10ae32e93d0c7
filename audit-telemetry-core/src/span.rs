use opentelemetry::trace::{Span as _, SpanContext, Status};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::Span;

/// Handle over one exported span. `Noop` stands in when tracing is
/// disabled so call sites never branch on span presence.
pub enum SpanHandle {
    Active(Span),
    Noop,
}

impl SpanHandle {
    pub fn is_noop(&self) -> bool {
        matches!(self, SpanHandle::Noop)
    }

    pub fn set_attribute(&mut self, attribute: KeyValue) {
        if let SpanHandle::Active(span) = self {
            span.set_attribute(attribute);
        }
    }

    pub fn set_attributes(&mut self, attributes: impl IntoIterator<Item = KeyValue>) {
        if let SpanHandle::Active(span) = self {
            span.set_attributes(attributes);
        }
    }

    pub fn set_status(&mut self, status: Status) {
        if let SpanHandle::Active(span) = self {
            span.set_status(status);
        }
    }

    pub fn record_error(&mut self, err: &dyn std::error::Error) {
        if let SpanHandle::Active(span) = self {
            span.record_error(err);
        }
    }

    pub fn span_context(&self) -> Option<SpanContext> {
        match self {
            SpanHandle::Active(span) => Some(span.span_context().clone()),
            SpanHandle::Noop => None,
        }
    }

    /// Finalizes the span. The exporter also ends unfinished spans on
    /// drop, so an aborted operation never leaks an open span.
    pub fn end(&mut self) {
        if let SpanHandle::Active(span) = self {
            span.end();
        }
    }
}
