use crate::facade::TracingFacade;
use crate::span::SpanHandle;
use axum::body::Body;
use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use opentelemetry::trace::Status;
use opentelemetry::KeyValue;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Per-request span middleware. Wire it up with
/// `axum::middleware::from_fn_with_state(facade, trace_http)` so it runs
/// on every matched route.
pub async fn trace_http(
    State(facade): State<Arc<TracingFacade>>,
    mut req: Request,
    next: Next,
) -> Response {
    if !facade.enabled() {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let url = req.uri().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| url.clone());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut span = facade.create_span(
        &format!("http.{}", method),
        vec![
            KeyValue::new("http.method", method),
            KeyValue::new("http.url", url),
            KeyValue::new("http.route", route),
            KeyValue::new("http.user_agent", user_agent),
            KeyValue::new("http.client_ip", client_ip),
        ],
    );

    // Handlers can correlate their own telemetry with this request.
    if let Some(cx) = span.span_context() {
        req.extensions_mut().insert(cx);
    }

    let response = next.run(req).await;

    let status = response.status();
    span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));
    if let Some(size) = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
    {
        span.set_attribute(KeyValue::new("http.response_size", size));
    }

    if status.as_u16() >= 400 {
        span.set_status(Status::error(format!("HTTP {}", status.as_u16())));
    } else {
        span.set_status(Status::Ok);
    }

    // The span stays open until the response body finishes streaming.
    response.map(|body| {
        Body::new(TracedBody {
            inner: body,
            span: Some(span),
        })
    })
}

struct TracedBody {
    inner: Body,
    span: Option<SpanHandle>,
}

impl HttpBody for TracedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<std::result::Result<Frame<Bytes>, axum::Error>>> {
        let this = self.get_mut();

        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(None) => {
                if let Some(mut span) = this.span.take() {
                    span.end();
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for TracedBody {
    // Clients that disconnect mid-stream drop the body without an
    // end-of-stream frame; the span must still close exactly once.
    fn drop(&mut self) {
        if let Some(mut span) = self.span.take() {
            span.end();
        }
    }
}
