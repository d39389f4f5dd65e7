//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each incoming request receives a random `trace_id` stored in task-local
//! storage for correlation across logs and error responses.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`TraceId::scope`] when spawning new tasks or moving work onto blocking
//! threads to ensure the active trace identifier propagates correctly.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tokio::task_local;

use crate::domain::TRACE_ID_HEADER;

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use tabemap_backend::middleware::trace::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(%id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(u128);

impl TraceId {
    fn generate() -> Self {
        Self(rand::random())
    }

    /// Returns the current trace identifier if one is in scope.
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Execute the provided future with the supplied trace identifier in
    /// scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str_radix(s, 16).map(Self)
    }
}

/// Tracing middleware attaching a request-scoped identifier and adding a
/// trace header to every response.
///
/// Handlers can read the trace ID via [`TraceId::current`].
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TraceMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = TraceId::scope(trace_id, fut).await?;
            if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::{web, App, HttpResponse};

    #[rstest::rstest]
    fn trace_ids_render_as_32_hex_chars() {
        let id = TraceId(0xdead_beef);
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.ends_with("deadbeef"));
    }

    #[rstest::rstest]
    fn trace_ids_parse_back_from_hex() {
        let id = TraceId::generate();
        let parsed: TraceId = id.to_string().parse().expect("round trip");
        assert_eq!(parsed, id);
    }

    #[tokio::test]
    async fn current_is_none_outside_a_scope() {
        assert_eq!(TraceId::current(), None);
    }

    #[tokio::test]
    async fn scope_exposes_the_id_to_the_wrapped_future() {
        let id = TraceId(42);
        let observed = TraceId::scope(id, async { TraceId::current() }).await;
        assert_eq!(observed, Some(id));
    }

    #[actix_web::test]
    async fn responses_carry_the_trace_header() {
        let app = actix_web::test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get().uri("/").to_request(),
        )
        .await;

        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }
}
