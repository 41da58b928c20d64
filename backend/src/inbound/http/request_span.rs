//! Middleware running each request inside a `tracing` span.
//!
//! Every request gets a fresh UUID `request_id`. Log events emitted while the
//! handler runs, including the registration service's retry warnings, carry
//! it, and the response echoes it in the `request-id` header.

use std::future::{Ready, ready};
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::LocalBoxFuture;
use tracing::{Instrument, Span, debug, error, field, info_span};
use uuid::Uuid;

/// Response header carrying the request identifier.
pub const REQUEST_ID_HEADER: &str = "request-id";

/// Request span middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use registration::inbound::http::request_span::RequestSpan;
///
/// let _app = App::new().wrap(RequestSpan);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<S, B> Transform<S, ServiceRequest> for RequestSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestSpanMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestSpan`].
pub struct RequestSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "http_request",
            %request_id,
            method = %req.method(),
            path = %req.path(),
            status = field::Empty,
        );
        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                Span::current().record("status", res.status().as_u16());
                match HeaderValue::from_str(&request_id.to_string()) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(%error, "failed to encode request identifier header");
                    }
                }
                debug!("request completed");
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    fn request_id(res: &ServiceResponse) -> Uuid {
        let raw = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("header is ascii");
        Uuid::parse_str(raw).expect("header is a UUID")
    }

    #[rstest]
    #[actix_web::test]
    async fn each_response_carries_a_distinct_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestSpan)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_ne!(request_id(&first), request_id(&second));
    }

    #[rstest]
    #[actix_web::test]
    async fn error_responses_are_tagged_too() {
        let app = test::init_service(App::new().wrap(RequestSpan).route(
            "/",
            web::get().to(|| async {
                Err::<HttpResponse, _>(crate::domain::Error::not_found("missing"))
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
        request_id(&res);
    }
}
