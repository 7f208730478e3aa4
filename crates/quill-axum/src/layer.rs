//! Tower middleware layer for bearer-token authentication.
//!
//! The [`AuthLayer`] validates the `Authorization` header of each request and
//! attaches an [`AuthContext`] for the extractors to read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use pin_project_lite::pin_project;
use quill_auth_core::TokenValidator;
use tower::{Layer, Service};

use crate::context::AuthContext;
use crate::error::GateError;
use crate::extractors::AuthContextExt;

/// How the gate treats requests without a valid credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Reject with 401 before the inner service runs.
    Required,
    /// Continue as an anonymous caller.
    Optional,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme keyword must match exactly. Anything else counts as no
/// credential.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

/// Tower layer that adds bearer-token authentication to requests.
#[derive(Clone)]
pub struct AuthLayer {
    validator: Arc<TokenValidator>,
    mode: GateMode,
}

impl AuthLayer {
    /// Create a layer with the given validator and mode.
    #[must_use]
    pub fn new(validator: Arc<TokenValidator>, mode: GateMode) -> Self {
        Self { validator, mode }
    }

    /// Gate that rejects unauthenticated requests.
    #[must_use]
    pub fn required(validator: Arc<TokenValidator>) -> Self {
        Self::new(validator, GateMode::Required)
    }

    /// Gate that lets unauthenticated requests through anonymously.
    #[must_use]
    pub fn optional(validator: Arc<TokenValidator>) -> Self {
        Self::new(validator, GateMode::Optional)
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthGate {
            inner,
            validator: Arc::clone(&self.validator),
            mode: self.mode,
        }
    }
}

/// The authentication gate service.
#[derive(Clone)]
pub struct AuthGate<S> {
    inner: S,
    validator: Arc<TokenValidator>,
    mode: GateMode,
}

impl<S> AuthGate<S> {
    /// Validate the request's credential, if any.
    ///
    /// Token failure causes are logged here and never leave this function.
    fn authenticate(&self, req: &Request<Body>) -> Result<AuthContext, GateError> {
        let Some(token) = bearer_token(req.headers()) else {
            tracing::debug!(path = %req.uri().path(), "No bearer credential");
            return Err(GateError::Unauthenticated);
        };

        self.validator
            .validate(token)
            .map(|claims| AuthContext::from_claims(&claims))
            .map_err(|e| {
                tracing::debug!(path = %req.uri().path(), cause = %e, "Bearer token rejected");
                GateError::from(e)
            })
    }
}

impl<S> Service<Request<Body>> for AuthGate<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = AuthGateFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        match (self.authenticate(&req), self.mode) {
            (Ok(ctx), _) => {
                req.extensions_mut().insert(AuthContextExt(ctx));
            }
            (Err(rejection), GateMode::Required) => {
                return AuthGateFuture {
                    state: FutureState::Rejected {
                        response: Some(rejection.into_response()),
                    },
                };
            }
            (Err(_), GateMode::Optional) => {}
        }

        // The clone may not be ready; call the instance that was polled
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        AuthGateFuture {
            state: FutureState::Calling {
                future: inner.call(req),
            },
        }
    }
}

pin_project! {
    /// Future for the [`AuthGate`] service.
    pub struct AuthGateFuture<F> {
        #[pin]
        state: FutureState<F>,
    }
}

pin_project! {
    #[project = FutureStateProj]
    enum FutureState<F> {
        Rejected {
            response: Option<Response>,
        },
        Calling {
            #[pin]
            future: F,
        },
    }
}

impl<F, E> Future for AuthGateFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            FutureStateProj::Rejected { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("AuthGateFuture polled after completion"),
            },
            FutureStateProj::Calling { future } => future.poll(cx),
        }
    }
}
