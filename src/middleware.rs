//! Tower middleware that holds requests at the gate.
//!
//! The middleware is decoupled from the limiter behind the [`Gate`] trait:
//! the service only knows it must be admitted before forwarding a request,
//! not how admission is decided. [`crate::RateLimiter`] is the provided
//! implementation.

use crate::error::AcquireError;
use crate::limiter::RateLimiter;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// An admission gate a request must pass before proceeding.
#[async_trait]
pub trait Gate: Send + Sync {
    /// Block until one admission is granted at `priority`.
    async fn admit(&self, priority: u32) -> Result<(), AcquireError>;
}

#[async_trait]
impl Gate for RateLimiter {
    async fn admit(&self, priority: u32) -> Result<(), AcquireError> {
        self.acquire_priority(priority).await
    }
}

/// Error returned by a gated service.
#[derive(Debug)]
pub enum GateError<E> {
    /// The gate did not admit the request before its deadline.
    Rejected(AcquireError),
    /// The wrapped service failed after admission.
    Inner(E),
}

impl<E: fmt::Display> fmt::Display for GateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "request rejected at the gate: {}", e),
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for GateError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(e) => Some(e),
            Self::Inner(e) => Some(e),
        }
    }
}

impl<E> GateError<E> {
    /// Check if the gate rejected the request.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Borrow the admission error if the gate rejected the request.
    pub fn as_rejected(&self) -> Option<&AcquireError> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }

    /// Get the wrapped service's error if this is an `Inner` variant.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
}

/// A layer that passes every request through a [`Gate`] before the inner
/// service sees it.
#[derive(Clone, Debug)]
pub struct GateLayer<G> {
    gate: Arc<G>,
    priority: u32,
}

impl<G> GateLayer<G> {
    /// Gate requests at baseline priority.
    pub fn new(gate: G) -> Self {
        Self { gate: Arc::new(gate), priority: crate::BASELINE_PRIORITY }
    }

    /// Gate requests at `priority` instead of baseline.
    // TODO: derive the priority from the request once a caller needs
    // per-request lanes; a fixed lane per layer covers today's uses.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

impl<S, G> Layer<S> for GateLayer<G> {
    type Service = GateService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService { inner, gate: self.gate.clone(), priority: self.priority }
    }
}

/// Middleware service that acquires one admission per request.
#[derive(Clone, Debug)]
pub struct GateService<S, G> {
    inner: S,
    gate: Arc<G>,
    priority: u32,
}

impl<S, G, Req> Service<Req> for GateService<S, G>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + Sync + std::error::Error + 'static,
    G: Gate + Send + Sync + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = GateError<S::Error>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(GateError::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let gate = self.gate.clone();
        let mut inner = self.inner.clone();
        let priority = self.priority;

        Box::pin(async move {
            gate.admit(priority).await.map_err(GateError::Rejected)?;
            inner.call(req).await.map_err(GateError::Inner)
        })
    }
}
