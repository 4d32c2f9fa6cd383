use std::convert::Infallible;
use std::time::Duration;
use tower::{service_fn, Layer, ServiceExt};
use turnstile::{GateLayer, RateLimiter};

async fn double(input: u32) -> Result<u32, Infallible> {
    Ok(input * 2)
}

#[tokio::test]
async fn admitted_requests_reach_the_inner_service() {
    let limiter = RateLimiter::new(10);
    let service = GateLayer::new(limiter).layer(service_fn(double));

    let response = service.oneshot(21).await.expect("admitted");
    assert_eq!(response, 42);
}

#[tokio::test]
async fn requests_past_the_limit_are_rejected() {
    // A zero deadline turns acquisition into a single attempt.
    let limiter = RateLimiter::new(1).with_timeout(Duration::ZERO);
    let service = GateLayer::new(limiter).layer(service_fn(double));

    let response = service.clone().oneshot(1).await.expect("first request fits");
    assert_eq!(response, 2);

    let err = service.oneshot(2).await.expect_err("window is full");
    assert!(err.is_rejected());
    assert!(err.as_rejected().expect("admission error").is_timeout());
}

#[tokio::test]
async fn gated_services_share_the_limiter_window() {
    let limiter = RateLimiter::new(1).with_timeout(Duration::ZERO);
    let layer = GateLayer::new(limiter.clone());

    let first = layer.layer(service_fn(double));
    let second = layer.layer(service_fn(double));

    first.oneshot(3).await.expect("first service takes the slot");
    let err = second.oneshot(4).await.expect_err("second service finds it spent");
    assert!(err.is_rejected());
    assert_eq!(limiter.admitted_in_window(), 1);
}

#[tokio::test]
async fn elevated_lane_is_admitted_under_contention() {
    let limiter = RateLimiter::new(1).with_timeout(Duration::ZERO);
    let elevated = GateLayer::new(limiter.clone()).with_priority(7).layer(service_fn(double));

    let response = elevated.oneshot(5).await.expect("empty window admits");
    assert_eq!(response, 10);
    assert_eq!(limiter.admitted_in_window(), 1);
}
