use axum::body::Body;
use axum::http::{Request, StatusCode};
use healthcheck::handlers::health::{HEALTHY_BODY, UNHEALTHY_BODY};
use healthcheck::{create_app, AppError, AppState, CheckContext, Checks, FnChecker};
use tower::ServiceExt;

fn app_with(checks: Checks) -> axum::Router {
    create_app(AppState::new(checks))
}

#[tokio::test]
async fn test_health_endpoint_reports_ok_when_all_checks_pass() {
    let checks = Checks::new(CheckContext::new()).add_check(FnChecker::new("store", || Ok(())));
    let app = app_with(checks);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], HEALTHY_BODY.as_bytes());
}

#[tokio::test]
async fn test_health_endpoint_reports_fixed_body_when_any_check_fails() {
    let checks = Checks::new(CheckContext::new())
        .add_check(FnChecker::new("store", || Ok(())))
        .add_check(FnChecker::new("downstream", || {
            Err(AppError::Unhealthy("connection refused".to_string()))
        }));
    let app = app_with(checks);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], UNHEALTHY_BODY.as_bytes());
}

#[tokio::test]
async fn test_health_endpoint_with_no_checks_is_ok() {
    let app = app_with(Checks::new(CheckContext::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_liveness_endpoint_ignores_failing_checks() {
    let checks = Checks::new(CheckContext::new()).add_check(FnChecker::new("down", || {
        Err(AppError::Unhealthy("connection refused".to_string()))
    }));
    let app = app_with(checks);

    let response = app
        .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
