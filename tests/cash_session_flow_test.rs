mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use pdv_caixa::errors::ServiceError;
use pdv_caixa::models::MovementKind;
use pdv_caixa::services::CashSessionService;

use support::FakeBackend;

fn service(backend: &Arc<FakeBackend>) -> CashSessionService {
    CashSessionService::new(backend.clone())
}

#[tokio::test]
async fn test_open_session_lifecycle() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);

    assert!(!sessions.is_open().await);

    let opened = sessions.open(5000).await.unwrap();
    assert_eq!(opened.opening_balance_cents, 5000);
    assert!(sessions.is_open().await);
    assert_eq!(sessions.open_session_id().await, Some(opened.id));
}

#[tokio::test]
async fn test_negative_opening_balance_rejected_locally() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);

    let err = sessions.open(-1).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(backend.session.lock().await.is_none());
}

#[tokio::test]
async fn test_movement_updates_cached_balance() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);
    sessions.open(10_000).await.unwrap();

    sessions
        .post_movement(MovementKind::Reinforcement, 2_000, "Troco extra")
        .await
        .unwrap();
    let session = sessions.current().await.unwrap();
    assert_eq!(session.current_balance_cents, 12_000);

    sessions
        .post_movement(MovementKind::Withdrawal, 3_000, "Sangria para o cofre")
        .await
        .unwrap();
    let session = sessions.current().await.unwrap();
    assert_eq!(session.current_balance_cents, 9_000);
}

#[tokio::test]
async fn test_movement_prechecks_fail_before_any_network_call() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);
    sessions.open(10_000).await.unwrap();

    let err = sessions
        .post_movement(MovementKind::Withdrawal, 0, "Sangria")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = sessions
        .post_movement(MovementKind::Withdrawal, 1_000, "  ab ")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    assert!(backend.movements.lock().await.is_empty());
}

#[tokio::test]
async fn test_movement_without_open_session() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);

    let err = sessions
        .post_movement(MovementKind::Reinforcement, 1_000, "Troco")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NoOpenSession));
}

#[tokio::test]
async fn test_close_is_terminal() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);
    sessions.open(5_000).await.unwrap();

    let summary = sessions.close().await.unwrap();
    assert_eq!(summary.balances.opening_balance_cents, 5_000);
    assert!(!sessions.is_open().await);

    // A second close finds no session to act on.
    let err = sessions.close().await.unwrap_err();
    assert!(matches!(err, ServiceError::NoOpenSession));
}

#[tokio::test]
async fn test_fetch_failure_fails_closed() {
    let backend = Arc::new(FakeBackend::new());
    let sessions = service(&backend);
    sessions.open(5_000).await.unwrap();
    assert!(sessions.is_open().await);

    backend.fail_session_fetch.store(true, Ordering::SeqCst);
    assert!(sessions.refresh().await.is_none());
    assert!(!sessions.is_open().await);

    // Recovery: the next successful fetch restores the cache.
    backend.fail_session_fetch.store(false, Ordering::SeqCst);
    assert!(sessions.refresh().await.is_some());
    assert!(sessions.is_open().await);
}
