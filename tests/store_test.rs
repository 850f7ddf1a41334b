use chrono::{Duration, Utc};
use iqtest_backend::error::Error;
use iqtest_backend::models::test_record::PaymentStatus;
use iqtest_backend::services::sweeper_service::SweeperService;
use iqtest_backend::services::test_service::{TestService, PLACEHOLDER_EMAIL};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const PERFECT_ANSWERS: [i64; 30] = [
    1, 2, 3, 1, 4, 3, 2, 0, 1, 1, 1, 1, 1, 2, 2, 4, 2, 1, 1, 1, 0, 0, 3, 1, 1, 1, 1, 3, 0, 0,
];

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

async fn backdate_expiry(pool: &SqlitePool, uuid: &str) {
    sqlx::query("UPDATE tests SET expires_at = ?1 WHERE uuid = ?2")
        .bind(Utc::now() - Duration::hours(25))
        .bind(uuid)
        .execute(pool)
        .await
        .expect("backdate expiry");
}

#[tokio::test]
async fn create_test_sets_lifecycle_defaults() {
    let pool = setup_pool().await;
    let service = TestService::new(pool);

    let record = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();

    assert_eq!(record.payment_status, PaymentStatus::Pending);
    assert_eq!(record.customer_email, PLACEHOLDER_EMAIL);
    assert!(record.payment_id.is_none());
    assert_eq!(record.score, 155);
    assert_eq!(record.level, "Genius");
    assert_eq!(record.correct_count, 30);

    let ttl = record.expires_at - record.created_at;
    assert_eq!(ttl.num_hours(), 24);

    let fetched = service.get_test(&record.uuid).await.unwrap();
    assert_eq!(fetched.uuid, record.uuid);
    assert_eq!(fetched.answers, serde_json::json!(PERFECT_ANSWERS.to_vec()));
}

#[tokio::test]
async fn get_test_unknown_id_is_not_found() {
    let pool = setup_pool().await;
    let service = TestService::new(pool);

    let err = service.get_test("no-such-id").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn attach_payment_is_idempotent_but_rejects_a_second_charge() {
    let pool = setup_pool().await;
    let service = TestService::new(pool);
    let record = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();

    service
        .attach_payment(&record.uuid, "charge-1", Some("qr-data"))
        .await
        .unwrap();

    // Retrying the same charge is a no-op.
    service
        .attach_payment(&record.uuid, "charge-1", Some("qr-data"))
        .await
        .unwrap();

    let err = service
        .attach_payment(&record.uuid, "charge-2", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let err = service
        .attach_payment("no-such-id", "charge-3", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let fetched = service.get_test(&record.uuid).await.unwrap();
    assert_eq!(fetched.payment_id.as_deref(), Some("charge-1"));
    assert_eq!(fetched.qr_code_data.as_deref(), Some("qr-data"));
}

#[tokio::test]
async fn payment_status_is_monotonic() {
    let pool = setup_pool().await;
    let service = TestService::new(pool);
    let record = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();

    let updated = service
        .update_payment_status(&record.uuid, PaymentStatus::Approved)
        .await
        .unwrap();
    assert!(updated);

    // Already settled: any further update reports zero rows.
    let updated = service
        .update_payment_status(&record.uuid, PaymentStatus::Rejected)
        .await
        .unwrap();
    assert!(!updated);
    let updated = service
        .update_payment_status(&record.uuid, PaymentStatus::Approved)
        .await
        .unwrap();
    assert!(!updated);

    let fetched = service.get_test(&record.uuid).await.unwrap();
    assert_eq!(fetched.payment_status, PaymentStatus::Approved);

    // Unknown ids also report zero rows instead of failing.
    let updated = service
        .update_payment_status("no-such-id", PaymentStatus::Approved)
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn sweep_removes_only_expired_pending_records() {
    let pool = setup_pool().await;
    let service = TestService::new(pool.clone());

    let expired_pending = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();
    let expired_approved = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();
    let fresh_pending = service.create_test(&PERFECT_ANSWERS, None).await.unwrap();

    backdate_expiry(&pool, &expired_pending.uuid).await;
    backdate_expiry(&pool, &expired_approved.uuid).await;
    service
        .update_payment_status(&expired_approved.uuid, PaymentStatus::Approved)
        .await
        .unwrap();

    let sweeper = SweeperService::new(service.clone());
    let removed = sweeper.run_once().await.unwrap();
    assert_eq!(removed, 1);

    let err = service.get_test(&expired_pending.uuid).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(service.get_test(&expired_approved.uuid).await.is_ok());
    assert!(service.get_test(&fresh_pending.uuid).await.is_ok());

    // Nothing left to sweep.
    assert_eq!(sweeper.run_once().await.unwrap(), 0);
}

#[tokio::test]
async fn webhook_log_is_append_only() {
    let pool = setup_pool().await;
    let service = TestService::new(pool.clone());

    service
        .log_webhook(
            Some("charge-1"),
            "payment.updated",
            &serde_json::json!({ "data": { "id": "charge-1" } }),
        )
        .await
        .unwrap();
    service
        .log_webhook(None, "", &serde_json::json!({ "garbage": true }))
        .await
        .unwrap();

    let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM webhook_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 2);
}
