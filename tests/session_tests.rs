use checkout_flow::application::session::CheckoutSession;
use checkout_flow::config::CheckoutConfig;
use checkout_flow::domain::event::{EventKind, UiEvent};
use checkout_flow::domain::ports::Route;
use checkout_flow::domain::recipient::IntakeStep;
use checkout_flow::error::CheckoutError;
use checkout_flow::infrastructure::in_memory::{Navigation, RecordingRouter};
use std::sync::Arc;

mod common;

fn session() -> (CheckoutSession, Arc<RecordingRouter>) {
    let router = common::router();
    let session = CheckoutSession::new(CheckoutConfig::default(), router.clone());
    (session, router)
}

#[tokio::test(start_paused = true)]
async fn test_full_checkout_through_events() {
    let (mut session, router) = session();
    let script = [
        UiEvent::new(EventKind::PayAmount, "2"),
        UiEvent::new(EventKind::PayFrom, "Metamask"),
        UiEvent::new(EventKind::PayTo, "Rainbow"),
        UiEvent::bare(EventKind::Convert),
        UiEvent::new(EventKind::Wait, "2100"),
        UiEvent::new(EventKind::Bank, "GTBank"),
        UiEvent::new(EventKind::AccountNumber, "1234567890"),
        UiEvent::new(EventKind::Wait, "1600"),
        UiEvent::bare(EventKind::Next),
        UiEvent::new(EventKind::Wait, "1100"),
        UiEvent::new(EventKind::Email, "ada@example.com"),
        UiEvent::new(EventKind::Country, "GH"),
        UiEvent::new(EventKind::Phone, "201234567"),
        UiEvent::bare(EventKind::Next),
    ];
    for event in &script {
        session.apply(event).await.unwrap();
    }
    session.settle().await.unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.conversion.receive_amount, "7000000.00");
    let recipient = snapshot.recipient.expect("recipient flow was entered");
    assert_eq!(recipient.step, IntakeStep::Submitted);
    assert_eq!(recipient.account_name, "JOHN DOE");
    assert_eq!(recipient.phone_number(), "+233 201234567");

    assert_eq!(
        router.routes().await,
        vec![Route::RecipientDetails, Route::Confirmation]
    );
}

#[tokio::test(start_paused = true)]
async fn test_leaving_recipient_flow_discards_it() {
    let (mut session, router) = session();
    session
        .apply(&UiEvent::new(EventKind::Email, "ada@example.com"))
        .await
        .unwrap();
    assert!(session.recipient().is_some());

    session.apply(&UiEvent::bare(EventKind::Back)).await.unwrap();
    assert!(session.recipient().is_none());
    assert_eq!(router.navigations().await, vec![Navigation::Back]);

    // Re-entering starts from a blank form.
    session
        .apply(&UiEvent::new(EventKind::Phone, "8012345678"))
        .await
        .unwrap();
    let recipient = session.snapshot().await.recipient.unwrap();
    assert_eq!(recipient.email, "");
    assert_eq!(recipient.local_number, "8012345678");
}

#[tokio::test(start_paused = true)]
async fn test_back_on_conversion_page_delegates_to_router() {
    let (mut session, router) = session();
    session.apply(&UiEvent::bare(EventKind::Back)).await.unwrap();
    assert_eq!(router.navigations().await, vec![Navigation::Back]);
    assert!(session.recipient().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_rejected_events_leave_state_untouched() {
    let (mut session, _) = session();

    let result = session
        .apply(&UiEvent::new(EventKind::PayCurrency, "DOGE"))
        .await;
    assert!(matches!(result, Err(CheckoutError::UnknownValue { .. })));

    let result = session.apply(&UiEvent::new(EventKind::Wait, "soon")).await;
    assert!(matches!(result, Err(CheckoutError::UnknownValue { .. })));

    let result = session.apply(&UiEvent::bare(EventKind::Convert)).await;
    assert!(matches!(result, Err(CheckoutError::Validation(_))));

    session.settle().await.unwrap();
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.conversion.pay_amount, "1.00");
    assert_eq!(snapshot.conversion.receive_amount, "3500000.00");
    assert!(snapshot.recipient.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_conversion_events_rejected_while_converting() {
    let (mut session, router) = session();
    for event in [
        UiEvent::new(EventKind::PayFrom, "Metamask"),
        UiEvent::new(EventKind::PayTo, "Rainbow"),
        UiEvent::bare(EventKind::Convert),
    ] {
        session.apply(&event).await.unwrap();
    }

    let result = session.apply(&UiEvent::bare(EventKind::PayFrom)).await;
    assert!(matches!(result, Err(CheckoutError::Busy(_))));
    let result = session.apply(&UiEvent::new(EventKind::PayAmount, "9")).await;
    assert!(matches!(result, Err(CheckoutError::Busy(_))));

    session.settle().await.unwrap();
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.conversion.pay_amount, "1.00");
    assert!(snapshot.conversion.pay_from.is_some());
    assert_eq!(router.routes().await, vec![Route::RecipientDetails]);
}

#[tokio::test(start_paused = true)]
async fn test_finished_work_is_dropped() {
    let (mut session, _) = session();
    for amount in ["1", "2", "3"] {
        session
            .apply(&UiEvent::new(EventKind::PayAmount, amount))
            .await
            .unwrap();
    }
    assert_eq!(session.pending_count(), 3);

    session
        .apply(&UiEvent::new(EventKind::Wait, "1000"))
        .await
        .unwrap();
    session
        .apply(&UiEvent::new(EventKind::PayAmount, "4"))
        .await
        .unwrap();
    assert_eq!(session.pending_count(), 1);

    session.settle().await.unwrap();
    assert_eq!(session.pending_count(), 0);
    assert_eq!(
        session.snapshot().await.conversion.receive_amount,
        "14000000.00"
    );
}
