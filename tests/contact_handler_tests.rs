mod test_utils;

use async_trait::async_trait;
use mockall::{mock, predicate::*};
use serde_json::{json, Map, Value};

use dh_portfolio_backend::{
    entities::{
        contact::{
            ContactMessage, ContactQuery, MessagePriority, MessageStatus, NewContactMessage,
            Provenance, StatusUpdate,
        },
        envelope::ErrorCode,
    },
    errors::{AppError, FieldError},
    repositories::contact::ContactRepository,
    use_cases::contact::ContactHandler,
};
use test_utils::*;

mock! {
    pub ContactRepo {}

    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn create_message(&self, message: &NewContactMessage, provenance: &Provenance) -> Result<ContactMessage, AppError>;
        async fn list_messages(&self, query: &ContactQuery) -> Result<Vec<ContactMessage>, AppError>;
        async fn list_unread_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
        async fn get_message_by_id(&self, id: u64) -> Result<ContactMessage, AppError>;
        async fn update_status(&self, id: u64, update: &StatusUpdate) -> Result<ContactMessage, AppError>;
        async fn delete_message(&self, id: u64) -> Result<(), AppError>;
    }
}

fn handler(repo: MockContactRepo) -> ContactHandler<MockContactRepo> {
    ContactHandler::new(repo, 100)
}

fn provenance() -> Provenance {
    Provenance::contact_form(Some("203.0.113.7".into()), Some("test-agent".into()))
}

fn query(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[actix_rt::test]
async fn submission_is_stored_as_unread_medium_priority() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_message()
        .withf(|message, provenance| {
            message.name == "Jane Doe"
                && message.email == "jane@x.com"
                && message.message == "Hello"
                && message.subject.is_none()
                && provenance.source == "contact_form"
                && provenance.ip_address.as_deref() == Some("203.0.113.7")
        })
        .times(1)
        .returning(|_, _| Ok(sample_message(1)));

    let envelope = handler(repo)
        .submit_message(
            json!({ "name": "Jane Doe", "email": "jane@x.com", "message": "Hello" }),
            provenance(),
        )
        .await;

    assert!(envelope.success);
    assert_eq!(
        envelope.message.as_deref(),
        Some("Thank you for your message! I'll get back to you soon.")
    );
    let receipt = envelope.data.unwrap();
    assert_eq!(receipt.status, MessageStatus::Unread);
    assert_eq!(receipt.priority, MessagePriority::Medium);
}

#[actix_rt::test]
async fn receipt_omits_provenance() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_message()
        .returning(|_, _| Ok(sample_message(2)));

    let envelope = handler(repo)
        .submit_message(
            json!({ "name": "Jane Doe", "email": "jane@x.com", "message": "Hello" }),
            provenance(),
        )
        .await;

    let body = serde_json::to_value(&envelope).unwrap();
    assert!(body["data"].get("ip_address").is_none());
    assert!(body["data"].get("user_agent").is_none());
    assert_eq!(body["data"]["status"], json!("unread"));
}

#[actix_rt::test]
async fn invalid_submission_lists_every_problem() {
    let repo = MockContactRepo::new();

    let envelope = handler(repo)
        .submit_message(json!({ "name": "", "email": "nope" }), provenance())
        .await;

    assert_eq!(envelope.code, Some(ErrorCode::Validation));
    let details = envelope.details.unwrap();
    assert!(details.contains(&FieldError::new("name", "Name cannot be empty")));
    assert!(details.contains(&FieldError::new("email", "Please provide a valid email address")));
    assert!(details.contains(&FieldError::new("message", "Message is required")));
}

#[actix_rt::test]
async fn storage_failure_gives_the_friendly_message() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_message()
        .returning(|_, _| Err(AppError::BackendUnavailable("pool timed out".into())));

    let envelope = handler(repo)
        .submit_message(
            json!({ "name": "Jane Doe", "email": "jane@x.com", "message": "Hello" }),
            provenance(),
        )
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, Some(ErrorCode::BackendUnavailable));
    assert_eq!(
        envelope.error.as_deref(),
        Some("Failed to send message. Please try again later.")
    );
}

#[actix_rt::test]
async fn listing_filters_by_status_and_priority() {
    let mut repo = MockContactRepo::new();
    repo.expect_list_messages()
        .withf(|q| {
            q.status == Some(MessageStatus::Read)
                && q.priority == Some(MessagePriority::High)
                && q.limit == 50
                && q.offset == 0
        })
        .times(1)
        .returning(|_| Ok(vec![sample_message(1)]));

    let envelope = handler(repo)
        .list_messages(&query(json!({ "status": "read", "priority": "high" })))
        .await;

    let page = envelope.data.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.pagination.limit, 50);
}

#[actix_rt::test]
async fn listing_rejects_unknown_status() {
    let repo = MockContactRepo::new();

    let envelope = handler(repo).list_messages(&query(json!({ "status": "spam" }))).await;
    assert_eq!(envelope.code, Some(ErrorCode::Validation));
}

#[actix_rt::test]
async fn status_update_keeps_priority_when_absent() {
    let mut repo = MockContactRepo::new();
    repo.expect_update_status()
        .withf(|id, update| *id == 1 && update.status == MessageStatus::Replied && update.priority.is_none())
        .times(1)
        .returning(|id, update| {
            let mut message = sample_message(id);
            message.status = update.status;
            Ok(message)
        });

    let envelope = handler(repo).update_status("1", json!({ "status": "replied" })).await;

    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Message status updated successfully"));
    let message = envelope.data.unwrap();
    assert_eq!(message.status, MessageStatus::Replied);
    assert_eq!(message.priority, MessagePriority::Medium);
}

#[actix_rt::test]
async fn status_update_of_missing_message_is_not_found() {
    let mut repo = MockContactRepo::new();
    repo.expect_update_status()
        .returning(|_, _| Err(AppError::NotFound("Contact message not found".into())));

    let envelope = handler(repo)
        .update_status("77", json!({ "status": "archived", "priority": "low" }))
        .await;

    assert_eq!(envelope.code, Some(ErrorCode::NotFound));
    assert_eq!(envelope.error.as_deref(), Some("Contact message not found"));
}

#[actix_rt::test]
async fn unread_messages_come_straight_from_the_repository() {
    let mut repo = MockContactRepo::new();
    repo.expect_list_unread_messages()
        .times(1)
        .returning(|| {
            let mut urgent = sample_message(2);
            urgent.priority = MessagePriority::High;
            Ok(vec![urgent, sample_message(1)])
        });

    let envelope = handler(repo).list_unread_messages().await;

    let messages = envelope.data.unwrap();
    assert_eq!(messages[0].priority, MessagePriority::High);
    assert_eq!(messages.len(), 2);
}

#[actix_rt::test]
async fn get_and_delete_validate_the_id() {
    let mut repo = MockContactRepo::new();
    repo.expect_get_message_by_id()
        .with(eq(4))
        .times(1)
        .returning(|id| Ok(sample_message(id)));
    repo.expect_delete_message()
        .with(eq(4))
        .times(1)
        .returning(|_| Ok(()));
    let handler = handler(repo);

    assert_eq!(handler.get_message("4").await.data.unwrap().id, 4);
    assert_eq!(
        handler.delete_message("4").await.message.as_deref(),
        Some("Contact message deleted successfully")
    );
    assert_eq!(handler.get_message("-4").await.code, Some(ErrorCode::Validation));
}
