use serde_json::Value;

use crate::{
    domain::validation::{clean_payload, from_record, schemas, validate, validate_id, Record},
    entities::{
        contact::{ContactMessage, ContactQuery, ContactReceipt, NewContactMessage, Provenance, StatusUpdate},
        envelope::Envelope,
        pagination::{PageRequest, Paged},
    },
    errors::AppError,
    repositories::contact::ContactRepository,
};

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
    max_page_size: u32,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R, max_page_size: u32) -> Self {
        ContactHandler {
            contact_repo,
            max_page_size: max_page_size.max(1),
        }
    }

    /// Stores a public submission along with where it came from.
    pub async fn submit_message(&self, payload: Value, provenance: Provenance) -> Envelope<ContactReceipt> {
        Envelope::from_result(
            self.try_submit_message(payload, provenance).await,
            "Failed to send message. Please try again later.",
        )
        .with_message("Thank you for your message! I'll get back to you soon.")
    }

    async fn try_submit_message(&self, payload: Value, provenance: Provenance) -> Result<ContactReceipt, AppError> {
        let record = clean_payload(&schemas::CONTACT_CREATE, payload)?;
        let message: NewContactMessage = from_record(record)?;

        let stored = self.contact_repo.create_message(&message, &provenance).await?;
        tracing::info!(message_id = stored.id, "Contact message received");

        Ok(ContactReceipt::from(stored))
    }

    pub async fn list_messages(&self, query: &Record) -> Envelope<Paged<ContactMessage>> {
        Envelope::from_result(self.try_list_messages(query).await, "Failed to fetch contact messages")
    }

    async fn try_list_messages(&self, query: &Record) -> Result<Paged<ContactMessage>, AppError> {
        let record = validate(&schemas::contact_listing(i64::from(self.max_page_size)), query)?;
        let mut query: ContactQuery = from_record(record)?;

        let page = PageRequest { limit: query.limit, offset: query.offset }.clamped(self.max_page_size);
        query.limit = page.limit;

        let messages = self.contact_repo.list_messages(&query).await?;
        Ok(Paged::new(messages, page))
    }

    /// Unread messages, highest priority first, then newest.
    pub async fn list_unread_messages(&self) -> Envelope<Vec<ContactMessage>> {
        Envelope::from_result(
            self.contact_repo.list_unread_messages().await,
            "Failed to fetch unread messages",
        )
    }

    pub async fn get_message(&self, id: &str) -> Envelope<ContactMessage> {
        let result = match validate_id(id) {
            Ok(id) => self.contact_repo.get_message_by_id(id).await,
            Err(e) => Err(e),
        };
        Envelope::from_result(result, "Failed to fetch contact message")
    }

    /// Any status may follow any other; priority is kept when not given.
    pub async fn update_status(&self, id: &str, payload: Value) -> Envelope<ContactMessage> {
        Envelope::from_result(self.try_update_status(id, payload).await, "Failed to update message status")
            .with_message("Message status updated successfully")
    }

    async fn try_update_status(&self, id: &str, payload: Value) -> Result<ContactMessage, AppError> {
        let id = validate_id(id)?;
        let record = clean_payload(&schemas::CONTACT_STATUS_UPDATE, payload)?;
        let update: StatusUpdate = from_record(record)?;
        self.contact_repo.update_status(id, &update).await
    }

    pub async fn delete_message(&self, id: &str) -> Envelope<()> {
        let result = match validate_id(id) {
            Ok(id) => self.contact_repo.delete_message(id).await,
            Err(e) => Err(e),
        };
        Envelope::from_unit(result, "Contact message deleted successfully", "Failed to delete contact message")
    }
}
