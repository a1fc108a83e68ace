use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::variants::string_enum;

pub const DEFAULT_SOURCE: &str = "contact_form";

string_enum! {
    pub enum MessageStatus ("status") {
        Unread => "unread",
        Read => "read",
        Replied => "replied",
        Archived => "archived",
    }
}

string_enum! {
    pub enum MessagePriority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: MessageStatus,
    #[sqlx(try_from = "String")]
    pub priority: MessagePriority,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated public submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Where a submission came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Provenance {
    pub fn contact_form(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Provenance {
            source: DEFAULT_SOURCE.to_string(),
            ip_address,
            user_agent,
        }
    }
}

/// What the submitter gets back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactReceipt {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub status: MessageStatus,
    pub priority: MessagePriority,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactReceipt {
    fn from(msg: ContactMessage) -> Self {
        ContactReceipt {
            id: msg.id,
            name: msg.name,
            email: msg.email,
            subject: msg.subject,
            status: msg.status,
            priority: msg.priority,
            created_at: msg.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusUpdate {
    pub status: MessageStatus,
    #[serde(default)]
    pub priority: Option<MessagePriority>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactQuery {
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default)]
    pub priority: Option<MessagePriority>,
    pub limit: u32,
    pub offset: u32,
}
