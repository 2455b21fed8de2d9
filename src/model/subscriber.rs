use serde::{Deserialize, Serialize};

use crate::database::Record;
use crate::table;

use super::Timestamp;

/// A newsletter signup, owned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Record<Subscriber>,
    pub email: String,
    pub subscribed_at: Timestamp,
}

table! {
    Subscriber => "subscribers",
}

/// Content of a new row; the database assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubscriber<'a> {
    pub email: &'a str,
    pub subscribed_at: Timestamp,
}

/// Flat representation for the admin API, without the table prefix on the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRow {
    pub id: String,
    pub email: String,
    pub subscribed_at: Timestamp,
}

impl From<&Subscriber> for SubscriberRow {
    fn from(subscriber: &Subscriber) -> Self {
        Self {
            id: subscriber.id.key(),
            email: subscriber.email.clone(),
            subscribed_at: subscriber.subscribed_at,
        }
    }
}
