use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};
use tracing::instrument;

use crate::database::{
    is_unique_violation, Database, DatabaseError, DatabaseQuerySnafu, EmptyQuerySnafu, Table as _,
};
use crate::model::{now, NewSubscriber, Subscriber, SubscriberRow};

pub const INVALID_EMAIL: &str = "Please provide a valid email address";
pub const SUBSCRIBED: &str = "Successfully subscribed!";
pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed!";
pub const FAILED: &str = "Something went wrong. Please try again.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SubscribeError {
    #[snafu(display("`{email}` is already subscribed"))]
    AlreadySubscribed { email: String },

    #[snafu(display("failed to store the subscriber at {location}: {source}"))]
    Store {
        source: DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Storage for newsletter signups.
pub trait SubscriberRepository: Send + Sync {
    /// Fails with [`SubscribeError::AlreadySubscribed`] when the email is taken.
    fn add_subscriber(
        &self, subscriber: NewSubscriber<'_>,
    ) -> impl Future<Output = Result<Subscriber, SubscribeError>> + Send;

    /// Every subscriber, newest first.
    fn subscribers(&self) -> impl Future<Output = Result<Vec<Subscriber>, DatabaseError>> + Send;
}

impl SubscriberRepository for Database {
    async fn add_subscriber(&self, subscriber: NewSubscriber<'_>) -> Result<Subscriber, SubscribeError> {
        let created: Vec<Subscriber> = match self.create(Subscriber::table()).content(&subscriber).await {
            Ok(created) => created,
            Err(error) if is_unique_violation(&error) => {
                return AlreadySubscribedSnafu {
                    email: subscriber.email,
                }
                .fail();
            }
            Err(error) => return Err(error).context(DatabaseQuerySnafu).context(StoreSnafu),
        };

        created
            .into_iter()
            .next()
            .context(EmptyQuerySnafu)
            .context(StoreSnafu)
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>, DatabaseError> {
        let mut subscribers: Vec<Subscriber> = self
            .select(Subscriber::table())
            .await
            .context(DatabaseQuerySnafu)?;

        subscribers.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(subscribers)
    }
}

/// Outcome of a signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Subscribed,
    AlreadySubscribed,
    InvalidEmail,
    Failed,
}

impl Subscription {
    /// Duplicates count as a success, the visitor is on the list either way.
    pub fn is_success(self) -> bool {
        matches!(self, Subscription::Subscribed | Subscription::AlreadySubscribed)
    }

    pub fn message(self) -> &'static str {
        match self {
            Subscription::Subscribed => SUBSCRIBED,
            Subscription::AlreadySubscribed => ALREADY_SUBSCRIBED,
            Subscription::InvalidEmail => INVALID_EMAIL,
            Subscription::Failed => FAILED,
        }
    }

    pub fn response(self) -> SubscribeResponse {
        SubscribeResponse {
            success: self.is_success(),
            message: self.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.contains('@')
}

/// Validates `email` and stores it with the current time.
///
/// Invalid addresses never reach the repository.
#[instrument(skip(repository))]
pub async fn subscribe(repository: &impl SubscriberRepository, email: &str) -> Subscription {
    let email = email.trim();
    if !is_valid_email(email) {
        return Subscription::InvalidEmail;
    }

    let subscriber = NewSubscriber {
        email,
        subscribed_at: now(),
    };

    match repository.add_subscriber(subscriber).await {
        Ok(subscriber) => {
            tracing::info!(id = %subscriber.id, "new subscriber `{}`", email);
            Subscription::Subscribed
        }
        Err(SubscribeError::AlreadySubscribed { .. }) => {
            tracing::info!("`{}` is already subscribed", email);
            Subscription::AlreadySubscribed
        }
        Err(error) => {
            tracing::error!(error = ?error, "failed to subscribe `{}`: {}", email, error);
            Subscription::Failed
        }
    }
}

/// Subscribers whose email contains `query`, ignoring case.
pub fn search<'a>(subscribers: &'a [Subscriber], query: &str) -> Vec<&'a Subscriber> {
    let query = query.trim().to_lowercase();

    subscribers
        .iter()
        .filter(|subscriber| subscriber.email.to_lowercase().contains(&query))
        .collect()
}

/// CSV with an `ID,Email,Subscribed At` header and one line per subscriber.
pub fn export_csv<'a>(subscribers: impl IntoIterator<Item = &'a Subscriber>) -> String {
    let mut lines = vec!["ID,Email,Subscribed At".to_string()];

    for subscriber in subscribers {
        let row = SubscriberRow::from(subscriber);
        lines.push(
            [
                csv_field(&row.id),
                csv_field(&row.email),
                csv_field(&row.subscribed_at.to_string()),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("subscribers_{}.csv", date.format("%Y-%m-%d"))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
