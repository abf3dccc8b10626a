//! MongoDB implementation of the record store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::connection::{ConnectionCache, Connector, RetryPolicy};
use super::models::{BOOKINGS, BookingDocument, EVENTS, EventDocument};
use super::{EventPage, RecordStore};
use crate::config::DatabaseConfig;
use crate::domain::{Booking, Event, RecordId};
use crate::error::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// Connects to MongoDB, pings the deployment and ensures indexes.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    config: DatabaseConfig,
}

impl MongoConnector {
    /// Creates a connector for the given settings. Does not connect.
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Database;

    async fn connect(&self) -> Result<Database, AppError> {
        let uri = self.config.require_uri()?;
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(self.config.connect_timeout);
        options.server_selection_timeout = Some(self.config.connect_timeout);

        let client = Client::with_options(options)?;
        let db = client.database(&self.config.database);
        db.run_command(doc! { "ping": 1 }).await?;
        ensure_indexes(&db).await?;

        tracing::info!(database = %self.config.database, "connected to mongodb");
        Ok(db)
    }
}

/// Unique index on `events.slug`, secondary index on `bookings.eventId`.
async fn ensure_indexes(db: &Database) -> Result<(), AppError> {
    let slug_index = IndexModel::builder()
        .keys(doc! { "slug": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<EventDocument>(EVENTS)
        .create_index(slug_index)
        .await?;

    let event_index = IndexModel::builder().keys(doc! { "eventId": 1 }).build();
    db.collection::<BookingDocument>(BOOKINGS)
        .create_index(event_index)
        .await?;
    Ok(())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// [`RecordStore`] backed by MongoDB.
///
/// Every operation goes through the shared [`ConnectionCache`], so the
/// first request to touch storage establishes the connection.
#[derive(Debug)]
pub struct MongoStore {
    cache: ConnectionCache<MongoConnector>,
}

impl MongoStore {
    /// Creates a store that connects lazily with `config`.
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        let policy = RetryPolicy::from(&config);
        Self {
            cache: ConnectionCache::new(MongoConnector::new(config), policy),
        }
    }

    /// Establishes the connection now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns the establishment error, e.g. [`AppError::Configuration`]
    /// when `MONGODB_URI` is missing.
    pub async fn connect(&self) -> Result<(), AppError> {
        self.cache.get().await.map(|_| ())
    }

    async fn events(&self) -> Result<Collection<EventDocument>, AppError> {
        Ok(self.cache.get().await?.collection(EVENTS))
    }

    async fn bookings(&self) -> Result<Collection<BookingDocument>, AppError> {
        Ok(self.cache.get().await?.collection(BOOKINGS))
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        self.events()
            .await?
            .insert_one(EventDocument::from(event))
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::DuplicateSlug(event.slug.clone())
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn replace_event(&self, event: &Event) -> Result<(), AppError> {
        let result = self
            .events()
            .await?
            .replace_one(
                doc! { "_id": *event.id.as_object_id() },
                EventDocument::from(event),
            )
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::DuplicateSlug(event.slug.clone())
                } else {
                    AppError::from(e)
                }
            })?;
        if result.matched_count == 0 {
            return Err(AppError::EventNotFound(event.id.to_string()));
        }
        Ok(())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let found = self
            .events()
            .await?
            .find_one(doc! { "slug": slug })
            .await?;
        found.map(Event::try_from).transpose()
    }

    async fn find_event_by_id(&self, id: RecordId) -> Result<Option<Event>, AppError> {
        let found = self
            .events()
            .await?
            .find_one(doc! { "_id": *id.as_object_id() })
            .await?;
        found.map(Event::try_from).transpose()
    }

    async fn list_events(&self, skip: u64, limit: u64) -> Result<EventPage, AppError> {
        let events = self.events().await?;
        let total = events.count_documents(doc! {}).await?;
        if limit == 0 || skip >= total {
            return Ok(EventPage {
                events: Vec::new(),
                total,
            });
        }
        let cursor = events
            .find(doc! {})
            .sort(doc! { "date": 1, "time": 1, "_id": 1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;
        let docs: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(EventPage {
            events: docs
                .into_iter()
                .map(Event::try_from)
                .collect::<Result<_, _>>()?,
            total,
        })
    }

    async fn event_exists(&self, id: RecordId) -> Result<bool, AppError> {
        let count = self
            .events()
            .await?
            .count_documents(doc! { "_id": *id.as_object_id() })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        self.bookings()
            .await?
            .insert_one(BookingDocument::from(booking))
            .await?;
        Ok(())
    }

    async fn list_bookings_for_event(&self, event_id: RecordId) -> Result<Vec<Booking>, AppError> {
        let cursor = self
            .bookings()
            .await?
            .find(doc! { "eventId": *event_id.as_object_id() })
            .sort(doc! { "createdAt": 1 })
            .await?;
        let docs: Vec<BookingDocument> = cursor.try_collect().await?;
        docs.into_iter().map(Booking::try_from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_uri_fails_at_first_use() {
        let store = MongoStore::new(DatabaseConfig::default());
        let err = tokio_test::assert_err!(store.event_exists(RecordId::new()).await);
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn malformed_uri_is_a_configuration_error() {
        let store = MongoStore::new(DatabaseConfig {
            uri: Some("postgres://not-mongo".to_string()),
            ..DatabaseConfig::default()
        });
        let err = tokio_test::assert_err!(store.connect().await);
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
