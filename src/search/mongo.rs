//! Executor backed by the document database driver

use super::executor::{ExecutorError, QueryExecutor};
use super::pipeline::render_pipeline;
use crate::config::DatabaseSettings;
use crate::query::QueryPlan;
use crate::results::CatalogRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs plans as aggregations over the catalog collection
pub struct MongoExecutor {
    client: Client,
    collection: Collection<Document>,
    index: String,
}

impl MongoExecutor {
    /// Build the client and its connection pool from settings.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first [`QueryExecutor::execute`] rather than here.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.connection_string)
            .await
            .context("invalid database connection string")?;

        let timeout = Duration::from_secs_f64(settings.request_timeout);
        options.app_name = Some(format!("catalog-search/{}", crate::VERSION));
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.max_pool_size = Some(settings.max_pool_size);

        let client = Client::with_options(options)?;
        let collection = client
            .database(&settings.database_name)
            .collection::<Document>(&settings.collection);

        info!(
            "Search backend ready: {}.{} (index {})",
            settings.database_name, settings.collection, settings.search_index
        );

        Ok(Self {
            client,
            collection,
            index: settings.search_index.clone(),
        })
    }
}

#[async_trait]
impl QueryExecutor for MongoExecutor {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<CatalogRecord>, ExecutorError> {
        let pipeline = render_pipeline(plan, &self.index);
        let start = Instant::now();

        let mut cursor = self
            .collection
            .aggregate(pipeline, None)
            .await
            .map_err(classify)?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(classify)? {
            records.push(decode_record(document)?);
        }

        debug!(
            "Aggregate returned {} documents in {:?}",
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }

    async fn close(&self) {
        info!("Closing search backend connection pool");
        self.client.clone().shutdown().await;
    }
}

/// Convert a returned document into a record, with BSON-only values
/// (ObjectId, dates) in relaxed Extended JSON form
fn decode_record(document: Document) -> Result<CatalogRecord, ExecutorError> {
    CatalogRecord::from_document(Bson::Document(document).into_relaxed_extjson())
        .map_err(|e| ExecutorError::Decode(e.to_string()))
}

fn classify(err: MongoError) -> ExecutorError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => ExecutorError::Unavailable(err.to_string()),
        ErrorKind::Authentication { .. } => ExecutorError::Unauthorized(err.to_string()),
        ErrorKind::Command(command) => {
            warn!("Search backend command failed ({}): {}", command.code, command.message);
            ExecutorError::Backend {
                code: Some(command.code),
                message: command.message.clone(),
            }
        }
        ErrorKind::BsonDeserialization(_) | ErrorKind::InvalidResponse { .. } => {
            ExecutorError::Decode(err.to_string())
        }
        _ => ExecutorError::Backend {
            code: None,
            message: err.to_string(),
        },
    }
}
