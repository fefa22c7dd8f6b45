//! MongoDB connection bootstrap.
//!
//! `connect` builds a client and proves the primary is reachable before handing
//! it out; `disconnect` retires it at shutdown. Both run before any request
//! context exists, so they carry their own time budgets.

use std::future::Future;
use std::time::Duration;

use log::{error, info, warn};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::Client;

use crate::errors::DbError;
use crate::utils::log_sanitizer::mask_uri;

const LOG_TARGET: &str = "synapse_sprint::database";

/// Budget for parsing the connection string and constructing the client.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Budget for the liveness probe against the primary.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for closing a client whose probe failed.
pub const PING_FAILURE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for the shutdown-time disconnect.
pub const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Open a client against `uri` and verify the primary answers a ping.
///
/// On probe failure the fresh client is shut down before the probe's error is
/// returned, so a failed connect never leaves a live handle behind.
pub async fn connect(uri: &str) -> Result<Client, DbError> {
    info!(target: LOG_TARGET, "Connecting to MongoDB at {}...", mask_uri(uri));

    let client = match with_timeout("connect", CONNECT_TIMEOUT, build_client(uri)).await {
        Ok(client) => client,
        Err(e) => {
            error!(target: LOG_TARGET, "Failed to create client: {}", e);
            return Err(e);
        }
    };

    let ping = with_timeout("ping", PING_TIMEOUT, ping_primary(&client)).await;
    if let Err(e) = ping {
        error!(target: LOG_TARGET, "Failed to connect to MongoDB (ping failed): {}", e);
        let shutdown = tokio::time::timeout(PING_FAILURE_SHUTDOWN_TIMEOUT, client.shutdown());
        if shutdown.await.is_err() {
            warn!(
                target: LOG_TARGET,
                "Client shutdown after failed ping exceeded {:?}", PING_FAILURE_SHUTDOWN_TIMEOUT
            );
        }
        return Err(e);
    }

    info!(target: LOG_TARGET, "Successfully connected to MongoDB!");
    Ok(client)
}

/// Close the client, if any. Failures are logged and never propagated.
pub async fn disconnect(client: Option<Client>) {
    let Some(client) = client else {
        return;
    };

    info!(target: LOG_TARGET, "Disconnecting from MongoDB...");
    match tokio::time::timeout(DISCONNECT_TIMEOUT, client.shutdown()).await {
        Ok(()) => info!(target: LOG_TARGET, "Successfully disconnected from MongoDB."),
        Err(_) => error!(
            target: LOG_TARGET,
            "Error disconnecting from MongoDB: shutdown timed out after {:?}", DISCONNECT_TIMEOUT
        ),
    }
}

async fn build_client(uri: &str) -> Result<Client, DbError> {
    let options = ClientOptions::parse(uri).await?;
    Ok(Client::with_options(options)?)
}

async fn ping_primary(client: &Client) -> Result<(), DbError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
        .await?;
    Ok(())
}

/// Run `fut` under `budget`, mapping expiry to [`DbError::Timeout`].
pub(crate) async fn with_timeout<T, F>(
    operation: &'static str,
    budget: Duration,
    fut: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(DbError::Timeout {
            operation,
            timeout: budget,
        }),
    }
}
