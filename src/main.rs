use anyhow::Context;
use log::info;

use synapse_sprint::config::CONFIG;
use synapse_sprint::database;
use synapse_sprint::repositories::MongoUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logger
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    info!("Starting Synapse Sprint backend...");

    let client = database::connect(&CONFIG.mongodb_uri)
        .await
        .context("failed to connect to database")?;

    let db = client.database(&CONFIG.database_name);
    let _user_repository = MongoUserRepository::new(&db).await;
    info!("User repository initialized.");

    // The HTTP layer is not wired yet; nothing listens on CONFIG.server_port.
    info!(
        "Setup complete (config loaded, database connected, repositories initialized). Exiting."
    );

    database::disconnect(Some(client)).await;
    Ok(())
}
