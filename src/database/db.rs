use log::{error, info};
use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};

use crate::config::Config;

/// Connect to MongoDB, ping the server and hand back the application database.
pub async fn connect_to_mongo(config: &Config) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some("bagpack_backend".to_string());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
        .map_err(|e| {
            error!("Failed to reach MongoDB: {e}");
            e
        })?;

    info!(
        "Connected successfully to MongoDB, using database '{}'",
        config.database_name
    );

    Ok(client.database(&config.database_name))
}
