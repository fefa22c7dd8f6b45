use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Database};

use synapse_sprint::config::DEFAULT_MONGODB_URI;
use synapse_sprint::database;
use synapse_sprint::repositories::MongoUserRepository;

/// A repository bound to a throwaway database on the server named by
/// `MONGODB_URI`.
pub struct TestContext {
    pub client: Client,
    pub db: Database,
    pub repository: MongoUserRepository,
}

impl TestContext {
    pub async fn new() -> Self {
        let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string());
        let client = database::connect(&uri)
            .await
            .expect("MongoDB must be reachable for ignored tests");
        let db = client.database(&format!("synapse_sprint_test_{}", ObjectId::new().to_hex()));
        let repository = MongoUserRepository::new(&db).await;
        Self {
            client,
            db,
            repository,
        }
    }

    pub async fn teardown(self) {
        self.db.drop().await.expect("drop test database");
        database::disconnect(Some(self.client)).await;
    }
}
