pub mod medicines;
pub mod users;

pub use medicines::MedicineStore;
pub use users::UserStore;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

pub const MEDICINES: &str = "medicines";
pub const USERS: &str = "users";

const DEFAULT_DATABASE: &str = "medscan";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, database_name: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // Pool sized for request-per-call handling
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Explicit name wins, then the path segment of the URI
        let db_name = database_name
            .map(str::to_string)
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("📊 Using database: {}", db_name);

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the lookup and auth paths rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let medicines = self.collection::<mongodb::bson::Document>(MEDICINES);

        // Not unique: duplicate names are tolerated
        let name_index = IndexModel::builder().keys(doc! { "name": 1 }).build();
        match medicines.create_index(name_index).await {
            Ok(_) => log::info!("   ✅ Index created: medicines(name)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let popularity_index = IndexModel::builder()
            .keys(doc! { "searchCount": -1 })
            .build();
        match medicines.create_index(popularity_index).await {
            Ok(_) => log::info!("   ✅ Index created: medicines(searchCount)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let users = self.collection::<mongodb::bson::Document>(USERS);

        // Failing here means existing duplicates; registration would lose its guarantee
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users.create_index(email_index).await?;
        log::info!("   ✅ Index created: users(email) unique");

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn ping(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/medscan_test".to_string());

        let db = MongoDB::new(&uri, None).await.expect("connect");
        assert!(db.ping().await);
    }
}
