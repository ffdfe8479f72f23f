use std::sync::Arc;

use actix_web::web;
use log::info;

use crate::adventure::service::AdventureService;
use crate::adventure::store::{AdventureStore, InMemoryAdventureStore, MongoAdventureStore};
use crate::community::service::CommunityService;
use crate::community::store::{InMemoryPostStore, MongoPostStore, PostStore};
use crate::config::{Config, StoreBackend};
use crate::database::connect_to_mongo;
use crate::middleware::auth::AuthSettings;
use crate::router::index::routes;
use crate::user::directory::{InMemoryUserDirectory, MongoUserDirectory, UserDirectory};
use crate::utils::error::CustomError;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    community: web::Data<CommunityService>,
    adventures: web::Data<AdventureService>,
    auth: web::Data<AuthSettings>,
}

impl AppState {
    fn assemble(
        posts: Arc<dyn PostStore>,
        adventures: Arc<dyn AdventureStore>,
        users: Arc<dyn UserDirectory>,
        jwt_secret: String,
        retry_limit: u32,
    ) -> Self {
        let community =
            CommunityService::new(posts, adventures.clone(), users).with_retry_limit(retry_limit);

        AppState {
            community: web::Data::new(community),
            adventures: web::Data::new(AdventureService::new(adventures)),
            auth: web::Data::new(AuthSettings { jwt_secret }),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, mongodb::error::Error> {
        match config.store_backend {
            StoreBackend::Mongo => {
                let db = connect_to_mongo(config).await?;
                Ok(Self::assemble(
                    Arc::new(MongoPostStore::new(&db)),
                    Arc::new(MongoAdventureStore::new(&db)),
                    Arc::new(MongoUserDirectory::new(&db)),
                    config.jwt_secret.clone(),
                    config.write_retry_limit,
                ))
            }
            StoreBackend::Memory => {
                info!("Using in-memory stores, data is lost on restart");
                Ok(Self::in_memory(
                    Arc::new(InMemoryUserDirectory::new()),
                    &config.jwt_secret,
                    config.write_retry_limit,
                ))
            }
        }
    }

    /// Fresh in-memory stores. `users` is shared so callers can register names.
    pub fn in_memory(users: Arc<InMemoryUserDirectory>, jwt_secret: &str, retry_limit: u32) -> Self {
        Self::assemble(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryAdventureStore::new()),
            users,
            jwt_secret.to_string(),
            retry_limit,
        )
    }

    /// Register shared data, extractor error handling and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.community.clone())
            .app_data(self.adventures.clone())
            .app_data(self.auth.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                CustomError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                CustomError::ValidationError(err.to_string()).into()
            }))
            .configure(routes);
    }
}
