use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use tokio::sync::RwLock;

use crate::user::model::{UserProfile, UserRef};
use crate::utils::error::CustomError;

/// Resolves display names for user ids at read time.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn usernames(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, String>, CustomError>;
}

/// Lookup table built from one `usernames` call.
#[derive(Debug, Default)]
pub struct NameBook {
    names: HashMap<ObjectId, String>,
}

impl NameBook {
    pub async fn load(
        directory: &dyn UserDirectory,
        ids: impl IntoIterator<Item = ObjectId>,
    ) -> Result<Self, CustomError> {
        let mut ids: Vec<ObjectId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        if ids.is_empty() {
            return Ok(NameBook::default());
        }

        let names = directory.usernames(&ids).await?;
        Ok(NameBook { names })
    }

    pub fn user(&self, id: &ObjectId) -> UserRef {
        UserRef::new(id, self.names.get(id).cloned())
    }
}

pub struct MongoUserDirectory {
    collection: Collection<UserProfile>,
}

impl MongoUserDirectory {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<UserProfile>("users");
        MongoUserDirectory { collection }
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn usernames(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, String>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .projection(doc! { "_id": 1, "username": 1 })
            .await?;

        let users: Vec<UserProfile> = cursor.try_collect().await?;

        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<ObjectId, String>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: ObjectId, username: &str) {
        self.users.write().await.insert(id, username.to_string());
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn usernames(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, String>, CustomError> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|name| (*id, name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn name_book_resolves_known_users_only() {
        let directory = InMemoryUserDirectory::new();
        let alice = ObjectId::new();
        let ghost = ObjectId::new();
        directory.register(alice, "alice").await;

        let book = NameBook::load(&directory, [alice, ghost, alice]).await.unwrap();

        assert_eq!(book.user(&alice).username.as_deref(), Some("alice"));
        assert_eq!(book.user(&ghost).username, None);
        assert_eq!(book.user(&ghost).id, ghost.to_hex());
    }
}
