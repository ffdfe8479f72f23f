use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};
use tokio::sync::RwLock;

use crate::adventure::model::Adventure;
use crate::utils::error::CustomError;

#[async_trait]
pub trait AdventureStore: Send + Sync {
    async fn insert(&self, adventure: &Adventure) -> Result<(), CustomError>;

    /// Lookup that only matches an adventure owned by `owner_id`.
    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<Adventure>, CustomError>;

    /// Unscoped batch lookup used to render linked adventures.
    async fn find_many(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Adventure>, CustomError>;

    /// Adventures of `owner_id` with a non-empty itinerary, newest first.
    async fn list_for_owner(&self, owner_id: &ObjectId) -> Result<Vec<Adventure>, CustomError>;

    async fn delete_owned(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoAdventureStore {
    collection: Collection<Adventure>,
}

impl MongoAdventureStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Adventure>("adventures");
        MongoAdventureStore { collection }
    }
}

#[async_trait]
impl AdventureStore for MongoAdventureStore {
    async fn insert(&self, adventure: &Adventure) -> Result<(), CustomError> {
        self.collection.insert_one(adventure).await?;
        Ok(())
    }

    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<Adventure>, CustomError> {
        let adventure = self
            .collection
            .find_one(doc! { "_id": id, "owner_id": owner_id })
            .await?;
        Ok(adventure)
    }

    async fn find_many(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Adventure>, CustomError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        let adventures: Vec<Adventure> = cursor.try_collect().await?;

        Ok(adventures.into_iter().map(|a| (a.id, a)).collect())
    }

    async fn list_for_owner(&self, owner_id: &ObjectId) -> Result<Vec<Adventure>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {
                "owner_id": owner_id,
                "itinerary.text": { "$exists": true, "$ne": "" },
            })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn delete_owned(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "owner_id": owner_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Default)]
pub struct InMemoryAdventureStore {
    adventures: RwLock<HashMap<ObjectId, Adventure>>,
}

impl InMemoryAdventureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdventureStore for InMemoryAdventureStore {
    async fn insert(&self, adventure: &Adventure) -> Result<(), CustomError> {
        self.adventures
            .write()
            .await
            .insert(adventure.id, adventure.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<Adventure>, CustomError> {
        Ok(self
            .adventures
            .read()
            .await
            .get(id)
            .filter(|a| a.owner_id == *owner_id)
            .cloned())
    }

    async fn find_many(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Adventure>, CustomError> {
        let adventures = self.adventures.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| adventures.get(id).map(|a| (*id, a.clone())))
            .collect())
    }

    async fn list_for_owner(&self, owner_id: &ObjectId) -> Result<Vec<Adventure>, CustomError> {
        let mut owned: Vec<Adventure> = self
            .adventures
            .read()
            .await
            .values()
            .filter(|a| a.owner_id == *owner_id && !a.itinerary.text.is_empty())
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn delete_owned(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<bool, CustomError> {
        let mut adventures = self.adventures.write().await;
        let owned = adventures.get(id).is_some_and(|a| a.owner_id == *owner_id);
        if owned {
            adventures.remove(id);
        }
        Ok(owned)
    }
}
