use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};
use tokio::sync::RwLock;

use crate::community::model::CommunityPost;
use crate::utils::error::CustomError;
use crate::utils::pagination::{PageRequest, SortField, SortOrder};

/// Document store for community posts.
///
/// Writes to an existing post go through `replace_versioned`, which only
/// succeeds while the stored `version` still matches what the caller read.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: &CommunityPost) -> Result<(), CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<CommunityPost>, CustomError>;

    /// Matches only when `owner_id` owns the post. A foreign post and a
    /// missing one are indistinguishable to the caller.
    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<CommunityPost>, CustomError>;

    async fn list(&self, page: &PageRequest) -> Result<Vec<CommunityPost>, CustomError>;

    async fn count(&self) -> Result<u64, CustomError>;

    /// Stores `post` if the stored copy is still at `expected_version`.
    /// Returns `false` when another write got there first.
    async fn replace_versioned(
        &self,
        post: &CommunityPost,
        expected_version: i64,
    ) -> Result<bool, CustomError>;

    /// Deletes the post and everything embedded in it, if owned.
    async fn delete_owned(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoPostStore {
    collection: Collection<CommunityPost>,
}

impl MongoPostStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<CommunityPost>("community_posts");
        MongoPostStore { collection }
    }
}

/// Filter for a compare-and-swap write. Documents saved before versioning
/// have no `version` field and read back as version 0.
fn versioned_filter(id: &ObjectId, expected_version: i64) -> Document {
    if expected_version == 0 {
        doc! {
            "_id": id,
            "$or": [
                { "version": 0_i64 },
                { "version": { "$exists": false } },
            ],
        }
    } else {
        doc! { "_id": id, "version": expected_version }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, post: &CommunityPost) -> Result<(), CustomError> {
        self.collection.insert_one(post).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<CommunityPost>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<CommunityPost>, CustomError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "owner_id": owner_id })
            .await?)
    }

    async fn list(&self, page: &PageRequest) -> Result<Vec<CommunityPost>, CustomError> {
        let direction = page.order.direction();
        // `_id` breaks ties so pages never overlap.
        let mut sort = Document::new();
        sort.insert(page.sort.field_name(), direction);
        sort.insert("_id", direction);
        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);

        let cursor = self
            .collection
            .find(doc! {})
            .sort(sort)
            .skip(page.skip())
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn replace_versioned(
        &self,
        post: &CommunityPost,
        expected_version: i64,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .replace_one(versioned_filter(&post.id, expected_version), post)
            .await?;
        Ok(result.matched_count == 1)
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
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<ObjectId, CommunityPost>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &CommunityPost, b: &CommunityPost, sort: SortField) -> Ordering {
    let primary = match sort {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: &CommunityPost) -> Result<(), CustomError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(CustomError::ConflictError("Post already exists".into()));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<CommunityPost>, CustomError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn find_owned(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Option<CommunityPost>, CustomError> {
        Ok(self
            .posts
            .read()
            .await
            .get(id)
            .filter(|post| post.owner_id == *owner_id)
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<Vec<CommunityPost>, CustomError> {
        let posts = self.posts.read().await;
        let mut sorted: Vec<&CommunityPost> = posts.values().collect();
        sorted.sort_by(|a, b| match page.order {
            SortOrder::Asc => compare(a, b, page.sort),
            SortOrder::Desc => compare(b, a, page.sort),
        });

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        Ok(sorted
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn replace_versioned(
        &self,
        post: &CommunityPost,
        expected_version: i64,
    ) -> Result<bool, CustomError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = post.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_owned(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<bool, CustomError> {
        let mut posts = self.posts.write().await;
        let owned = posts.get(id).is_some_and(|post| post.owner_id == *owner_id);
        if owned {
            posts.remove(id);
        }
        Ok(owned)
    }
}
