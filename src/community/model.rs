use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::community::likes::LikeSet;
use crate::utils::helpers::now;

/// A community post document. Comments and their replies live inside it, so
/// every mutation of the thread is a write of this one document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommunityPost {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub title: String,
    pub story: String,
    /// Weak reference; the adventure may be deleted independently.
    pub adventure_id: Option<ObjectId>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: LikeSet,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every write.
    #[serde(default)]
    pub version: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub text: String,
    #[serde(default)]
    pub likes: LikeSet,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reply {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub text: String,
    #[serde(default)]
    pub likes: LikeSet,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl CommunityPost {
    pub fn new(
        owner_id: ObjectId,
        title: String,
        story: String,
        adventure_id: Option<ObjectId>,
        media: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        let created_at = now();
        CommunityPost {
            id: ObjectId::new(),
            owner_id,
            title,
            story,
            adventure_id,
            media,
            tags,
            likes: LikeSet::new(),
            comments: Vec::new(),
            created_at,
            updated_at: created_at,
            version: 0,
        }
    }

    /// Every user id referenced by the post, its comments and replies.
    pub fn user_ids(&self) -> Vec<ObjectId> {
        let mut ids = vec![self.owner_id];
        for comment in &self.comments {
            ids.push(comment.author_id);
            ids.extend(comment.replies.iter().map(|reply| reply.author_id));
        }
        ids
    }
}

impl Comment {
    pub fn new(author_id: ObjectId, text: String) -> Self {
        let created_at = now();
        Comment {
            id: ObjectId::new(),
            author_id,
            text,
            likes: LikeSet::new(),
            replies: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Reply {
    pub fn new(author_id: ObjectId, text: String) -> Self {
        let created_at = now();
        Reply {
            id: ObjectId::new(),
            author_id,
            text,
            likes: LikeSet::new(),
            created_at,
            updated_at: created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub story: String,
    pub adventure_id: Option<String>,
    pub media: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Full replacement of the editable fields; absent lists become empty.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub story: String,
    pub media: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Body of comment and reply create/update requests.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}
