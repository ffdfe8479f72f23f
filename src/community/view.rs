use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adventure::model::AdventureSummary;
use crate::community::model::{Comment, CommunityPost, Reply};
use crate::user::directory::NameBook;
use crate::user::model::UserRef;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: String,
    pub author: UserRef,
    pub text: String,
    pub likes: Vec<String>,
    pub like_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub author: UserRef,
    pub text: String,
    pub likes: Vec<String>,
    pub like_count: usize,
    pub replies: Vec<ReplyView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub owner: UserRef,
    pub title: String,
    pub story: String,
    pub adventure_id: Option<String>,
    /// `None` when no adventure is linked or the linked one was deleted.
    pub adventure: Option<AdventureSummary>,
    pub media: Vec<String>,
    pub tags: Vec<String>,
    pub likes: Vec<String>,
    pub like_count: usize,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
}

impl ReplyView {
    pub fn render(reply: &Reply, names: &NameBook) -> Self {
        ReplyView {
            id: reply.id.to_hex(),
            author: names.user(&reply.author_id),
            text: reply.text.clone(),
            likes: reply.likes.to_hex(),
            like_count: reply.likes.len(),
            created_at: reply.created_at,
            updated_at: reply.updated_at,
        }
    }
}

impl CommentView {
    pub fn render(comment: &Comment, names: &NameBook) -> Self {
        CommentView {
            id: comment.id.to_hex(),
            author: names.user(&comment.author_id),
            text: comment.text.clone(),
            likes: comment.likes.to_hex(),
            like_count: comment.likes.len(),
            replies: comment
                .replies
                .iter()
                .map(|reply| ReplyView::render(reply, names))
                .collect(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl PostView {
    pub fn render(
        post: &CommunityPost,
        names: &NameBook,
        adventure: Option<AdventureSummary>,
    ) -> Self {
        PostView {
            id: post.id.to_hex(),
            owner: names.user(&post.owner_id),
            title: post.title.clone(),
            story: post.story.clone(),
            adventure_id: post.adventure_id.map(|id| id.to_hex()),
            adventure,
            media: post.media.clone(),
            tags: post.tags.clone(),
            likes: post.likes.to_hex(),
            like_count: post.likes.len(),
            comments: post
                .comments
                .iter()
                .map(|comment| CommentView::render(comment, names))
                .collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
