use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use mongodb::bson::oid::ObjectId;

use crate::adventure::model::AdventureSummary;
use crate::adventure::store::AdventureStore;
use crate::community::likes::LikeToggle;
use crate::community::model::{CommunityPost, CreatePostRequest, UpdatePostRequest};
use crate::community::store::PostStore;
use crate::community::view::{CommentView, PostPage, PostView, ReplyView};
use crate::user::directory::{NameBook, UserDirectory};
use crate::utils::error::CustomError;
use crate::utils::helpers::{now, parse_object_id, required_text};
use crate::utils::pagination::PageRequest;
use crate::utils::retry::{Attempt, retry_on_conflict};

pub const DEFAULT_RETRY_LIMIT: u32 = 5;

pub struct CommunityService {
    posts: Arc<dyn PostStore>,
    adventures: Arc<dyn AdventureStore>,
    users: Arc<dyn UserDirectory>,
    retry_limit: u32,
}

/// Trims tags, drops blanks and repeats, keeps first-seen order.
fn normalize_tags(tags: Option<Vec<String>>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags.unwrap_or_default() {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

impl CommunityService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        adventures: Arc<dyn AdventureStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        CommunityService {
            posts,
            adventures,
            users,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Loads the post, applies `apply` and writes it back against the version
    /// that was read. A concurrent write to the same post forces a reload and
    /// a fresh application of `apply`.
    async fn mutate_post<T, F>(
        &self,
        post_id: &ObjectId,
        apply: F,
    ) -> Result<(CommunityPost, T), CustomError>
    where
        F: Fn(&mut CommunityPost) -> Result<T, CustomError>,
    {
        let apply = &apply;
        retry_on_conflict("Post", self.retry_limit, move || async move {
            let mut post = self
                .posts
                .find_by_id(post_id)
                .await?
                .ok_or_else(|| CustomError::not_found("Post"))?;

            let expected = post.version;
            let outcome = apply(&mut post)?;
            post.version = expected + 1;

            if self.posts.replace_versioned(&post, expected).await? {
                Ok::<_, CustomError>(Attempt::Done((post, outcome)))
            } else {
                Ok(Attempt::Conflict)
            }
        })
        .await
    }

    async fn names_for(&self, posts: &[CommunityPost]) -> Result<NameBook, CustomError> {
        NameBook::load(
            self.users.as_ref(),
            posts.iter().flat_map(CommunityPost::user_ids),
        )
        .await
    }

    async fn render_posts(&self, posts: &[CommunityPost]) -> Result<Vec<PostView>, CustomError> {
        let names = self.names_for(posts).await?;

        let mut adventure_ids: Vec<ObjectId> =
            posts.iter().filter_map(|post| post.adventure_id).collect();
        adventure_ids.sort();
        adventure_ids.dedup();
        let adventures = if adventure_ids.is_empty() {
            HashMap::new()
        } else {
            self.adventures.find_many(&adventure_ids).await?
        };

        Ok(posts
            .iter()
            .map(|post| {
                let summary = post
                    .adventure_id
                    .and_then(|id| adventures.get(&id))
                    .map(AdventureSummary::from);
                PostView::render(post, &names, summary)
            })
            .collect())
    }

    async fn render_post(&self, post: &CommunityPost) -> Result<PostView, CustomError> {
        let mut views = self.render_posts(std::slice::from_ref(post)).await?;
        views
            .pop()
            .ok_or_else(|| CustomError::InternalServerError("Failed to render post".into()))
    }

    async fn render_comment(
        &self,
        post: &CommunityPost,
        comment_id: &ObjectId,
    ) -> Result<CommentView, CustomError> {
        let comment = post.comment(comment_id)?;
        let names = self.names_for(std::slice::from_ref(post)).await?;
        Ok(CommentView::render(comment, &names))
    }

    async fn render_reply(
        &self,
        post: &CommunityPost,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
    ) -> Result<ReplyView, CustomError> {
        let reply = post.reply(comment_id, reply_id)?;
        let names = NameBook::load(self.users.as_ref(), [reply.author_id]).await?;
        Ok(ReplyView::render(reply, &names))
    }

    pub async fn list_posts(&self, page: PageRequest) -> Result<PostPage, CustomError> {
        let posts = self.posts.list(&page).await?;
        let total = self.posts.count().await?;

        Ok(PostPage {
            posts: self.render_posts(&posts).await?,
            current_page: page.page,
            total_pages: page.total_pages(total),
            total_posts: total,
        })
    }

    pub async fn create_post(
        &self,
        owner_id: ObjectId,
        request: CreatePostRequest,
    ) -> Result<PostView, CustomError> {
        let title = required_text(&request.title, "Title")?;
        let story = required_text(&request.story, "Story")?;

        let adventure_id = match request.adventure_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let id = parse_object_id(raw, "adventure")?;
                // Read once; a concurrent adventure delete leaves a dangling weak reference.
                self.adventures
                    .find_owned(&id, &owner_id)
                    .await?
                    .ok_or_else(|| CustomError::not_found("Adventure"))?;
                Some(id)
            }
            _ => None,
        };

        let post = CommunityPost::new(
            owner_id,
            title,
            story,
            adventure_id,
            request.media.unwrap_or_default(),
            normalize_tags(request.tags),
        );

        self.posts.insert(&post).await?;
        info!("post {} created by user {}", post.id, owner_id);

        self.render_post(&post).await
    }

    pub async fn update_post(
        &self,
        post_id: &ObjectId,
        actor: &ObjectId,
        request: UpdatePostRequest,
    ) -> Result<PostView, CustomError> {
        let title = required_text(&request.title, "Title")?;
        let story = required_text(&request.story, "Story")?;
        let media = request.media.unwrap_or_default();
        let tags = normalize_tags(request.tags);

        let (title, story, media, tags) = (&title, &story, &media, &tags);
        let updated = retry_on_conflict("Post", self.retry_limit, move || async move {
            let Some(mut post) = self.posts.find_owned(post_id, actor).await? else {
                return Err(CustomError::NotFoundError(
                    "Post not found or unauthorized".into(),
                ));
            };

            let expected = post.version;
            post.title = title.clone();
            post.story = story.clone();
            post.media = media.clone();
            post.tags = tags.clone();
            post.updated_at = now();
            post.version = expected + 1;

            if self.posts.replace_versioned(&post, expected).await? {
                Ok::<_, CustomError>(Attempt::Done(post))
            } else {
                Ok(Attempt::Conflict)
            }
        })
        .await?;

        info!("post {post_id} updated by user {actor}");
        self.render_post(&updated).await
    }

    pub async fn delete_post(&self, post_id: &ObjectId, actor: &ObjectId) -> Result<(), CustomError> {
        if !self.posts.delete_owned(post_id, actor).await? {
            return Err(CustomError::NotFoundError(
                "Post not found or unauthorized".into(),
            ));
        }
        info!("post {post_id} deleted by user {actor}");
        Ok(())
    }

    pub async fn toggle_post_like(
        &self,
        post_id: &ObjectId,
        actor: ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        let (_, toggle) = self
            .mutate_post(post_id, |post| Ok(post.toggle_like(actor)))
            .await?;
        Ok(toggle)
    }

    pub async fn add_comment(
        &self,
        post_id: &ObjectId,
        actor: ObjectId,
        text: &str,
    ) -> Result<CommentView, CustomError> {
        let text = required_text(text, "Comment text")?;

        let (post, comment_id) = self
            .mutate_post(post_id, |post| Ok(post.add_comment(actor, text.clone())))
            .await?;

        info!("comment {comment_id} added to post {post_id} by user {actor}");
        self.render_comment(&post, &comment_id).await
    }

    pub async fn update_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        actor: &ObjectId,
        text: &str,
    ) -> Result<CommentView, CustomError> {
        let text = required_text(text, "Comment text")?;

        let (post, ()) = self
            .mutate_post(post_id, |post| {
                post.edit_comment(comment_id, actor, text.clone())
            })
            .await?;

        self.render_comment(&post, comment_id).await
    }

    pub async fn delete_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        actor: &ObjectId,
    ) -> Result<(), CustomError> {
        let (_, removed) = self
            .mutate_post(post_id, |post| post.remove_comment(comment_id, actor))
            .await?;

        info!(
            "comment {comment_id} removed from post {post_id} with {} replies",
            removed.replies.len()
        );
        Ok(())
    }

    pub async fn toggle_comment_like(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        actor: ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        let (_, toggle) = self
            .mutate_post(post_id, |post| post.toggle_comment_like(comment_id, actor))
            .await?;
        Ok(toggle)
    }

    pub async fn add_reply(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        actor: ObjectId,
        text: &str,
    ) -> Result<ReplyView, CustomError> {
        let text = required_text(text, "Reply text")?;

        let (post, reply_id) = self
            .mutate_post(post_id, |post| {
                post.add_reply(comment_id, actor, text.clone())
            })
            .await?;

        info!("reply {reply_id} added to comment {comment_id} by user {actor}");
        self.render_reply(&post, comment_id, &reply_id).await
    }

    pub async fn update_reply(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: &ObjectId,
        text: &str,
    ) -> Result<ReplyView, CustomError> {
        let text = required_text(text, "Reply text")?;

        let (post, ()) = self
            .mutate_post(post_id, |post| {
                post.edit_reply(comment_id, reply_id, actor, text.clone())
            })
            .await?;

        self.render_reply(&post, comment_id, reply_id).await
    }

    pub async fn delete_reply(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: &ObjectId,
    ) -> Result<(), CustomError> {
        self.mutate_post(post_id, |post| {
            post.remove_reply(comment_id, reply_id, actor)
        })
        .await?;
        Ok(())
    }

    pub async fn toggle_reply_like(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        let (_, toggle) = self
            .mutate_post(post_id, |post| {
                post.toggle_reply_like(comment_id, reply_id, actor)
            })
            .await?;
        Ok(toggle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::store::InMemoryAdventureStore;
    use crate::community::store::InMemoryPostStore;
    use crate::user::directory::InMemoryUserDirectory;
    use futures_util::future::join_all;

    fn service(retry_limit: u32) -> CommunityService {
        CommunityService::new(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryAdventureStore::new()),
            Arc::new(InMemoryUserDirectory::new()),
        )
        .with_retry_limit(retry_limit)
    }

    fn request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.into(),
            story: "story".into(),
            adventure_id: None,
            media: None,
            tags: Some(vec!["a".into(), " b ".into(), "a".into(), "  ".into()]),
        }
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(
            normalize_tags(Some(vec!["x".into(), " y".into(), "x ".into(), "".into()])),
            vec!["x".to_string(), "y".to_string()]
        );
        assert!(normalize_tags(None).is_empty());
    }

    #[actix_web::test]
    async fn concurrent_likes_are_all_kept() {
        let service = service(50);
        let owner = ObjectId::new();
        let post = service.create_post(owner, request("busy")).await.unwrap();
        let post_id = ObjectId::parse_str(&post.id).unwrap();
        assert_eq!(post.tags, vec!["a".to_string(), "b".to_string()]);

        let fans: Vec<ObjectId> = (0..8).map(|_| ObjectId::new()).collect();
        let results =
            join_all(fans.iter().map(|fan| service.toggle_post_like(&post_id, *fan))).await;
        assert!(results.iter().all(Result::is_ok));

        let page = service.list_posts(PageRequest::default()).await.unwrap();
        assert_eq!(page.posts[0].like_count, fans.len());
    }

    #[actix_web::test]
    async fn concurrent_comments_and_deletes_do_not_resurrect() {
        let service = service(50);
        let owner = ObjectId::new();
        let post = service.create_post(owner, request("thread")).await.unwrap();
        let post_id = ObjectId::parse_str(&post.id).unwrap();

        let doomed = service.add_comment(&post_id, owner, "doomed").await.unwrap();
        let doomed_id = ObjectId::parse_str(&doomed.id).unwrap();

        let (deleted, added) = futures_util::join!(
            service.delete_comment(&post_id, &doomed_id, &owner),
            service.add_comment(&post_id, owner, "survivor"),
        );
        deleted.unwrap();
        added.unwrap();

        let page = service.list_posts(PageRequest::default()).await.unwrap();
        let texts: Vec<&str> = page.posts[0]
            .comments
            .iter()
            .map(|comment| comment.text.as_str())
            .collect();
        assert_eq!(texts, vec!["survivor"]);
    }

    #[actix_web::test]
    async fn replies_need_an_existing_comment() {
        let service = service(5);
        let owner = ObjectId::new();
        let post = service.create_post(owner, request("empty")).await.unwrap();
        let post_id = ObjectId::parse_str(&post.id).unwrap();

        let err = service
            .add_reply(&post_id, &ObjectId::new(), owner, "hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));

        let err = service
            .add_comment(&ObjectId::new(), owner, "anyone?")
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }
}
