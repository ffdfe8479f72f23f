//! Comment and reply operations on a loaded post document.
//!
//! Nodes are always located by id, never by position, so a retried write
//! applies to the same node even if other comments were appended or removed
//! in the meantime.

use mongodb::bson::oid::ObjectId;

use crate::community::likes::LikeToggle;
use crate::community::model::{Comment, CommunityPost, Reply};
use crate::utils::helpers::now;
use crate::utils::error::CustomError;

trait Authored {
    const KIND: &'static str;
    fn author_id(&self) -> &ObjectId;
}

impl Authored for Comment {
    const KIND: &'static str = "comment";
    fn author_id(&self) -> &ObjectId {
        &self.author_id
    }
}

impl Authored for Reply {
    const KIND: &'static str = "reply";
    fn author_id(&self) -> &ObjectId {
        &self.author_id
    }
}

fn ensure_author<N: Authored>(node: &N, actor: &ObjectId, action: &str) -> Result<(), CustomError> {
    if node.author_id() != actor {
        return Err(CustomError::ForbiddenError(format!(
            "Not authorized to {action} this {}",
            N::KIND
        )));
    }
    Ok(())
}

impl CommunityPost {
    pub fn comment(&self, comment_id: &ObjectId) -> Result<&Comment, CustomError> {
        self.comments
            .iter()
            .find(|c| c.id == *comment_id)
            .ok_or_else(|| CustomError::not_found("Comment"))
    }

    fn comment_mut(&mut self, comment_id: &ObjectId) -> Result<&mut Comment, CustomError> {
        self.comments
            .iter_mut()
            .find(|c| c.id == *comment_id)
            .ok_or_else(|| CustomError::not_found("Comment"))
    }

    pub fn reply(&self, comment_id: &ObjectId, reply_id: &ObjectId) -> Result<&Reply, CustomError> {
        self.comment(comment_id)?
            .replies
            .iter()
            .find(|r| r.id == *reply_id)
            .ok_or_else(|| CustomError::not_found("Reply"))
    }

    fn reply_mut(
        &mut self,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
    ) -> Result<&mut Reply, CustomError> {
        self.comment_mut(comment_id)?
            .replies
            .iter_mut()
            .find(|r| r.id == *reply_id)
            .ok_or_else(|| CustomError::not_found("Reply"))
    }

    pub fn add_comment(&mut self, author_id: ObjectId, text: String) -> ObjectId {
        let comment = Comment::new(author_id, text);
        let id = comment.id;
        self.comments.push(comment);
        id
    }

    pub fn add_reply(
        &mut self,
        comment_id: &ObjectId,
        author_id: ObjectId,
        text: String,
    ) -> Result<ObjectId, CustomError> {
        let comment = self.comment_mut(comment_id)?;
        let reply = Reply::new(author_id, text);
        let id = reply.id;
        comment.replies.push(reply);
        Ok(id)
    }

    pub fn edit_comment(
        &mut self,
        comment_id: &ObjectId,
        actor: &ObjectId,
        text: String,
    ) -> Result<(), CustomError> {
        let comment = self.comment_mut(comment_id)?;
        ensure_author(&*comment, actor, "edit")?;
        comment.text = text;
        comment.updated_at = now();
        Ok(())
    }

    pub fn edit_reply(
        &mut self,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: &ObjectId,
        text: String,
    ) -> Result<(), CustomError> {
        let reply = self.reply_mut(comment_id, reply_id)?;
        ensure_author(&*reply, actor, "edit")?;
        reply.text = text;
        reply.updated_at = now();
        Ok(())
    }

    /// Removes the comment together with all of its replies.
    pub fn remove_comment(
        &mut self,
        comment_id: &ObjectId,
        actor: &ObjectId,
    ) -> Result<Comment, CustomError> {
        ensure_author(self.comment(comment_id)?, actor, "delete")?;
        let position = self
            .comments
            .iter()
            .position(|c| c.id == *comment_id)
            .ok_or_else(|| CustomError::not_found("Comment"))?;
        Ok(self.comments.remove(position))
    }

    pub fn remove_reply(
        &mut self,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: &ObjectId,
    ) -> Result<Reply, CustomError> {
        ensure_author(self.reply(comment_id, reply_id)?, actor, "delete")?;
        let replies = &mut self.comment_mut(comment_id)?.replies;
        let position = replies
            .iter()
            .position(|r| r.id == *reply_id)
            .ok_or_else(|| CustomError::not_found("Reply"))?;
        Ok(replies.remove(position))
    }

    pub fn toggle_like(&mut self, actor: ObjectId) -> LikeToggle {
        self.likes.toggle(actor)
    }

    pub fn toggle_comment_like(
        &mut self,
        comment_id: &ObjectId,
        actor: ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        Ok(self.comment_mut(comment_id)?.likes.toggle(actor))
    }

    pub fn toggle_reply_like(
        &mut self,
        comment_id: &ObjectId,
        reply_id: &ObjectId,
        actor: ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        Ok(self.reply_mut(comment_id, reply_id)?.likes.toggle(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_by(owner: ObjectId) -> CommunityPost {
        CommunityPost::new(owner, "Kyoto".into(), "Temples".into(), None, vec![], vec![])
    }

    #[test]
    fn reply_lands_under_the_addressed_comment() {
        let (u1, u2) = (ObjectId::new(), ObjectId::new());
        let mut post = post_by(u1);
        let first = post.add_comment(u2, "first".into());
        let second = post.add_comment(u2, "second".into());

        let reply = post.add_reply(&second, u1, "thanks".into()).unwrap();

        assert!(post.comment(&first).unwrap().replies.is_empty());
        assert_eq!(post.reply(&second, &reply).unwrap().text, "thanks");
    }

    #[test]
    fn missing_levels_are_not_found() {
        let u1 = ObjectId::new();
        let mut post = post_by(u1);
        let comment = post.add_comment(u1, "hi".into());

        let err = post.add_reply(&ObjectId::new(), u1, "x".into()).unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(ref m) if m == "Comment not found"));

        let err = post
            .edit_reply(&comment, &ObjectId::new(), &u1, "x".into())
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(ref m) if m == "Reply not found"));
    }

    #[test]
    fn only_the_author_edits_or_deletes() {
        let (u1, u2) = (ObjectId::new(), ObjectId::new());
        let mut post = post_by(u1);
        let comment = post.add_comment(u2, "nice!".into());
        let reply = post.add_reply(&comment, u1, "thanks".into()).unwrap();

        assert!(matches!(
            post.edit_comment(&comment, &u1, "hijack".into()),
            Err(CustomError::ForbiddenError(_))
        ));
        assert!(matches!(
            post.remove_reply(&comment, &reply, &u2),
            Err(CustomError::ForbiddenError(_))
        ));
        assert!(matches!(
            post.remove_comment(&comment, &u1),
            Err(CustomError::ForbiddenError(_))
        ));
        assert_eq!(post.comment(&comment).unwrap().text, "nice!");
    }

    #[test]
    fn edit_changes_text_and_timestamp_only() {
        let u1 = ObjectId::new();
        let mut post = post_by(u1);
        let comment = post.add_comment(u1, "draft".into());
        let created_at = post.comment(&comment).unwrap().created_at;

        post.edit_comment(&comment, &u1, "final".into()).unwrap();

        let edited = post.comment(&comment).unwrap();
        assert_eq!(edited.id, comment);
        assert_eq!(edited.text, "final");
        assert_eq!(edited.created_at, created_at);
        assert!(edited.updated_at >= created_at);
    }

    #[test]
    fn reply_edit_and_delete_follow_authorship() {
        let (u1, u2) = (ObjectId::new(), ObjectId::new());
        let mut post = post_by(u1);
        let comment = post.add_comment(u2, "nice!".into());
        let reply = post.add_reply(&comment, u1, "thanks".into()).unwrap();

        let earlier =
            post.reply(&comment, &reply).unwrap().created_at - chrono::Duration::hours(1);
        post.comments[0].replies[0].created_at = earlier;
        post.comments[0].replies[0].updated_at = earlier;

        post.edit_reply(&comment, &reply, &u1, "thanks a lot".into()).unwrap();
        let edited = post.reply(&comment, &reply).unwrap();
        assert_eq!(edited.id, reply);
        assert_eq!(edited.text, "thanks a lot");
        assert_eq!(edited.created_at, earlier);
        assert!(edited.updated_at > earlier);

        assert!(matches!(
            post.edit_reply(&comment, &reply, &u2, "hijack".into()),
            Err(CustomError::ForbiddenError(_))
        ));
        assert_eq!(post.reply(&comment, &reply).unwrap().text, "thanks a lot");

        let removed = post.remove_reply(&comment, &reply, &u1).unwrap();
        assert_eq!(removed.id, reply);
        assert!(post.comment(&comment).unwrap().replies.is_empty());
        assert!(matches!(
            post.remove_reply(&comment, &reply, &u1),
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[test]
    fn removing_a_comment_drops_its_replies() {
        let (u1, u2) = (ObjectId::new(), ObjectId::new());
        let mut post = post_by(u1);
        let keep = post.add_comment(u1, "keep".into());
        let doomed = post.add_comment(u2, "nice!".into());
        let reply = post.add_reply(&doomed, u1, "thanks".into()).unwrap();

        let removed = post.remove_comment(&doomed, &u2).unwrap();

        assert_eq!(removed.replies.len(), 1);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].id, keep);
        assert!(matches!(
            post.toggle_reply_like(&doomed, &reply, u2),
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[test]
    fn likes_toggle_at_every_level() {
        let (u1, u2) = (ObjectId::new(), ObjectId::new());
        let mut post = post_by(u1);
        let comment = post.add_comment(u2, "nice!".into());
        let reply = post.add_reply(&comment, u1, "thanks".into()).unwrap();

        assert!(post.toggle_like(u2).is_liked);
        assert!(post.toggle_comment_like(&comment, u1).unwrap().is_liked);
        let liked = post.toggle_reply_like(&comment, &reply, u2).unwrap();
        assert_eq!(liked.likes, 1);
        assert!(liked.is_liked);

        let unliked = post.toggle_reply_like(&comment, &reply, u2).unwrap();
        assert_eq!(unliked.likes, 0);
        assert!(!unliked.is_liked);
        assert_eq!(post.likes.len(), 1);
    }
}
