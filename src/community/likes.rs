use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Set of user ids that liked a post, comment or reply.
///
/// Stored as an array; membership is all that matters, so duplicates read
/// back from storage are collapsed on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ObjectId>", into = "Vec<ObjectId>")]
pub struct LikeSet(Vec<ObjectId>);

/// Result of a toggle, returned to the client as `{likes, isLiked}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub likes: usize,
    pub is_liked: bool,
}

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, user_id: &ObjectId) -> bool {
        self.0.contains(user_id)
    }

    /// Flips membership of `user_id`: present is removed, absent is added.
    pub fn toggle(&mut self, user_id: ObjectId) -> LikeToggle {
        let is_liked = if self.contains(&user_id) {
            self.0.retain(|id| *id != user_id);
            false
        } else {
            self.0.push(user_id);
            true
        };

        LikeToggle {
            likes: self.len(),
            is_liked,
        }
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(|id| id.to_hex()).collect()
    }
}

impl From<Vec<ObjectId>> for LikeSet {
    fn from(mut ids: Vec<ObjectId>) -> Self {
        let mut seen = Vec::with_capacity(ids.len());
        ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        LikeSet(ids)
    }
}

impl From<LikeSet> for Vec<ObjectId> {
    fn from(set: LikeSet) -> Self {
        set.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut likes = LikeSet::from(vec![ObjectId::new(), ObjectId::new()]);
        let actor = ObjectId::new();

        let first = likes.toggle(actor);
        assert_eq!(first, LikeToggle { likes: 3, is_liked: true });

        let second = likes.toggle(actor);
        assert_eq!(second, LikeToggle { likes: 2, is_liked: false });
        assert!(!likes.contains(&actor));
    }

    #[test]
    fn independent_actors_accumulate() {
        let mut likes = LikeSet::new();
        let (a, b) = (ObjectId::new(), ObjectId::new());

        likes.toggle(a);
        let result = likes.toggle(b);

        assert_eq!(result.likes, 2);
        assert!(likes.contains(&a) && likes.contains(&b));
    }

    #[test]
    fn duplicates_collapse_on_load() {
        let actor = ObjectId::new();
        let mut likes = LikeSet::from(vec![actor, actor]);
        assert_eq!(likes.len(), 1);

        let result = likes.toggle(actor);
        assert_eq!(result, LikeToggle { likes: 0, is_liked: false });
        assert!(likes.is_empty());
    }

    #[test]
    fn hex_view_keeps_like_order() {
        let (a, b) = (ObjectId::new(), ObjectId::new());
        let likes = LikeSet::from(vec![a, b]);
        assert_eq!(likes.to_hex(), vec![a.to_hex(), b.to_hex()]);
    }
}
