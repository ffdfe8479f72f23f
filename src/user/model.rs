use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Read-only view of an account in the `users` collection. Accounts are
/// created and authenticated elsewhere; this service only resolves names.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
}

/// Denormalized author/owner reference embedded in responses.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UserRef {
    pub id: String,
    pub username: Option<String>,
}

impl UserRef {
    pub fn new(id: &ObjectId, username: Option<String>) -> Self {
        UserRef {
            id: id.to_hex(),
            username,
        }
    }
}
