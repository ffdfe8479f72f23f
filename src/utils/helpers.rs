use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::oid::ObjectId;

use crate::utils::error::CustomError;

/// Current time at the millisecond precision the document store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Parses a hex id taken from a path or body, naming the resource on failure.
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| CustomError::BadRequestError(format!("Invalid {what} ID")))
}

/// Trims `raw` and rejects it when nothing is left.
pub fn required_text(raw: &str, field: &str) -> Result<String, CustomError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CustomError::ValidationError(format!("{field} is required")));
    }
    Ok(text.to_string())
}
