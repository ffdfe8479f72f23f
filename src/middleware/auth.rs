use actix_web::{Error, HttpMessage, HttpRequest, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::warn;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
}

/// Shared secret used to verify bearer tokens issued by the auth service.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

fn secret_for(req: &ServiceRequest) -> String {
    match req.app_data::<web::Data<AuthSettings>>() {
        Some(settings) => settings.jwt_secret.clone(),
        None => std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()),
    }
}

/// Verify the bearer JWT and attach its claims to the request.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let secret = secret_for(&req);

    let token_data = match decode::<Claims>(
        credentials.token(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => data,
        Err(e) => {
            warn!("rejected bearer token on {}: {e}", req.path());
            return Err((
                CustomError::UnauthorizedError("Invalid token".into()).into(),
                req,
            ));
        }
    };

    req.extensions_mut().insert(token_data.claims);
    Ok(req)
}

/// Issue a token for `user_id`, valid for `ttl_hours`.
pub fn create_token(user_id: &str, secret: &str, ttl_hours: i64) -> Result<String, CustomError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(ttl_hours))
        .ok_or_else(|| CustomError::InternalServerError("Invalid token expiry".into()))?
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| CustomError::InternalServerError("Token generation failed".into()))
}

/// Get user ID from request extensions (use after auth middleware)
pub fn get_user_id_from_request(req: &HttpRequest) -> Option<String> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.id.clone())
}

/// The verified actor of a request that passed `verify_token`.
pub fn actor_id(req: &HttpRequest) -> Result<ObjectId, CustomError> {
    let user_id = get_user_id_from_request(req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".into()))?;

    ObjectId::parse_str(&user_id)
        .map_err(|_| CustomError::UnauthorizedError("Invalid user id in token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn issued_tokens_decode_with_the_same_secret() {
        let user = ObjectId::new().to_hex();
        let token = create_token(&user, "s3cret", 1).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"s3cret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.id, user);

        assert!(
            decode::<Claims>(
                &token,
                &DecodingKey::from_secret(b"other"),
                &Validation::default()
            )
            .is_err()
        );
    }

    #[test]
    fn actor_requires_claims() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            actor_id(&req),
            Err(CustomError::UnauthorizedError(_))
        ));

        let id = ObjectId::new();
        req.extensions_mut().insert(Claims {
            id: id.to_hex(),
            exp: usize::MAX,
        });
        assert_eq!(actor_id(&req).unwrap(), id);
    }
}
