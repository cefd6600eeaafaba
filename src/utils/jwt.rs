use jsonwebtoken::{encode, EncodingKey, Header};

use crate::config::get_config;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

/// Issues a signed bearer token for the given user. The subject is the
/// stringified user id so handlers can parse it back without a lookup.
pub fn sign_token(user_id: i64, email: &str) -> Result<String> {
    let config = get_config();
    let exp = (chrono::Utc::now() + chrono::Duration::hours(config.jwt_expire_hours)).timestamp()
        as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Token signing failed: {}", e)))
}
