use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Claims issued by the identity provider. Only HS256 access tokens are accepted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })
}

#[cfg(test)]
pub fn issue_test_token(user_id: Uuid, email: Option<&str>, ttl_secs: i64, config: &Config) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .expect("test token encodes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token_round_trips_subject() {
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let token = issue_test_token(user_id, Some("a@example.com"), 600, &config);

        let data = verify_token(&token, &config).unwrap();
        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Config::for_tests();
        let token = issue_test_token(Uuid::new_v4(), None, -3600, &config);
        assert!(matches!(verify_token(&token, &config), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = Config::for_tests();
        let token = issue_test_token(Uuid::new_v4(), None, 600, &config);

        let other = Config {
            jwt_secret: "another-secret".into(),
            ..Config::for_tests()
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthorized)));
    }
}
