use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error as ActixError, FromRequest, HttpRequest,
};
use anyhow::{anyhow, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::config;
use crate::database::models::{AuthResponse, CreateUserInput, LoginInput, User, UserRole};
use crate::database::repositories::user as user_repo;

/// The authenticated principal: an opaque id and a global role. Everything
/// downstream trusts this pair; per-team authority (captaincy) is checked
/// against the database, not the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    match decode::<Claims>(
                        token,
                        &DecodingKey::from_secret(config().jwt_secret.as_ref()),
                        &Validation::new(Algorithm::HS256),
                    ) {
                        Ok(token_data) => {
                            return ready(Ok(token_data.claims));
                        }
                        Err(_) => {
                            return ready(Err(ErrorUnauthorized("Invalid token")));
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

pub fn generate_token(user: &User) -> Result<String> {
    let expiration = Utc::now() + Duration::days(config().jwt_expiration_days);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config().jwt_secret.as_ref()),
    )?;

    Ok(token)
}

pub async fn register(input: CreateUserInput) -> Result<AuthResponse> {
    if user_repo::find_by_email(&input.email).await?.is_some() {
        return Err(anyhow!("Email already registered"));
    }

    let password_hash = hash(&input.password, DEFAULT_COST)?;

    let user = user_repo::create_user(
        &input.email,
        &password_hash,
        &input.first_name,
        &input.last_name,
        &input.student_id,
    )
    .await?;

    let token = generate_token(&user)?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login(input: LoginInput) -> Result<AuthResponse> {
    let user = user_repo::find_by_email(&input.email)
        .await?
        .ok_or_else(|| anyhow!("Invalid email or password"))?;

    if !verify(&input.password, &user.password_hash)? {
        return Err(anyhow!("Invalid email or password"));
    }

    let token = generate_token(&user)?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{set_config, Config};
    use pretty_assertions::assert_eq;

    fn test_config() {
        set_config(Config {
            database_url: "postgres://unused".to_string(),
            jwt_secret: "unit-test-secret".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        });
    }

    #[test]
    fn claims_round_trip_through_a_token() {
        test_config();

        let user = User {
            id: Uuid::new_v4(),
            email: "cap@example.edu".to_string(),
            password_hash: String::new(),
            first_name: "Casey".to_string(),
            last_name: "Nguyen".to_string(),
            student_id: "S12345".to_string(),
            role: UserRole::Captain,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let token = generate_token(&user).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config().jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;

        assert_eq!(decoded.sub, user.id);
        assert_eq!(decoded.email, user.email);
        assert_eq!(decoded.role, UserRole::Captain);
        assert!(!decoded.is_admin());
    }
}
