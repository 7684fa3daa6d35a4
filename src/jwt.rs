use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::authz::SnapshotBuilder;
use crate::errors::AppError;
use crate::models::{User, UserId, UserPermissions};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    ResetPassword,
    TwoFactor,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    /// Also the upper bound on how stale an embedded permission snapshot can be.
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub reset_password_ttl: Duration,
    pub two_factor_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(24 * 7),
            reset_password_ttl: Duration::minutes(30),
            two_factor_ttl: Duration::minutes(5),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let defaults = Self::new(secret.into_bytes());

        Ok(Self {
            access_ttl: env_duration("JWT_ACCESS_TTL_MINUTES", Duration::try_minutes, defaults.access_ttl)?,
            refresh_ttl: env_duration("JWT_REFRESH_TTL_HOURS", Duration::try_hours, defaults.refresh_ttl)?,
            reset_password_ttl: env_duration("JWT_RESET_TTL_MINUTES", Duration::try_minutes, defaults.reset_password_ttl)?,
            two_factor_ttl: env_duration("JWT_TWO_FACTOR_TTL_MINUTES", Duration::try_minutes, defaults.two_factor_ttl)?,
            ..defaults
        })
    }

    pub fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
            TokenType::ResetPassword => self.reset_password_ttl,
            TokenType::TwoFactor => self.two_factor_ttl,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    /// Checks signature and expiry. Tokens signed with any algorithm other
    /// than HS256 are rejected.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

fn env_duration(key: &str, unit: fn(i64) -> Option<Duration>, default: Duration) -> Result<Duration, AppError> {
    match std::env::var(key) {
        Ok(value) => parse_ttl(key, &value, unit),
        Err(_) => Ok(default),
    }
}

/// TTLs must be positive and representable as a `Duration`.
fn parse_ttl(key: &str, value: &str, unit: fn(i64) -> Option<Duration>) -> Result<Duration, AppError> {
    let amount = value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::configuration(format!("{key} must be a valid integer")))?;

    if amount <= 0 {
        return Err(AppError::configuration(format!("{key} must be positive")));
    }

    unit(amount).ok_or_else(|| AppError::configuration(format!("{key} is out of range")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub sub: UserId,
    pub username: String,
    pub is_superuser: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<UserPermissions>,
    pub exp: usize,
    pub iat: usize,
}

/// Issues and verifies signed bearer tokens.
///
/// Only access tokens carry a permission snapshot; refresh, reset-password and
/// two-factor tokens are never used for authorization decisions.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<JwtConfig>,
    snapshots: SnapshotBuilder,
}

impl TokenService {
    pub fn new(config: JwtConfig, snapshots: SnapshotBuilder) -> Self {
        Self {
            config: Arc::new(config),
            snapshots,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub async fn access_token(&self, user: &User) -> Result<String, AppError> {
        let permissions = self.snapshots.build(user).await;
        self.sign(user, TokenType::Access, Some(permissions))
    }

    pub fn refresh_token(&self, user: &User) -> Result<String, AppError> {
        self.sign(user, TokenType::Refresh, None)
    }

    pub fn reset_password_token(&self, user: &User) -> Result<String, AppError> {
        self.sign(user, TokenType::ResetPassword, None)
    }

    pub fn two_factor_token(&self, user: &User) -> Result<String, AppError> {
        self.sign(user, TokenType::TwoFactor, None)
    }

    pub fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.config.decode(token)?;

        if claims.token_type != expected {
            return Err(AppError::token(format!(
                "expected {expected:?} token, got {:?}",
                claims.token_type
            )));
        }

        Ok(claims)
    }

    fn sign(&self, user: &User, token_type: TokenType, permissions: Option<UserPermissions>) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.config.ttl(token_type))
            .ok_or_else(|| AppError::configuration(format!("{token_type:?} token ttl is out of range")))?;

        let claims = Claims {
            token_type,
            sub: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            permissions,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        self.config.encode(&claims)
    }
}
