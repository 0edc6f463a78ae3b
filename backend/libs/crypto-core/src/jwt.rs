/// Shared JWT validation for the posts backend
///
/// Tokens are issued by the external auth service and signed with HS256 using a
/// secret shared with every service that validates them. The subject claim
/// carries the integer user id.
///
/// ## Usage
///
/// Services call `initialize_jwt_secret()` once during startup before any JWT
/// operation:
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET required");
/// jwt::initialize_jwt_secret(&secret).expect("Failed to initialize JWT secret");
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 30;

/// Only HS256 is accepted; tokens signed with any other algorithm are rejected.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims carried by access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as decimal string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize the signing and validation keys from the shared secret
///
/// Can only be called once; subsequent calls return an error.
pub fn initialize_jwt_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    JWT_ENCODING_KEY
        .set(EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(DecodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    tracing::info!("JWT keys initialized (HS256)");
    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup."))
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup."))
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate an access token for `user_id`
///
/// Token issuance belongs to the auth service; this exists so that tooling and
/// tests can mint tokens the validators accept.
pub fn generate_access_token(user_id: i32) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, get_encoding_key()?)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token (without the "Bearer " prefix)
///
/// Checks the HS256 signature and expiration.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract the user id from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<i32> {
    let token_data = validate_token(token)?;
    token_data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}
