use crate::database::UserStore;
use crate::models::{User, UserInfo};
use crate::utils::AppError;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_TTL_DAYS: i64 = 7;
pub const MIN_PASSWORD_LEN: usize = 6;

const JWT_ISSUER: &str = "medscan-service";
const JWT_AUDIENCE: &str = "medscan-api";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user _id as hex
    pub email: String,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

/// Signs and checks bearer tokens and owns the password hashing cost.
#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    hash_cost: u32,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(secret: &str, hash_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(TOKEN_TTL_DAYS),
            hash_cost,
        }
    }

    // Generate JWT token
    pub fn generate_jwt(&self, user: &User) -> Result<String, AppError> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::Internal("Cannot issue a token for an unsaved user".to_string()))?;

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: JWT_AUDIENCE.to_string(),
            iss: JWT_ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    // Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.set_issuer(&[JWT_ISSUER]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }

    fn auth_response(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = self.generate_jwt(&user)?;
        Ok(AuthResponse {
            success: true,
            token,
            user: UserInfo::from(user),
        })
    }

    // User registration
    pub async fn register(
        &self,
        users: &dyn UserStore,
        request: &RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let (name, email, password) = match (
            present(&request.name),
            present(&request.email),
            request.password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(name), Some(email), Some(password)) => (name, normalize_email(email), password),
            _ => {
                return Err(AppError::Validation(
                    "Name, email and password are required".to_string(),
                ))
            }
        };

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyRegistered("Email already registered".to_string()));
        }

        let hashed_password = hash(password, self.hash_cost)?;

        let now = BsonDateTime::now();
        let new_user = User {
            id: None,
            name: name.to_string(),
            email: email.clone(),
            password: Some(hashed_password),
            avatar: present(&request.avatar).map(str::to_string),
            search_history: Vec::new(),
            saved_medicines: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let user = users.insert(new_user).await?;

        log::info!("✅ User registered successfully: {}", email);

        self.auth_response(user)
    }

    // User login
    pub async fn login(
        &self,
        users: &dyn UserStore,
        request: &LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let (email, password) = match (present(&request.email), request.password.as_deref()) {
            (Some(email), Some(password)) if !password.is_empty() => (normalize_email(email), password),
            _ => {
                return Err(AppError::Validation(
                    "Email and password are required".to_string(),
                ))
            }
        };

        let user = users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        // Accounts created through an external identity provider have no password
        let stored_password = user.password.as_deref().ok_or_else(|| {
            AppError::Unauthorized(
                "This account uses an external sign-in provider. Please sign in with it.".to_string(),
            )
        })?;

        if !verify(password, stored_password)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user)
    }

    // Get current user
    pub async fn current_user(
        &self,
        users: &dyn UserStore,
        user_id: &ObjectId,
    ) -> Result<UserInfo, AppError> {
        users
            .find_by_id(user_id)
            .await?
            .map(UserInfo::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
