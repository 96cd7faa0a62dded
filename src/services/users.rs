//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateUser, User, UserClaims},
    },
    store::Store,
};

#[derive(Clone)]
pub struct UsersService {
    store: Store,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate by username and return a JWT token plus the user record.
    ///
    /// Accounts carrying a password hash require the matching password;
    /// password-less demo accounts log in without one.
    pub async fn authenticate(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> AppResult<(String, User)> {
        let user = self
            .store
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if let Some(ref hash) = user.password {
            let supplied = password.ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;
            if !verify_password(hash, supplied)? {
                return Err(AppError::Authentication(
                    "Invalid username or password".to_string(),
                ));
            }
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create a JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.store.users.get(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.store.users.list().await
    }

    /// Create a new user account
    pub async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .store
            .users
            .find_by_username(&data.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password = match &data.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = User {
            id: Uuid::new_v4(),
            name: data.name.clone().unwrap_or_else(|| data.username.clone()),
            username: data.username,
            role: data.role.unwrap_or(UserRole::User),
            password,
        };
        self.store.users.insert(&user).await
    }

    /// Delete a user account. Callers cannot delete themselves.
    pub async fn delete_user(&self, id: Uuid, caller_id: Uuid) -> AppResult<()> {
        if id == caller_id {
            return Err(AppError::Validation(
                "Cannot delete your own account".to_string(),
            ));
        }
        self.store.users.delete(id).await
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UsersService {
        UsersService::new(Store::memory(), AuthConfig::default())
    }

    fn create(username: &str, password: Option<&str>, role: UserRole) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            name: None,
            password: password.map(str::to_string),
            role: Some(role),
        }
    }

    #[tokio::test]
    async fn authenticate_verifies_password_and_issues_claims() {
        let svc = service();
        svc.create_user(create("sam", Some("hunter2"), UserRole::User))
            .await
            .unwrap();

        let (token, user) = svc.authenticate("sam", Some("hunter2")).await.unwrap();
        assert_eq!(user.username, "sam");

        let claims = UserClaims::from_token(&token, &AuthConfig::default().jwt_secret).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.sub, "sam");
    }

    #[tokio::test]
    async fn wrong_or_missing_password_fails() {
        let svc = service();
        svc.create_user(create("sam", Some("hunter2"), UserRole::User))
            .await
            .unwrap();

        let err = svc.authenticate("sam", Some("wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));

        let err = svc.authenticate("sam", None).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn unknown_username_fails() {
        let svc = service();
        let err = svc.authenticate("nobody", Some("pw")).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn passwordless_demo_account_logs_in_without_password() {
        let svc = service();
        svc.create_user(create("demo", None, UserRole::Admin))
            .await
            .unwrap();

        let (_, user) = svc.authenticate("demo", None).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let svc = service();
        svc.create_user(create("sam", None, UserRole::User))
            .await
            .unwrap();

        let err = svc
            .create_user(create("sam", None, UserRole::User))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn short_usernames_are_rejected() {
        let svc = service();
        let err = svc
            .create_user(create("ab", None, UserRole::User))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn callers_cannot_delete_themselves() {
        let svc = service();
        let admin = svc
            .create_user(create("admin", None, UserRole::Admin))
            .await
            .unwrap();

        let err = svc.delete_user(admin.id, admin.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.get_by_id(admin.id).await.is_ok());
    }
}
