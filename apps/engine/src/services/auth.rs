#![allow(dead_code)]

//! Authentication stand-in.
//!
//! Any syntactically plausible email/password pair passes after a fixed
//! artificial delay. There is no credential verification, token issuance or
//! session persistence; this must not be mistaken for a real auth layer.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("E-mail inválido.")]
    InvalidEmail,
    #[error("A senha deve ter pelo menos 6 caracteres.")]
    WeakPassword,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError>;
    async fn register(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

pub struct MockAuthService {
    delay: Duration,
}

impl MockAuthService {
    pub fn new(delay: Duration) -> Self {
        MockAuthService { delay }
    }

    async fn check(&self, email: &str, password: &str) -> Result<(), AuthError> {
        tokio::time::sleep(self.delay).await;
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < 6 {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.check(email, password).await;
        if result.is_ok() {
            info!("login accepted for {email}");
        }
        result
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.check(email, password).await;
        if result.is_ok() {
            info!("registration accepted for {email}");
        }
        result
    }
}
