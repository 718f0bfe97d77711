//! Authentication session
//!
//! Turns operator input into a bearer credential. Input starting with the
//! configured token prefix is used as-is; anything else is a phone number and
//! goes through the OTP round trip.

use crate::api::payload;
use crate::api::PlatformApi;
use crate::auth::{AuthState, Credential, IssuedVia};
use crate::channel::AuditLog;
use crate::{AuthError, ChannelError};
use async_trait::async_trait;
use serde_json::Value;

/// Supplies the OTP the operator received
///
/// Implementations suspend until the operator replies; the session imposes
/// no timeout of its own.
#[async_trait]
pub trait OtpProvider: Send {
    async fn provide_otp(&mut self) -> Result<String, ChannelError>;
}

/// What the operator's credential input turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialInput {
    Token(String),
    Phone(String),
}

/// State machine producing a [`Credential`]
pub struct AuthSession<'a> {
    api: &'a dyn PlatformApi,
    audit: &'a dyn AuditLog,
    token_prefix: String,
    state: AuthState,
}

impl<'a> AuthSession<'a> {
    pub fn new(
        api: &'a dyn PlatformApi,
        audit: &'a dyn AuditLog,
        token_prefix: impl Into<String>,
    ) -> Self {
        Self {
            api,
            audit,
            token_prefix: token_prefix.into(),
            state: AuthState::Init,
        }
    }

    /// Current state of the session
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Decides whether raw input is a ready token or a phone number
    pub fn classify_input(&self, raw: &str) -> Result<CredentialInput, AuthError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AuthError::EmptyInput);
        }

        if raw.starts_with(&self.token_prefix) {
            Ok(CredentialInput::Token(raw.to_string()))
        } else {
            Ok(CredentialInput::Phone(raw.to_string()))
        }
    }

    /// Runs the session to completion
    ///
    /// The raw input is handed to the audit log before it is consumed. On
    /// any failure the session ends in [`AuthState::Failed`] and no
    /// credential is produced.
    pub async fn authenticate(
        &mut self,
        input: &str,
        otp_provider: &mut dyn OtpProvider,
    ) -> Result<Credential, AuthError> {
        self.transition(AuthState::AwaitingCredentialInput)?;
        self.audit.record("credential", input);

        match self.resolve(input, otp_provider).await {
            Ok(credential) => {
                self.transition(AuthState::Authenticated)?;
                tracing::info!("Authenticated via {:?}", credential.issued_via());
                Ok(credential)
            }
            Err(e) => {
                self.transition(AuthState::Failed)?;
                tracing::warn!("Authentication failed: {}", e);
                Err(e)
            }
        }
    }

    async fn resolve(
        &mut self,
        input: &str,
        otp_provider: &mut dyn OtpProvider,
    ) -> Result<Credential, AuthError> {
        let phone = match self.classify_input(input)? {
            CredentialInput::Token(token) => {
                return Ok(Credential::new(token, IssuedVia::DirectToken));
            }
            CredentialInput::Phone(phone) => phone,
        };

        tracing::info!("Requesting OTP");
        let response = self.api.request_otp(&phone).await?;
        let user_id = payload::nested(&response, "data", "user_id")
            .cloned()
            .ok_or(AuthError::NoUserId)?;

        self.transition(AuthState::AwaitingOtp)?;

        // user id and OTP do not outlive the exchange
        let token = {
            let otp = otp_provider.provide_otp().await?;
            self.audit.record("otp", &otp);
            let response = self.api.exchange_otp(&user_id, otp.trim()).await?;
            api_token(&response)
        };
        drop(user_id);

        token
            .map(|token| Credential::new(token, IssuedVia::PhoneOtp))
            .ok_or(AuthError::InvalidOtp)
    }

    fn transition(&mut self, next: AuthState) -> Result<(), AuthError> {
        if !self.state.can_transition_to(next) {
            return Err(AuthError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Auth state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

fn api_token(response: &Value) -> Option<String> {
    payload::nested(response, "data", "api_token")
        .and_then(Value::as_str)
        .map(str::to_string)
}
