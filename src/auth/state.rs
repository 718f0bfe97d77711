/// Authentication state definitions
///
/// A session moves `Init → AwaitingCredentialInput → (AwaitingOtp) →
/// Authenticated | Failed` and never leaves a terminal state.
use std::fmt;

/// Represents the current state of an authentication session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthState {
    /// Session created, nothing consumed yet
    Init,

    /// Operator input (token or phone number) is being handled
    AwaitingCredentialInput,

    /// OTP requested; waiting for the operator to supply it
    AwaitingOtp,

    /// A credential was issued
    Authenticated,

    /// The platform rejected the phone number or OTP
    Failed,
}

impl AuthState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Failed)
    }

    /// Returns true if the session is waiting on the operator
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::AwaitingCredentialInput | Self::AwaitingOtp)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: AuthState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::AwaitingCredentialInput)
                | (Self::AwaitingCredentialInput, Self::AwaitingOtp)
                | (Self::AwaitingCredentialInput, Self::Authenticated)
                | (Self::AwaitingCredentialInput, Self::Failed)
                | (Self::AwaitingOtp, Self::Authenticated)
                | (Self::AwaitingOtp, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AwaitingCredentialInput => "awaiting_credential_input",
            Self::AwaitingOtp => "awaiting_otp",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
