use std::fmt;

/// How a credential was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuedVia {
    /// The operator pasted a ready token
    DirectToken,
    /// Phone number plus OTP exchange
    PhoneOtp,
}

/// Bearer credential for one run
///
/// Immutable once issued. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    bearer_token: String,
    issued_via: IssuedVia,
}

impl Credential {
    pub fn new(bearer_token: impl Into<String>, issued_via: IssuedVia) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            issued_via,
        }
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn issued_via(&self) -> IssuedVia {
        self.issued_via
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("bearer_token", &"<redacted>")
            .field("issued_via", &self.issued_via)
            .finish()
    }
}
