use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Who a row-store request runs as. The store's access policies only see
/// the signed-in teacher when their access token is forwarded; otherwise the
/// request runs under the project key as the anonymous role.
#[derive(Clone, Default)]
pub struct Caller {
    access_token: Option<SecretString>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(access_token: &str) -> Self {
        Self {
            access_token: Some(SecretString::from(access_token.to_string())),
        }
    }

    pub fn from_token(access_token: Option<&str>) -> Self {
        access_token.map(Self::signed_in).unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose_secret())
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token.is_some()
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.access_token {
            Some(_) => f.write_str("Caller(signed in)"),
            None => f.write_str("Caller(anonymous)"),
        }
    }
}
