//! Error Module
//!
//! Failures that can end a client-side demo action. Every action converts
//! its failure into one of these before it reaches the action's state slot,
//! and the slot turns it into display text with [`DemoError::user_message`].

use crate::host::{HostError, HostErrorKind};
use ethers::providers::{ProviderError, RpcError};
use std::error::Error as StdError;

/// EIP-1193 "User Rejected Request"
pub const USER_REJECTED_CODE: i64 = 4001;

/// Text shown for any user rejection, regardless of which layer reported it
pub const REJECTED_BY_USER: &str = "Rejected by user";

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Detected before any network call (no wallet, no account, no token
    /// selected, ...). Carries the static text shown to the user.
    #[error("{0}")]
    MissingPrecondition(&'static str),

    #[error("{}", REJECTED_BY_USER)]
    RejectedByUser,

    #[error("{0}")]
    Wallet(#[source] ProviderError),

    #[error("{0}")]
    Host(#[source] HostError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Failed(String),
}

impl From<ProviderError> for DemoError {
    fn from(err: ProviderError) -> Self {
        let rejected = err
            .as_error_response()
            .is_some_and(|response| response.code == USER_REJECTED_CODE);

        if rejected {
            DemoError::RejectedByUser
        } else {
            DemoError::Wallet(err)
        }
    }
}

impl From<HostError> for DemoError {
    fn from(err: HostError) -> Self {
        DemoError::Host(err)
    }
}

impl DemoError {
    pub fn failed(message: impl Into<String>) -> Self {
        DemoError::Failed(message.into())
    }

    pub fn is_user_rejection(&self) -> bool {
        is_user_rejection(self)
    }

    /// Text rendered in the action's terminal error state
    pub fn user_message(&self) -> String {
        if self.is_user_rejection() {
            REJECTED_BY_USER.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Walk `err` and its sources looking for a user-rejection marker
///
/// Recognizes [`DemoError::RejectedByUser`], host errors of kind
/// [`HostErrorKind::RejectedByUser`] and wallet errors carrying code 4001.
pub fn is_user_rejection(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);

    while let Some(err) = current {
        if let Some(DemoError::RejectedByUser) = err.downcast_ref::<DemoError>() {
            return true;
        }
        if let Some(host) = err.downcast_ref::<HostError>() {
            if host.kind == HostErrorKind::RejectedByUser {
                return true;
            }
        }
        if let Some(provider) = err.downcast_ref::<ProviderError>() {
            if provider
                .as_error_response()
                .is_some_and(|response| response.code == USER_REJECTED_CODE)
            {
                return true;
            }
        }
        current = err.source();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_rejection_found_through_source_chain() {
        let err = DemoError::from(HostError::rejected_by_user("user closed the sheet"));

        assert!(err.is_user_rejection());
        assert_eq!(err.user_message(), REJECTED_BY_USER);
    }

    #[test]
    fn test_rejection_found_inside_anyhow_context() {
        let err = anyhow::Error::new(DemoError::RejectedByUser).context("signing failed");
        assert!(is_user_rejection(err.as_ref()));
    }

    #[test]
    fn test_other_errors_keep_raw_message() {
        let err = DemoError::failed("execution reverted");

        assert!(!err.is_user_rejection());
        assert_eq!(err.user_message(), "execution reverted");
    }

    #[test]
    fn test_precondition_message_is_static_text() {
        let err = DemoError::MissingPrecondition("No wallet client or address");
        assert_eq!(err.user_message(), "No wallet client or address");
    }
}
