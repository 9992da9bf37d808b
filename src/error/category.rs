//! Coarse error classes that decide retry and reporting.

use std::fmt;

/// What kind of failure an error is, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Could not reach the API or the connection broke.
    Network,
    /// The API answered 429.
    RateLimited,
    /// 5xx or a body we could not make sense of.
    Server,
    /// A click action that does not apply to its target. Expected and
    /// silent.
    Precondition,
    /// A request the API refused, or misuse of the library.
    Client,
    /// Filesystem trouble.
    System,
    /// Bad settings.
    Configuration,
}

impl ErrorCategory {
    /// Whether requeueing the same work later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::RateLimited | ErrorCategory::Server
        )
    }

    /// Failures that are part of normal use and only worth a debug log.
    pub fn is_expected(&self) -> bool {
        matches!(self, ErrorCategory::Precondition | ErrorCategory::RateLimited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Server => "server",
            ErrorCategory::Precondition => "precondition",
            ErrorCategory::Client => "client",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Heading for a user-facing message.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Could not reach the chat API",
            ErrorCategory::RateLimited => "Slowed down by the chat API",
            ErrorCategory::Server => "The chat API is having trouble",
            ErrorCategory::Precondition => "Action not available here",
            ErrorCategory::Client => "Application error",
            ErrorCategory::System => "System error",
            ErrorCategory::Configuration => "Settings problem",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check the connection; queued work is sent again on the next flush",
            ErrorCategory::RateLimited => "Nothing to do; queued work is sent again on the next flush",
            ErrorCategory::Server => "Try again later",
            ErrorCategory::Precondition => {
                "Check your permissions in the channel and whether the message still exists"
            }
            ErrorCategory::Client => "Check the API token and request; report it if it keeps happening",
            ErrorCategory::System => "Check file permissions for the settings directory",
            ErrorCategory::Configuration => "Fix the settings file, or run --print-config to see the defaults",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::RateLimited.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Precondition.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_expected_failures() {
        assert!(ErrorCategory::Precondition.is_expected());
        assert!(ErrorCategory::RateLimited.is_expected());
        assert!(!ErrorCategory::Server.is_expected());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCategory::RateLimited.to_string(), "rate_limited");
        assert!(ErrorCategory::Configuration.recovery_hint().contains("--print-config"));
    }
}
