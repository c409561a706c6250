//! Response error taxonomy
//!
//! Classification applied to non-success response envelopes. Transport and
//! store failures have their own error enums in the crates that own those
//! seams; this taxonomy describes what a completed (or synthesized) HTTP
//! exchange meant for the caller.

/// Classification of a non-success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level fault or timeout; reported with a synthesized 500.
    Network,
    /// 401 matching the token-expiry signature. Resolved inside the
    /// pipeline by a refresh-and-retry cycle; callers only see this when
    /// the retry itself came back 401-expired.
    AuthExpired,
    /// 401/403 that does not match the expiry signature.
    AuthDenied,
    /// 4xx carrying a structured `errors` map.
    Validation,
    /// 5xx from the server.
    Server,
    /// Undecodable payload on a non-2xx path.
    Parse,
}

impl ErrorKind {
    /// Whether retrying the same call later can reasonably succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::AuthExpired => "auth_expired",
            ErrorKind::AuthDenied => "auth_denied",
            ErrorKind::Validation => "validation",
            ErrorKind::Server => "server",
            ErrorKind::Parse => "parse",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(ErrorKind::Network.is_recoverable());
        assert!(ErrorKind::Server.is_recoverable());
        assert!(!ErrorKind::AuthDenied.is_recoverable());
        assert!(!ErrorKind::Validation.is_recoverable());
        assert!(!ErrorKind::Parse.is_recoverable());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ErrorKind::AuthExpired.to_string(), "auth_expired");
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
