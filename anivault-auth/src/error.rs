use std::fmt;

/// Error type for authentication and API operations.
///
/// This is a closed taxonomy: every failure a caller can observe from the
/// transport or the auth operations is one of these variants. The `Display`
/// output is suitable for showing to the user as-is; flow controllers may
/// still replace it with more specific wording.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Misconfigured base URL. Should not occur in production.
    InvalidUrl(String),
    /// The request body could not be serialized to JSON.
    Encoding(String),
    /// Transport-level failure (DNS, timeout, connection reset).
    Network(String),
    /// A 2xx response body could not be decoded into the expected type.
    Decoding(String),
    /// 401: wrong identifier/password pair.
    InvalidCredentials,
    /// 403: the account exists but its email address is not verified yet.
    EmailUnverified,
    /// 400: the server rejected the request contents.
    Validation(String),
    /// 409: e.g. signing up with an email that is already registered.
    Conflict(String),
    /// Any other non-2xx status, with a best-effort message from the body.
    Server { status: u16, message: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidUrl(url) => write!(f, "Invalid URL configuration: {}", url),
            AuthError::Encoding(msg) => write!(f, "Failed to encode request: {}", msg),
            AuthError::Network(msg) => write!(f, "Network error: {}", msg),
            AuthError::Decoding(msg) => write!(f, "Failed to parse server response: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials."),
            AuthError::EmailUnverified => write!(f, "Email address not verified."),
            AuthError::Validation(msg) => write!(f, "{}", msg),
            AuthError::Conflict(msg) => write!(f, "{}", msg),
            AuthError::Server { status, message } => {
                if message.is_empty() {
                    write!(f, "Server returned status {}", status)
                } else {
                    write!(f, "{}", message)
                }
            }
        }
    }
}

impl std::error::Error for AuthError {}
