//! HTTP status classification.

/// How a response status should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx.
    Ok,
    /// 404, the resource does not exist.
    NotFound,
    /// 403, 418 or 429: the client is rate limited or banned.
    Rejected,
    /// Any other status.
    Unexpected(u16),
}

impl StatusClass {
    /// Classifies a status code.
    #[must_use]
    pub const fn classify(status: u16) -> Self {
        match status {
            200..=299 => Self::Ok,
            404 => Self::NotFound,
            403 | 418 | 429 => Self::Rejected,
            other => Self::Unexpected(other),
        }
    }

    /// Returns true for [`StatusClass::Ok`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}
