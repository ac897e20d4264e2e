/// Coarse classification of a provider failure.
///
/// | Kind | Typical causes |
/// |------|----------------|
/// | `Network` | transport error, timeout, rate limit, non-success HTTP status |
/// | `Decode` | malformed or unexpected response body |
/// | `NotFound` | unknown symbol, empty range, unbuildable request |
///
/// None of the kinds is retried. Callers log the failure and fall back to
/// placeholder or absent data for the affected unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FailureKind {
    /// Transport-level failure.
    Network,

    /// The provider answered but the payload could not be understood.
    Decode,

    /// The requested resource does not exist or the request was unresolvable.
    NotFound,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Decode => "decode",
            Self::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
