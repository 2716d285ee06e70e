/// Outcome of a best-effort fetch against a third-party source.
///
/// Upstream registries and advisory databases are expected to fail; a failed
/// fetch is a normal result, not an error. Adapters convert every transport
/// problem (timeout, connection error, non-2xx, undecodable body) into
/// `Unavailable` at the boundary, so "the source answered with nothing"
/// stays distinguishable from "the source could not be reached" in logs and
/// tests, while callers handle both without unwinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The source answered; the payload may still be empty.
    Available(T),
    /// The source could not be reached or did not produce a usable payload.
    Unavailable,
}

impl<T> Fetched<T> {
    /// Converts to `Option`, folding `Unavailable` into `None`.
    pub fn available(self) -> Option<T> {
        match self {
            Fetched::Available(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }

    /// Returns the payload, or `default` if the source was unavailable.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Fetched::Available(value) => value,
            Fetched::Unavailable => default,
        }
    }

    /// Returns the payload, or computes a default if the source was
    /// unavailable.
    pub fn unwrap_or_else<F: FnOnce() -> T>(self, default: F) -> T {
        match self {
            Fetched::Available(value) => value,
            Fetched::Unavailable => default(),
        }
    }

    /// Maps the payload, preserving availability.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Fetched::Available(value) => Fetched::Available(f(value)),
            Fetched::Unavailable => Fetched::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Fetched::Available(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Fetched::Unavailable)
    }
}

impl<T: Default> Fetched<T> {
    /// Returns the payload, or `T::default()` if the source was unavailable.
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Fetched::Available(v),
            None => Fetched::Unavailable,
        }
    }
}
