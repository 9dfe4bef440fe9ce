use std::env;

/// Explicitly threaded session collaborator: where the backend lives
/// and which bearer token, if any, authenticates the current user.
///
/// The quiz engine never reads ambient storage; every adapter call
/// takes one of these. A context without a token still allows building
/// requests to be rejected up front as unauthorized.
#[derive(Clone, Debug)]
pub struct SessionContext {
    base_url: String,
    access_token: Option<String>,
}

impl SessionContext {
    /// Default backend origin when the environment does not name one.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";

    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token,
        }
    }

    /// Build a context from `LINGO_API_BASE_URL` and `LINGO_ACCESS_TOKEN`.
    ///
    /// A missing base URL falls back to [`Self::DEFAULT_BASE_URL`]; a
    /// missing or blank token leaves the context unauthenticated.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("LINGO_API_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.into());
        let access_token = env::var("LINGO_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self::new(base_url, access_token)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The bearer token, if the session is authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Join an absolute path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}
