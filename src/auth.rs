use std::env;

/// Source of the bearer token attached to every backend request. Issuing and
/// validating tokens is the auth collaborator's job; this client only reads
/// one. Injected explicitly instead of living in ambient shared state.
pub trait TokenProvider: Send + Sync {
    /// Current token, if the user has one. `None` means requests go out
    /// unauthenticated and the backend answers accordingly.
    fn token(&self) -> Option<String>;
}

/// Fixed token, mostly for tests and one-shot CLI runs.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call, so a token
/// rotated mid-process is picked up.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|t| !t.is_empty())
    }
}

/// Stored tokens sometimes already carry the scheme prefix. Normalize to a
/// proper `Authorization` header value either way.
pub fn bearer_header_value(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "))
    {
        trimmed.to_string()
    } else {
        format!("Bearer {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_token_gets_bearer_prefix() {
        assert_eq!(bearer_header_value("abc.def"), "Bearer abc.def");
    }

    #[test]
    fn existing_prefix_is_kept() {
        assert_eq!(bearer_header_value("Bearer abc"), "Bearer abc");
        assert_eq!(bearer_header_value("bearer abc"), "bearer abc");
    }

    #[test]
    fn static_token_is_returned_as_is() {
        let provider = StaticToken("tok".to_string());
        assert_eq!(provider.token().as_deref(), Some("tok"));
    }
}
