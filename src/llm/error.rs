use thiserror::Error;

/// Failures raised by this crate's own provider plumbing, as opposed to
/// errors bubbling up from HTTP clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for provider {0}")]
    MissingCredential(String),

    #[error("provider {0} returned an empty response")]
    EmptyResponse(String),

    #[error("provider {provider} did not answer within {secs}s")]
    Timeout { provider: String, secs: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MissingCredential,
    RateLimit,
    Timeout,
    AuthError,
    NetworkError,
    ServerError,
    InvalidRequest,
    EmptyResponse,
    UnknownError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingCredential => "missing_credential",
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Timeout => "timeout",
            FailureKind::AuthError => "auth_error",
            FailureKind::NetworkError => "network_error",
            FailureKind::ServerError => "server_error",
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::EmptyResponse => "empty_response",
            FailureKind::UnknownError => "unknown_error",
        }
    }

    pub fn classify(err: &anyhow::Error) -> Self {
        if let Some(provider_err) = err.downcast_ref::<ProviderError>() {
            return match provider_err {
                ProviderError::MissingCredential(_) => FailureKind::MissingCredential,
                ProviderError::EmptyResponse(_) => FailureKind::EmptyResponse,
                ProviderError::Timeout { .. } => FailureKind::Timeout,
            };
        }

        if let Some(http_err) = err.downcast_ref::<reqwest::Error>() {
            if http_err.is_timeout() {
                return FailureKind::Timeout;
            }
            if http_err.is_connect() {
                return FailureKind::NetworkError;
            }
            if http_err.is_decode() {
                return FailureKind::ServerError;
            }
        }

        classify_message(&err.to_string())
    }
}

fn classify_message(msg: &str) -> FailureKind {
    let msg = msg.to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") || msg.contains("resource_exhausted") {
        FailureKind::RateLimit
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        FailureKind::Timeout
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
        || msg.contains("permission_denied")
    {
        FailureKind::AuthError
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        FailureKind::InvalidRequest
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        FailureKind::ServerError
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        FailureKind::NetworkError
    } else {
        FailureKind::UnknownError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_provider_errors() {
        let err = anyhow::Error::new(ProviderError::MissingCredential("gemini".to_string()));
        assert_eq!(FailureKind::classify(&err), FailureKind::MissingCredential);

        let err = anyhow::Error::new(ProviderError::EmptyResponse("gemini".to_string()));
        assert_eq!(FailureKind::classify(&err), FailureKind::EmptyResponse);

        let err = anyhow::Error::new(ProviderError::Timeout {
            provider: "gemini".to_string(),
            secs: 30,
        });
        assert_eq!(FailureKind::classify(&err), FailureKind::Timeout);
    }

    #[test]
    fn test_missing_credential_not_mistaken_for_auth() {
        // The message mentions "API key", which the text heuristics would
        // classify as an auth error.
        let err = anyhow::Error::new(ProviderError::MissingCredential("openai".to_string()));
        assert!(err.to_string().contains("API key"));
        assert_eq!(FailureKind::classify(&err), FailureKind::MissingCredential);
    }

    #[test]
    fn test_classify_message_categories() {
        let cases = vec![
            ("rate limit exceeded", FailureKind::RateLimit),
            ("Gemini API error (429 Too Many Requests): quota", FailureKind::RateLimit),
            ("RESOURCE_EXHAUSTED", FailureKind::RateLimit),
            ("request timed out", FailureKind::Timeout),
            ("401 unauthorized", FailureKind::AuthError),
            ("403 forbidden", FailureKind::AuthError),
            ("invalid api key", FailureKind::AuthError),
            ("400 bad request", FailureKind::InvalidRequest),
            ("invalid model name", FailureKind::InvalidRequest),
            ("500 internal server error", FailureKind::ServerError),
            ("503 service unavailable", FailureKind::ServerError),
            ("connection refused", FailureKind::NetworkError),
            ("dns resolution failed", FailureKind::NetworkError),
            ("something unexpected", FailureKind::UnknownError),
        ];

        for (msg, expected) in cases {
            let err = anyhow::anyhow!("{}", msg);
            assert_eq!(
                FailureKind::classify(&err),
                expected,
                "classify({msg:?}) should be {expected:?}"
            );
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FailureKind::MissingCredential.as_str(), "missing_credential");
        assert_eq!(FailureKind::EmptyResponse.as_str(), "empty_response");
        assert_eq!(FailureKind::UnknownError.as_str(), "unknown_error");
    }
}
