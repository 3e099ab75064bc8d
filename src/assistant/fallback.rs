use crate::llm::FailureKind;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "I'm running in offline mode because no AI service \
    key is configured, so I can't give personalised insights right now. Your dashboard readings \
    are still live. Ask your administrator to add an API key to enable the assistant.";

const BUSY_MESSAGE: &str = "I'm getting a lot of questions right now. Please try again in a \
    minute and I'll take a look at your data.";

const SLOW_MESSAGE: &str = "That took longer than expected and I had to stop waiting. Please \
    try asking again.";

const UNREACHABLE_MESSAGE: &str = "I can't reach my AI service at the moment. Please check back \
    shortly. In the meantime, keep following your usual care plan.";

const UNCLEAR_MESSAGE: &str = "I couldn't put together a good answer to that. Could you try \
    rephrasing your question?";

const GENERIC_MESSAGE: &str = "I'm sorry, I'm having trouble analysing your data right now. \
    Please try again later.";

/// Message shown to the user in place of a generated answer. Each failure
/// kind always maps to the same text.
pub fn fallback_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
        FailureKind::RateLimit => BUSY_MESSAGE,
        FailureKind::Timeout => SLOW_MESSAGE,
        FailureKind::NetworkError | FailureKind::ServerError => UNREACHABLE_MESSAGE,
        FailureKind::EmptyResponse | FailureKind::InvalidRequest => UNCLEAR_MESSAGE,
        FailureKind::AuthError | FailureKind::UnknownError => GENERIC_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FALLBACK_MESSAGES: &[&str] = &[
        MISSING_CREDENTIAL_MESSAGE,
        BUSY_MESSAGE,
        SLOW_MESSAGE,
        UNREACHABLE_MESSAGE,
        UNCLEAR_MESSAGE,
        GENERIC_MESSAGE,
    ];

    #[test]
    fn test_missing_credential_advisory() {
        assert_eq!(
            fallback_message(FailureKind::MissingCredential),
            MISSING_CREDENTIAL_MESSAGE
        );
    }

    #[test]
    fn test_mapping_is_total_and_known() {
        let kinds = [
            FailureKind::MissingCredential,
            FailureKind::RateLimit,
            FailureKind::Timeout,
            FailureKind::AuthError,
            FailureKind::NetworkError,
            FailureKind::ServerError,
            FailureKind::InvalidRequest,
            FailureKind::EmptyResponse,
            FailureKind::UnknownError,
        ];
        for kind in kinds {
            let message = fallback_message(kind);
            assert!(ALL_FALLBACK_MESSAGES.contains(&message));
            assert_eq!(message, fallback_message(kind));
        }
    }

    #[test]
    fn test_auth_errors_do_not_leak_detail() {
        let message = fallback_message(FailureKind::AuthError);
        assert!(!message.to_lowercase().contains("key"));
    }
}
