use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
}

/// Everything that can go wrong fetching data from a collaborator. Pages treat
/// all variants the same way (message plus manual retry) but the variant is
/// kept for logging and for the health grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("failed to send request: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("request failed with status code: {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        " and no body".to_string()
    } else {
        format!(". {body}")
    }
}

impl RequestError {
    /// Returns `true` if the server answered but not with success
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_mentions_missing_body() {
        let err = RequestError::Status {
            status: 502,
            body: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status code: 502 and no body"
        );
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn status_message_includes_body() {
        let err = RequestError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status code: 403. forbidden"
        );
    }
}
