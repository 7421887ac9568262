//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, html::error_view};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The expense collection could not be fetched from the expense service.
    ///
    /// Either the service was unreachable, it responded with a non-success
    /// status, or its response body was not a list of expenses.
    #[error("could not fetch expenses: {0}")]
    FetchError(String),

    /// The expense service rejected or failed a create request for an expense
    /// that passed validation.
    #[error("could not create expense: {0}")]
    SubmissionError(String),

    /// Could not acquire the lock on the in-memory expense collection.
    #[error("could not acquire the expense store lock")]
    StoreLockError,

    /// The configured expense service URL is not a valid base URL.
    #[error("invalid expense service URL \"{0}\"")]
    InvalidApiUrl(String),

    /// The HTTP client could not be constructed.
    #[error("could not build the HTTP client: {0}")]
    HttpClientError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::FetchError(_) => {
                tracing::error!("{self}");
                (
                    StatusCode::BAD_GATEWAY,
                    error_view(
                        "Expense Service Unavailable",
                        "502",
                        "Could not reach the expense service.",
                        "Check that the expense service is running and try again.",
                    ),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    ),
                )
                    .into_response()
            }
        }
    }
}

impl Error {
    /// Describe the error as an alert that can be shown above page content.
    pub fn to_alert(&self) -> Alert {
        match self {
            Error::FetchError(_) => Alert::Error {
                message: "Could not load expenses".to_owned(),
                details: "The expense service could not be reached. \
                    Showing the last expenses that were loaded, if any."
                    .to_owned(),
            },
            Error::SubmissionError(_) => Alert::Error {
                message: "Could not save expense".to_owned(),
                details: "The expense service did not accept the expense. \
                    Check your input and try again."
                    .to_owned(),
            },
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::alert::Alert;

    use super::Error;

    #[test]
    fn fetch_error_renders_bad_gateway() {
        let response = Error::FetchError("connection refused".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn lock_error_renders_internal_server_error() {
        let response = Error::StoreLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn alert_does_not_leak_internal_details() {
        let Alert::Error { details, .. } =
            Error::SubmissionError("500 Internal Server Error: stack trace".to_owned()).to_alert();

        assert!(!details.contains("stack trace"));
    }
}
