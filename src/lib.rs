//! Carta is a web app for managing a restaurant's menu.
//!
//! The restaurant owner signs in to edit an ordered list of menu categories,
//! each owning an ordered list of products, toggles visibility and featured
//! flags, and previews the result as a diner would see it. A public page
//! serves the live menu without authentication.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod db;
mod document;
mod endpoints;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod menu;
mod navigation;
mod not_found;
mod password;
mod preview;
mod product;
mod public_menu;
mod register_user;
mod routing;
mod theme;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    menu::MAX_CATEGORY_NAME_LENGTH,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email/password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register already belongs to an account.
    #[error("the email address is already registered")]
    EmailTaken,

    /// Someone tried to register after the owner account was created.
    ///
    /// Carta is single-tenant: exactly one owner account is allowed, so
    /// registration closes once it exists.
    #[error("an owner account already exists")]
    RegistrationClosed,

    /// An empty string was used as a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category name exceeded the maximum length.
    #[error("Category name cannot be longer than {MAX_CATEGORY_NAME_LENGTH} characters (got {0})")]
    CategoryNameTooLong(usize),

    /// A category name collides (case-insensitively) with a sibling category.
    #[error("A category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A product was submitted without a name.
    #[error("Product name cannot be empty")]
    MissingProductName,

    /// A product was submitted without a description.
    #[error("Product description cannot be empty")]
    MissingProductDescription,

    /// A product was submitted with a zero or negative price.
    #[error("Price must be greater than zero (got {0})")]
    InvalidPrice(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Two stored documents share the same id within a collection.
    ///
    /// This is treated as corruption: the loader keeps the first copy,
    /// deletes the rest, and notifies the user.
    #[error("duplicate document {id} in collection {collection}")]
    DuplicateDocument {
        /// The collection holding the duplicated documents.
        collection: String,
        /// The shared document id.
        id: String,
    },

    /// A stored document body could not be serialized or deserialized.
    #[error("could not (de)serialize document body: {0}")]
    JsonError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JsonError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(InternalServerErrorPageTemplate::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            error @ (Error::EmptyCategoryName
            | Error::CategoryNameTooLong(_)
            | Error::DuplicateCategoryName(_)
            | Error::MissingProductName
            | Error::MissingProductDescription
            | Error::InvalidPrice(_)) => Alert::error("Invalid input", &error.to_string())
                .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NotFound => Alert::error(
                "Not found",
                "The category or product could not be found. \
                Try refreshing the page to see the current menu.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::error(
                    "Something went wrong",
                    "Your change was not saved. Refresh the page to reload the \
                    menu from the server and try again.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
