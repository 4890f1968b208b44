//! The public menu's light/dark theme setting and the endpoint for flipping
//! it.
//!
//! The setting is a singleton document; a missing document means the light
//! theme.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    document::{get_all_documents, put_document},
    endpoints,
};

/// The collection holding the singleton theme document.
pub const THEME_COLLECTION: &str = "theme_config";

/// The id of the singleton theme document.
const THEME_DOCUMENT_ID: &str = "theme_config";

/// The public menu's theme setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// When true the public menu renders in dark mode.
    pub is_dark_mode: bool,
}

/// Read the theme setting, defaulting to the light theme when the document
/// is missing or unreadable in part.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_theme(connection: &Connection) -> Result<ThemeConfig, Error> {
    let documents = get_all_documents(THEME_COLLECTION, connection)?;

    let Some((_, body)) = documents
        .into_iter()
        .find(|(id, _)| id == THEME_DOCUMENT_ID)
    else {
        return Ok(ThemeConfig::default());
    };

    Ok(serde_json::from_value(body).unwrap_or_default())
}

/// Write the theme setting as a whole-document overwrite.
///
/// # Errors
/// Returns an error if the document cannot be serialized or written.
pub fn save_theme(theme: ThemeConfig, connection: &Connection) -> Result<(), Error> {
    put_document(
        THEME_COLLECTION,
        THEME_DOCUMENT_ID,
        &serde_json::to_value(theme)?,
        connection,
    )
}

/// The state needed to toggle the public menu theme.
#[derive(Debug, Clone)]
pub struct ToggleThemeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleThemeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

const THEME_BUTTON_STYLE: &str = "px-3 py-1 text-sm rounded border \
    border-gray-300 dark:border-gray-600 text-gray-900 dark:text-white \
    cursor-pointer";

/// The button showing and flipping the public menu theme.
pub fn theme_toggle_button(theme: ThemeConfig) -> Markup {
    let label = if theme.is_dark_mode {
        "Public menu theme: dark"
    } else {
        "Public menu theme: light"
    };

    html! {
        button
            hx-post=(endpoints::TOGGLE_THEME)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class=(THEME_BUTTON_STYLE)
        {
            (label)
        }
    }
}

/// Handler for flipping the public menu between light and dark mode.
pub async fn toggle_theme(State(state): State<ToggleThemeState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let theme = match load_theme(&connection) {
        Ok(theme) => theme,
        Err(error) => {
            tracing::error!("could not load theme: {error}");
            return error.into_alert_response();
        }
    };

    let flipped = ThemeConfig {
        is_dark_mode: !theme.is_dark_mode,
    };

    match save_theme(flipped, &connection) {
        Ok(()) => Html(theme_toggle_button(flipped).into_string()).into_response(),
        Err(error) => {
            tracing::error!("could not save theme: {error}");
            error.into_alert_response()
        }
    }
}
