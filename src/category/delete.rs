//! The endpoint for deleting a category and its products.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, endpoints, menu::MenuStore, user::UserID};

/// The state needed to delete a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for deleting a category.
///
/// Products live inside the category document, so this removes them too.
/// Deleting an id that is already gone still succeeds: the outcome the owner
/// asked for holds either way.
pub async fn delete_category(
    State(state): State<DeleteCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    match store.remove(&category_id) {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
