//! The edit-category page and the endpoint for renaming a category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    menu::{MenuStore, rename_category},
    navigation::NavBar,
    user::UserID,
};

use super::category_name_input;

/// The state needed to rename a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_category_form(category_id: &str, name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-put=(format_endpoint(endpoints::PUT_CATEGORY, category_id))
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (category_name_input(name, error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}

/// Display the page for renaming an existing category.
pub async fn get_edit_category_page(
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_response();
        }
    };

    let Some(category) = loaded
        .categories
        .iter()
        .find(|category| category.id == category_id)
    else {
        return Error::NotFound.into_response();
    };

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Category" }
            (edit_category_form(&category.id, &category.name, None))
        }
    };

    Html(base("Edit Category", &content).into_string()).into_response()
}

#[derive(Serialize, Deserialize)]
pub struct EditCategoryFormData {
    pub name: String,
}

/// Handler for renaming a category.
///
/// Invalid or colliding names re-render the form with an inline error
/// message; an unknown category id produces a not-found alert.
pub async fn update_category(
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
    Form(form): Form<EditCategoryFormData>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_alert_response();
        }
    };

    if !loaded
        .categories
        .iter()
        .any(|category| category.id == category_id)
    {
        return Error::NotFound.into_alert_response();
    }

    let renamed = match rename_category(loaded.categories, &category_id, &form.name) {
        Ok(categories) => categories,
        Err(error) => return form_response(&category_id, form.name.trim(), &error),
    };

    // Only the renamed category's document changed.
    let category = renamed
        .iter()
        .find(|category| category.id == category_id)
        .cloned();

    match category.map(|category| store.save(&category)) {
        Some(Ok(())) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Some(Err(error)) => {
            tracing::error!("could not save category {category_id}: {error}");
            error.into_alert_response()
        }
        None => Error::NotFound.into_alert_response(),
    }
}

fn form_response(category_id: &str, name: &str, error: &Error) -> Response {
    (
        StatusCode::OK,
        Html(edit_category_form(category_id, name, Some(&error.to_string())).into_string()),
    )
        .into_response()
}
