//! The owner's dashboard: the full menu in display order with controls for
//! every mutation.
//!
//! Unlike the public page, the dashboard shows hidden products and empty
//! categories, since both remain editable.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, alert::Alert, endpoints,
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_MOVE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        base, format_price,
    },
    menu::{Category, MenuStore, Product},
    navigation::NavBar,
    product::{featured_toggle_button, visibility_toggle_button},
    theme::{load_theme, theme_toggle_button},
    user::UserID,
};

/// The state needed to display the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn move_button(endpoint: &str, from: usize, to: Option<usize>, label: &str) -> Markup {
    html! {
        @if let Some(to) = to
        {
            button
                hx-post=(endpoint)
                hx-vals=(format!(r#"{{"from": {from}, "to": {to}}}"#))
                hx-target-error="#alert-container"
                class=(BUTTON_MOVE_STYLE)
                title=(label)
            {
                (label)
            }
        } @else {
            button disabled class=(BUTTON_MOVE_STYLE) { (label) }
        }
    }
}

fn product_row(category: &Category, product: &Product, position: usize) -> Markup {
    let move_endpoint = format_endpoint(endpoints::MOVE_PRODUCT, &category.id);
    let move_endpoint = format_endpoint(&move_endpoint, &product.id);
    let delete_endpoint = format_endpoint(endpoints::DELETE_PRODUCT, &category.id);
    let delete_endpoint = format_endpoint(&delete_endpoint, &product.id);
    let edit_url = format_endpoint(endpoints::EDIT_PRODUCT_VIEW, &category.id);
    let edit_url = format_endpoint(&edit_url, &product.id);

    let up = position.checked_sub(1);
    let down = (position + 1 < category.products.len()).then_some(position + 1);

    html! {
        li class="flex items-center gap-2 py-2 border-b border-gray-100 dark:border-gray-700 last:border-b-0"
        {
            div class="flex flex-col"
            {
                (move_button(&move_endpoint, position, up, "↑"))
                (move_button(&move_endpoint, position, down, "↓"))
            }

            div class="grow"
            {
                p class="font-medium" { (product.name) }
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_price(product.price, product.currency))
                }
            }

            (visibility_toggle_button(product))
            (featured_toggle_button(product))

            a href=(edit_url) class=(LINK_STYLE) { "Edit" }

            button
                hx-delete=(delete_endpoint)
                hx-confirm=(format!("Delete \"{}\"?", product.name))
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

fn category_card(category: &Category, position: usize, category_count: usize) -> Markup {
    let move_endpoint = format_endpoint(endpoints::MOVE_CATEGORY, &category.id);
    let delete_endpoint = format_endpoint(endpoints::DELETE_CATEGORY, &category.id);
    let edit_url = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, &category.id);
    let new_product_url = format_endpoint(endpoints::NEW_PRODUCT_VIEW, &category.id);

    let up = position.checked_sub(1);
    let down = (position + 1 < category_count).then_some(position + 1);

    html! {
        section class=(CARD_STYLE)
        {
            div class="flex items-center gap-2 mb-2"
            {
                div class="flex flex-col"
                {
                    (move_button(&move_endpoint, position, up, "↑"))
                    (move_button(&move_endpoint, position, down, "↓"))
                }

                h2 class="grow text-lg font-semibold" { (category.name) }

                a href=(edit_url) class=(LINK_STYLE) { "Rename" }

                button
                    hx-delete=(delete_endpoint)
                    hx-confirm=(format!(
                        "Delete \"{}\" and its {} product(s)?",
                        category.name,
                        category.products.len()
                    ))
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }

            @if category.products.is_empty()
            {
                p class="text-sm text-gray-500 dark:text-gray-400 italic" { "No products yet." }
            } @else {
                ul
                {
                    @for (position, product) in category.products.iter().enumerate()
                    {
                        (product_row(category, product, position))
                    }
                }
            }

            p class="mt-2"
            {
                a href=(new_product_url) class=(LINK_STYLE) { "Add product" }
            }
        }
    }
}

/// Display the dashboard.
///
/// Loading the menu also repairs duplicated category documents; when that
/// happens the owner is told which ids were affected.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_response();
        }
    };

    let theme = match state
        .db_connection
        .lock()
        .map_err(|_| crate::Error::DatabaseLockError)
        .and_then(|connection| load_theme(&connection))
    {
        Ok(theme) => theme,
        Err(error) => {
            tracing::error!("could not load theme: {error}");
            return error.into_response();
        }
    };

    let repair_notice = (!loaded.repaired_ids.is_empty()).then(|| {
        Alert::error(
            "Menu repaired",
            &format!(
                "Duplicated entries were found and cleaned up for: {}.",
                loaded.repaired_ids.join(", ")
            ),
        )
        .into_markup()
    });

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl"
            {
                @if let Some(notice) = repair_notice { (notice) }

                div class="flex items-center justify-between mb-4"
                {
                    h1 class="text-2xl font-bold" { "Menu" }

                    div class="flex items-center gap-4"
                    {
                        (theme_toggle_button(theme))
                        a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "New category" }
                    }
                }

                @if loaded.categories.is_empty()
                {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "Your menu is empty. Create a category to get started."
                    }
                }

                @for (position, category) in loaded.categories.iter().enumerate()
                {
                    (category_card(category, position, loaded.categories.len()))
                }
            }
        }
    };

    Html(base("Dashboard", &content).into_string()).into_response()
}
