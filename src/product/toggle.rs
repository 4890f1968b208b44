//! The endpoints for flipping a product's visibility and featured flags.
//!
//! The dashboard renders these flags as buttons that swap themselves out
//! with the fragment returned here, so a toggle never reloads the page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    menu::{Category, MenuStore, Product, toggle_featured, toggle_visibility},
    user::UserID,
};

/// The state needed to toggle a product flag.
#[derive(Debug, Clone)]
pub struct ToggleProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

const TOGGLE_ON_STYLE: &str = "px-2 py-1 text-xs rounded bg-blue-100 \
    text-blue-800 dark:bg-blue-900 dark:text-blue-300 cursor-pointer";
const TOGGLE_OFF_STYLE: &str = "px-2 py-1 text-xs rounded bg-gray-100 \
    text-gray-500 dark:bg-gray-700 dark:text-gray-400 cursor-pointer";

fn toggle_button(endpoint: &str, label: &str, is_on: bool) -> Markup {
    html! {
        button
            hx-post=(endpoint)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class=(if is_on { TOGGLE_ON_STYLE } else { TOGGLE_OFF_STYLE })
        {
            (label)
        }
    }
}

/// The button showing and flipping a product's visibility.
pub fn visibility_toggle_button(product: &Product) -> Markup {
    let endpoint = format_endpoint(endpoints::TOGGLE_PRODUCT_VISIBILITY, &product.id);
    let label = if product.visible { "Visible" } else { "Hidden" };

    toggle_button(&endpoint, label, product.visible)
}

/// The button showing and flipping a product's featured flag.
pub fn featured_toggle_button(product: &Product) -> Markup {
    let endpoint = format_endpoint(endpoints::TOGGLE_PRODUCT_FEATURED, &product.id);
    let label = if product.featured { "Featured" } else { "Not featured" };

    toggle_button(&endpoint, label, product.featured)
}

/// Handler for flipping a product's visibility.
pub async fn toggle_product_visibility(
    State(state): State<ToggleProductState>,
    Extension(user_id): Extension<UserID>,
    Path(product_id): Path<String>,
) -> Response {
    toggle(state, user_id, &product_id, toggle_visibility, |product| {
        visibility_toggle_button(product)
    })
    .await
}

/// Handler for flipping a product's featured flag.
pub async fn toggle_product_featured(
    State(state): State<ToggleProductState>,
    Extension(user_id): Extension<UserID>,
    Path(product_id): Path<String>,
) -> Response {
    toggle(state, user_id, &product_id, toggle_featured, |product| {
        featured_toggle_button(product)
    })
    .await
}

async fn toggle(
    state: ToggleProductState,
    user_id: UserID,
    product_id: &str,
    apply: fn(Vec<Category>, &str) -> Vec<Category>,
    render: fn(&Product) -> Markup,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_alert_response();
        }
    };

    let categories = apply(loaded.categories, product_id);

    let Some(category) = categories.iter().find(|category| {
        category
            .products
            .iter()
            .any(|product| product.id == product_id)
    }) else {
        return Error::NotFound.into_alert_response();
    };

    if let Err(error) = store.save(category) {
        tracing::error!("could not save category {}: {error}", category.id);
        return error.into_alert_response();
    }

    let Some(product) = category
        .products
        .iter()
        .find(|product| product.id == product_id)
    else {
        return Error::NotFound.into_alert_response();
    };

    Html(render(product).into_string()).into_response()
}

#[cfg(test)]
mod toggle_product_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        document::create_document_table,
        menu::{Category, Currency, MenuStore, Product, read_categories},
        test_utils::response_body_text,
        user::UserID,
    };

    use super::{ToggleProductState, toggle_product_featured, toggle_product_visibility};

    fn get_test_state() -> ToggleProductState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_document_table(&connection).expect("Could not create document table");

        ToggleProductState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed_menu(state: &ToggleProductState) {
        MenuStore::new(state.db_connection.clone(), UserID::new(1))
            .save(&Category {
                id: "c1".to_string(),
                name: "Pizzas".to_string(),
                products: vec![Product {
                    id: "p1".to_string(),
                    name: "Margherita".to_string(),
                    description: "Tomato and mozzarella".to_string(),
                    price: 10.0,
                    currency: Currency::Ars,
                    image: None,
                    featured: false,
                    visible: true,
                    category_id: "c1".to_string(),
                    order: 0,
                }],
                order: 0,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn toggle_visibility_flips_flag_and_returns_updated_button() {
        let state = get_test_state();
        seed_menu(&state);

        let response = toggle_product_visibility(
            State(state.clone()),
            Extension(UserID::new(1)),
            Path("p1".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        assert!(text.contains("Hidden"));

        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert!(!categories[0].products[0].visible);
    }

    #[tokio::test]
    async fn toggle_visibility_twice_restores_the_flag() {
        let state = get_test_state();
        seed_menu(&state);

        for _ in 0..2 {
            toggle_product_visibility(
                State(state.clone()),
                Extension(UserID::new(1)),
                Path("p1".to_string()),
            )
            .await;
        }

        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert!(categories[0].products[0].visible);
    }

    #[tokio::test]
    async fn toggle_featured_flips_flag() {
        let state = get_test_state();
        seed_menu(&state);

        let response = toggle_product_featured(
            State(state.clone()),
            Extension(UserID::new(1)),
            Path("p1".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert!(categories[0].products[0].featured);
    }

    #[tokio::test]
    async fn toggle_unknown_product_returns_not_found_alert() {
        let state = get_test_state();
        seed_menu(&state);

        let response = toggle_product_visibility(
            State(state),
            Extension(UserID::new(1)),
            Path("missing".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
