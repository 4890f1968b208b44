//! The endpoint for moving a product within its category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, endpoints,
    menu::{MenuStore, reorder_products},
    user::UserID,
};

/// The state needed to reorder products within a category.
#[derive(Debug, Clone)]
pub struct MoveProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MoveProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct MoveFormData {
    /// The 0-based display position the product is currently at.
    pub from: usize,
    /// The 0-based display position to move it to.
    pub to: usize,
}

/// Handler for moving a product within its category.
///
/// Stale or out-of-range positions are a no-op; only the affected category's
/// document is rewritten.
pub async fn move_product(
    State(state): State<MoveProductState>,
    Extension(user_id): Extension<UserID>,
    Path((category_id, product_id)): Path<(String, String)>,
    Form(form): Form<MoveFormData>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_alert_response();
        }
    };

    let stale = loaded
        .categories
        .iter()
        .find(|category| category.id == category_id)
        .and_then(|category| category.products.get(form.from))
        .is_none_or(|product| product.id != product_id);
    if stale {
        tracing::debug!(
            "ignoring stale move request for product {product_id} (from {} to {})",
            form.from,
            form.to
        );
        return redirect_to_dashboard();
    }

    let reordered = reorder_products(loaded.categories, &category_id, form.from, form.to);

    let Some(category) = reordered
        .iter()
        .find(|category| category.id == category_id)
    else {
        return redirect_to_dashboard();
    };

    match store.save(category) {
        Ok(()) => redirect_to_dashboard(),
        Err(error) => {
            tracing::error!("could not save category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn redirect_to_dashboard() -> Response {
    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        (),
    )
        .into_response()
}

#[cfg(test)]
mod move_product_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        document::create_document_table,
        menu::{Category, Currency, MenuStore, Product, read_categories},
        user::UserID,
    };

    use super::{MoveFormData, MoveProductState, move_product};

    fn get_test_state() -> MoveProductState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_document_table(&connection).expect("Could not create document table");

        MoveProductState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn product(id: &str, order: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: "A test product".to_string(),
            price: 10.0,
            currency: Currency::Ars,
            image: None,
            featured: false,
            visible: true,
            category_id: "c1".to_string(),
            order,
        }
    }

    fn seed_menu(state: &MoveProductState) {
        MenuStore::new(state.db_connection.clone(), UserID::new(1))
            .save(&Category {
                id: "c1".to_string(),
                name: "Pizzas".to_string(),
                products: vec![product("p1", 0), product("p2", 1), product("p3", 2)],
                order: 0,
            })
            .unwrap();
    }

    async fn post_move(
        state: MoveProductState,
        product_id: &str,
        from: usize,
        to: usize,
    ) -> axum::response::Response {
        move_product(
            State(state),
            Extension(UserID::new(1)),
            Path(("c1".to_string(), product_id.to_string())),
            Form(MoveFormData { from, to }),
        )
        .await
    }

    #[tokio::test]
    async fn move_product_persists_new_order() {
        let state = get_test_state();
        seed_menu(&state);

        let response = post_move(state.clone(), "p3", 2, 0).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories[0].products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p1", "p2"]);
        let orders: Vec<i64> = categories[0].products.iter().map(|p| p.order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[tokio::test]
    async fn move_product_with_stale_position_is_a_noop() {
        let state = get_test_state();
        seed_menu(&state);

        let response = post_move(state.clone(), "p3", 0, 1).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories[0].products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
    }
}
