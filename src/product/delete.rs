//! The endpoint for removing a product from its category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, endpoints, menu::MenuStore, user::UserID};

/// The state needed to delete a product.
#[derive(Debug, Clone)]
pub struct DeleteProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for removing a product from its category.
///
/// Products have no documents of their own: the removal is a whole-category
/// save with the product taken out of the embedded list. The remaining
/// products keep their relative order.
pub async fn delete_product(
    State(state): State<DeleteProductState>,
    Extension(user_id): Extension<UserID>,
    Path((category_id, product_id)): Path<(String, String)>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_alert_response();
        }
    };

    let Some(mut category) = loaded
        .categories
        .into_iter()
        .find(|category| category.id == category_id)
    else {
        return Error::NotFound.into_alert_response();
    };

    category.products.retain(|product| product.id != product_id);

    match store.save(&category) {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not save category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_product_tests {
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
        user::UserID,
    };

    use super::{DeleteProductState, delete_product};

    fn get_test_state() -> DeleteProductState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_document_table(&connection).expect("Could not create document table");

        DeleteProductState {
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

    #[tokio::test]
    async fn delete_product_keeps_the_rest_of_the_category() {
        let state = get_test_state();
        MenuStore::new(state.db_connection.clone(), UserID::new(1))
            .save(&Category {
                id: "c1".to_string(),
                name: "Pizzas".to_string(),
                products: vec![product("p1", 0), product("p2", 1)],
                order: 0,
            })
            .unwrap();

        let response = delete_product(
            State(state.clone()),
            Extension(UserID::new(1)),
            Path(("c1".to_string(), "p1".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories[0].products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p2"]);
    }

    #[tokio::test]
    async fn delete_product_unknown_category_returns_not_found_alert() {
        let state = get_test_state();

        let response = delete_product(
            State(state),
            Extension(UserID::new(1)),
            Path(("missing".to_string(), "p1".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
