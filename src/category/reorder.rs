//! The endpoint for moving a category to a new position in the menu.

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
    menu::{MenuStore, reorder_categories},
    user::UserID,
};

/// The state needed to reorder categories.
#[derive(Debug, Clone)]
pub struct MoveCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MoveCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct MoveFormData {
    /// The 0-based display position the category is currently at.
    pub from: usize,
    /// The 0-based display position to move it to.
    pub to: usize,
}

/// Handler for moving a category to a new position.
///
/// Out-of-range positions are a no-op rather than an error: the page the
/// request came from may be stale after a concurrent edit, and redirecting
/// back to the dashboard shows the current order either way. Every category
/// is rewritten because moving one renumbers them all.
pub async fn move_category(
    State(state): State<MoveCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
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

    // The path id guards against acting on a stale page: the category at
    // `from` must still be the one the owner clicked.
    let stale = loaded
        .categories
        .get(form.from)
        .is_none_or(|category| category.id != category_id);
    if stale {
        tracing::debug!(
            "ignoring stale move request for category {category_id} (from {} to {})",
            form.from,
            form.to
        );
        return redirect_to_dashboard();
    }

    let reordered = reorder_categories(loaded.categories, form.from, form.to);

    for category in &reordered {
        if let Err(error) = store.save(category) {
            tracing::error!("could not save category {}: {error}", category.id);
            return error.into_alert_response();
        }
    }

    redirect_to_dashboard()
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
mod move_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        document::create_document_table,
        menu::{Category, MenuStore, read_categories},
        user::UserID,
    };

    use super::{MoveCategoryState, MoveFormData, move_category};

    fn get_test_state() -> MoveCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_document_table(&connection).expect("Could not create document table");

        MoveCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed_categories(state: &MoveCategoryState) {
        let store = MenuStore::new(state.db_connection.clone(), UserID::new(1));

        for (i, (id, name)) in [("c1", "Pizzas"), ("c2", "Drinks"), ("c3", "Desserts")]
            .into_iter()
            .enumerate()
        {
            store
                .save(&Category {
                    id: id.to_string(),
                    name: name.to_string(),
                    products: Vec::new(),
                    order: i as i64,
                })
                .unwrap();
        }
    }

    async fn post_move(
        state: MoveCategoryState,
        category_id: &str,
        from: usize,
        to: usize,
    ) -> axum::response::Response {
        move_category(
            State(state),
            Extension(UserID::new(1)),
            Path(category_id.to_string()),
            Form(MoveFormData { from, to }),
        )
        .await
    }

    #[tokio::test]
    async fn move_category_persists_new_order() {
        let state = get_test_state();
        seed_categories(&state);

        let response = post_move(state.clone(), "c1", 0, 2).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c3", "c1"]);
        let orders: Vec<i64> = categories.iter().map(|c| c.order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[tokio::test]
    async fn move_category_with_stale_position_is_a_noop() {
        let state = get_test_state();
        seed_categories(&state);

        // `from` no longer points at c3; nothing should move.
        let response = post_move(state.clone(), "c3", 0, 1).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn move_category_out_of_range_is_a_noop() {
        let state = get_test_state();
        seed_categories(&state);

        let response = post_move(state.clone(), "c1", 0, 9).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);
    }
}
