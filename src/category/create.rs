//! The new-category page and the endpoint for creating a category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    menu::{Category, CategoryName, MenuStore, names_equal_ignore_case},
    navigation::NavBar,
    user::UserID,
};

use super::category_name_input;

/// The state needed to create a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn new_category_form(name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CATEGORY)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (category_name_input(name, error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
        }
    }
}

/// Display the page for creating a new category.
pub async fn get_new_category_page() -> Response {
    let content = html! {
        (NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Category" }
            (new_category_form("", None))
        }
    };

    Html(base("New Category", &content).into_string()).into_response()
}

#[derive(Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
}

/// Handler for creating a new category.
///
/// The new category is appended to the end of the menu. Names that are
/// empty, too long or already taken by another category (ignoring case)
/// re-render the form with an inline error message.
pub async fn create_category(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return form_response(form.name.trim(), &error),
    };

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_alert_response();
        }
    };

    let name_taken = loaded
        .categories
        .iter()
        .any(|category| names_equal_ignore_case(&category.name, name.as_ref()));
    if name_taken {
        let error = Error::DuplicateCategoryName(name.to_string());
        return form_response(name.as_ref(), &error);
    }

    let category = Category {
        id: String::new(),
        name: name.to_string(),
        products: Vec::new(),
        order: loaded.categories.len() as i64,
    };

    match store.create(category) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create category: {error}");
            error.into_alert_response()
        }
    }
}

fn form_response(name: &str, error: &Error) -> Response {
    (
        StatusCode::OK,
        Html(new_category_form(name, Some(&error.to_string())).into_string()),
    )
        .into_response()
}

#[cfg(test)]
mod create_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        document::create_document_table,
        endpoints,
        menu::{MenuStore, read_categories},
        test_utils::{
            assert_form_error_message, assert_form_input, assert_form_submit_button,
            assert_hx_endpoint, must_get_form, parse_html_document, parse_html_fragment,
            response_body_text,
        },
        user::UserID,
    };

    use super::{CategoryFormData, CreateCategoryState, create_category, get_new_category_page};

    fn get_test_state() -> CreateCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_document_table(&connection).expect("Could not create document table");

        CreateCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn post_category(state: CreateCategoryState, name: &str) -> axum::response::Response {
        create_category(
            State(state),
            Extension(UserID::new(1)),
            Form(CategoryFormData {
                name: name.to_string(),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn new_category_page_displays_form() {
        let response = get_new_category_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        let document = parse_html_document(&text);
        let form = must_get_form(&document);

        assert_hx_endpoint(&form, endpoints::POST_CATEGORY, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn create_category_persists_and_redirects_to_dashboard() {
        let state = get_test_state();

        let response = post_category(state.clone(), "Pizzas").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );

        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Pizzas");
        assert!(!categories[0].id.is_empty());
    }

    #[tokio::test]
    async fn create_category_appends_to_the_end() {
        let state = get_test_state();

        post_category(state.clone(), "Pizzas").await;
        post_category(state.clone(), "Drinks").await;

        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Pizzas", "Drinks"]);
        assert_eq!(categories[1].order, 1);
    }

    #[tokio::test]
    async fn create_category_rejects_duplicate_name_ignoring_case() {
        let state = get_test_state();
        let store = MenuStore::new(state.db_connection.clone(), UserID::new(1));
        store
            .create(crate::menu::Category {
                id: String::new(),
                name: "Pizzas".to_string(),
                products: Vec::new(),
                order: 0,
            })
            .unwrap();

        let response = post_category(state.clone(), "pizzas").await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        let fragment = parse_html_fragment(&text);
        let form = must_get_form(&fragment);
        assert_form_error_message(&form, "A category named \"pizzas\" already exists");
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test]
    async fn create_category_rejects_accented_duplicate_name() {
        let state = get_test_state();
        let store = MenuStore::new(state.db_connection.clone(), UserID::new(1));
        store
            .create(crate::menu::Category {
                id: String::new(),
                name: "Café".to_string(),
                products: Vec::new(),
                order: 0,
            })
            .unwrap();

        let response = post_category(state.clone(), "CAFÉ").await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        assert!(text.contains("already exists"));
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test]
    async fn create_category_rejects_empty_name() {
        let state = get_test_state();

        let response = post_category(state.clone(), "   ").await;

        assert_eq!(response.status(), StatusCode::OK);
        let categories = read_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert!(categories.is_empty());
    }
}
