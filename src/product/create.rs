//! The new-product page and the endpoint for adding a product to a category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    html::{FORM_CONTAINER_STYLE, base},
    menu::{MenuStore, Product, new_record_id},
    navigation::NavBar,
    user::UserID,
};

use super::form::{ProductFormData, ProductFormValues, product_form};

/// The state needed to add a product to a category.
#[derive(Debug, Clone)]
pub struct CreateProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn new_product_form(
    category_id: &str,
    values: &ProductFormValues<'_>,
    error_message: Option<&str>,
) -> maud::Markup {
    let endpoint = format_endpoint(endpoints::POST_PRODUCT, category_id);

    product_form(("hx-post", &endpoint), "Add Product", values, error_message)
}

/// Display the page for adding a product to a category.
pub async fn get_new_product_page(
    State(state): State<CreateProductState>,
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
            h1 class="text-xl font-bold mb-4" { "New Product in " (category.name) }
            (new_product_form(&category.id, &ProductFormValues::empty(), None))
        }
    };

    Html(base("New Product", &content).into_string()).into_response()
}

/// Handler for adding a product to a category.
///
/// The product is appended to the end of the category and the whole
/// category document is rewritten. Validation problems re-render the form
/// with an inline error message.
pub async fn create_product(
    State(state): State<CreateProductState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<String>,
    Form(form): Form<ProductFormData>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let validated = match form.validate() {
        Ok(validated) => validated,
        Err(error) => {
            let values = ProductFormValues {
                name: form.name.trim(),
                description: form.description.trim(),
                price: (form.price > 0.0).then_some(form.price),
                currency: Default::default(),
                image: form.image.as_deref().unwrap_or(""),
                featured: form.featured.is_some(),
                visible: form.visible.is_some(),
            };

            return (
                StatusCode::OK,
                Html(
                    new_product_form(&category_id, &values, Some(&error.to_string()))
                        .into_string(),
                ),
            )
                .into_response();
        }
    };

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

    let product = Product {
        id: new_record_id(),
        name: validated.name,
        description: validated.description,
        price: validated.price,
        currency: validated.currency,
        image: validated.image,
        featured: validated.featured,
        visible: validated.visible,
        category_id: category.id.clone(),
        order: category.products.len() as i64,
    };
    category.products.push(product);

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
