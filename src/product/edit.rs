//! The edit-product page and the endpoint for updating a product.

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
    menu::MenuStore,
    navigation::NavBar,
    user::UserID,
};

use super::form::{ProductFormData, ProductFormValues, product_form};

/// The state needed to update a product.
#[derive(Debug, Clone)]
pub struct EditProductState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_product_form(
    category_id: &str,
    product_id: &str,
    values: &ProductFormValues<'_>,
    error_message: Option<&str>,
) -> maud::Markup {
    let endpoint = format_endpoint(endpoints::PUT_PRODUCT, category_id);
    let endpoint = format_endpoint(&endpoint, product_id);

    product_form(("hx-put", &endpoint), "Save", values, error_message)
}

/// Display the page for editing an existing product.
pub async fn get_edit_product_page(
    State(state): State<EditProductState>,
    Extension(user_id): Extension<UserID>,
    Path((category_id, product_id)): Path<(String, String)>,
) -> Response {
    let store = MenuStore::new(state.db_connection.clone(), user_id);

    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("could not load menu: {error}");
            return error.into_response();
        }
    };

    let Some(product) = loaded
        .categories
        .iter()
        .find(|category| category.id == category_id)
        .and_then(|category| {
            category
                .products
                .iter()
                .find(|product| product.id == product_id)
        })
    else {
        return Error::NotFound.into_response();
    };

    let values = ProductFormValues {
        name: &product.name,
        description: &product.description,
        price: Some(product.price),
        currency: product.currency,
        image: product.image.as_deref().unwrap_or(""),
        featured: product.featured,
        visible: product.visible,
    };

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Product" }
            (edit_product_form(&category_id, &product_id, &values, None))
        }
    };

    Html(base("Edit Product", &content).into_string()).into_response()
}

/// Handler for updating a product.
///
/// The product keeps its id and position; every other field is replaced by
/// the form and the whole category document is rewritten.
pub async fn update_product(
    State(state): State<EditProductState>,
    Extension(user_id): Extension<UserID>,
    Path((category_id, product_id)): Path<(String, String)>,
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
                    edit_product_form(&category_id, &product_id, &values, Some(&error.to_string()))
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

    let Some(product) = category
        .products
        .iter_mut()
        .find(|product| product.id == product_id)
    else {
        return Error::NotFound.into_alert_response();
    };

    product.name = validated.name;
    product.description = validated.description;
    product.price = validated.price;
    product.currency = validated.currency;
    product.image = validated.image;
    product.featured = validated.featured;
    product.visible = validated.visible;

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
