//! The public, unauthenticated menu page for diners.
//!
//! The page is a projection of the owner's menu: hidden products and empty
//! categories are dropped, featured products get their own section at the
//! top, and the owner's theme choice decides light or dark rendering. The
//! projection is also embedded as JSON and mirrored into localStorage so
//! the page can be re-rendered offline by the client.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    html::format_price,
    menu::{Category, Product, collect_featured, filter_visible, read_categories},
    theme::{ThemeConfig, load_theme},
};

/// The state needed to render the public menu.
#[derive(Debug, Clone)]
pub struct PublicMenuState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PublicMenuState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn product_entry(product: &Product) -> Markup {
    html! {
        li class="flex gap-3 py-3 border-b border-gray-100 dark:border-gray-800 last:border-b-0"
        {
            @if let Some(image) = &product.image
            {
                img
                    src=(image)
                    alt=(product.name)
                    class="w-16 h-16 rounded object-cover shrink-0";
            }

            div class="grow"
            {
                div class="flex justify-between gap-2"
                {
                    span class="font-medium" { (product.name) }
                    span class="whitespace-nowrap"
                    {
                        (format_price(product.price, product.currency))
                    }
                }

                p class="text-sm text-gray-500 dark:text-gray-400" { (product.description) }
            }
        }
    }
}

fn menu_section(title: &str, products: &[Product]) -> Markup {
    html! {
        section class="mb-6"
        {
            h2 class="text-lg font-semibold mb-1" { (title) }
            ul { @for product in products { (product_entry(product)) } }
        }
    }
}

/// Render the full public menu document.
pub fn public_menu_page(categories: &[Category], theme: ThemeConfig) -> Markup {
    let featured = collect_featured(categories);
    let visible = filter_visible(categories.to_vec());

    html! {
        (DOCTYPE)
        html lang="en" class=[theme.is_dark_mode.then_some("dark")]
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Menu - Carta" }
                link rel="icon" type="image/png" href="/static/favicon-32x32.png" sizes="32x32";

                script src="https://cdn.tailwindcss.com" {}
                script { (PreEscaped("tailwind.config = { darkMode: 'class' };")) }

                (offline_mirror_script(&visible, theme))
            }

            body class="min-h-screen bg-gray-50 dark:bg-gray-900 text-gray-900 dark:text-white"
            {
                main class="max-w-md mx-auto px-4 py-6"
                {
                    h1 class="text-2xl font-bold mb-6" { "Menu" }

                    @if visible.is_empty()
                    {
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "The menu is being updated. Please check back soon."
                        }
                    }

                    @if !featured.is_empty()
                    {
                        (menu_section("Featured", &featured))
                    }

                    @for category in &visible
                    {
                        (menu_section(&category.name, &category.products))
                    }
                }
            }
        }
    }
}

fn offline_mirror_script(categories: &[Category], theme: ThemeConfig) -> Markup {
    let categories_json = serde_json::to_string(categories)
        .unwrap_or_else(|_| "[]".to_string())
        // A literal "</script>" inside the JSON would end the script tag.
        .replace("</", "<\\/");

    html! {
        script
        {
            (PreEscaped(format!(
                "localStorage.setItem('categories', JSON.stringify({categories_json}));\n\
                 localStorage.setItem('menuDarkMode', '{}');",
                theme.is_dark_mode
            )))
        }
    }
}

/// Display the public menu.
///
/// This path never writes: duplicated documents are resolved in memory and
/// left in place for the owner's next dashboard visit to repair.
pub async fn get_public_menu_page(State(state): State<PublicMenuState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let categories = match read_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not read menu: {error}");
            return error.into_response();
        }
    };

    let theme = match load_theme(&connection) {
        Ok(theme) => theme,
        Err(error) => {
            tracing::error!("could not load theme: {error}");
            return error.into_response();
        }
    };

    Html(public_menu_page(&categories, theme).into_string()).into_response()
}
