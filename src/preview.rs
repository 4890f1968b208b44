//! The owner's preview of the public menu inside a phone frame.

use axum::response::{Html, IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Display the preview page.
///
/// The page embeds the live public menu in an iframe sized like a phone, so
/// the owner sees exactly what a diner would, including the theme setting.
pub async fn get_preview_page() -> Response {
    let content = html! {
        (NavBar::new(endpoints::PREVIEW_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Preview" }

            div
                class="rounded-[2.5rem] border-8 border-gray-800 dark:border-gray-600 \
                    overflow-hidden shadow-xl bg-white"
            {
                iframe
                    src=(endpoints::MENU_VIEW)
                    title="Public menu preview"
                    width="375"
                    height="667"
                    class="block" {}
            }

            p class="mt-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "This is the live public menu. Changes appear here as soon as they are saved."
            }
        }
    };

    Html(base("Preview", &content).into_string()).into_response()
}

#[cfg(test)]
mod preview_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document, response_body_text},
    };

    use super::get_preview_page;

    #[tokio::test]
    async fn preview_embeds_the_public_menu() {
        let response = get_preview_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        let document = parse_html_document(&text);
        assert_valid_html(&document);

        let iframe_selector = scraper::Selector::parse("iframe").unwrap();
        let iframe = document
            .select(&iframe_selector)
            .next()
            .expect("No iframe found");
        assert_eq!(iframe.value().attr("src"), Some(endpoints::MENU_VIEW));
    }
}
