//! Alert fragments for displaying success and error messages to the user.
//!
//! Forms and buttons set `hx-target-error="#alert-container"` so that error
//! responses from the API land in the fixed alert container at the bottom of
//! the page instead of replacing the triggering element.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const ALERT_ERROR_STYLE: &str = "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// A dismissible error alert with a bold message and a detail line.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert.
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    /// Render the alert as a markup fragment.
    pub fn into_markup(self) -> Markup {
        let color_style = ALERT_ERROR_STYLE;

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                class={ "flex items-start p-4 mb-4 rounded-lg shadow " (color_style) }
                role="alert"
            {
                div class="text-sm"
                {
                    span class="font-medium" { (self.message) }

                    @if !self.details.is_empty()
                    {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg focus:ring-2 focus:ring-gray-400 inline-flex items-center justify-center h-8 w-8 bg-transparent"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove(); document.getElementById('alert-container').classList.add('hidden');"
                {
                    span class="sr-only" { "Close" }
                    "✕"
                }
            }

            script { "document.getElementById('alert-container').classList.remove('hidden');" }
        }
    }

    /// Render the alert as an HTML response with the given status code.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_markup()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::http::StatusCode;

    use crate::test_utils::parse_html_fragment;

    use super::Alert;

    #[tokio::test]
    async fn error_alert_renders_message_and_details() {
        let markup = Alert::error("Something went wrong", "The details.").into_markup();

        let document = parse_html_fragment(&markup.into_string());
        let text = document.root_element().text().collect::<String>();

        assert!(text.contains("Something went wrong"));
        assert!(text.contains("The details."));
    }

    #[tokio::test]
    async fn alert_omits_empty_details() {
        let markup = Alert::error("Saved", "").into_markup();
        let html_string = markup.into_string();

        let document = parse_html_fragment(&html_string);
        let p_selector = scraper::Selector::parse("p").unwrap();
        assert_eq!(document.select(&p_selector).count(), 0);
    }

    #[tokio::test]
    async fn response_carries_status() {
        let response =
            Alert::error("Nope", "").into_response_with_status(StatusCode::BAD_REQUEST);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
