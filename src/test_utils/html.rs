use axum::{body::Body, response::Response};
use scraper::Html;

pub(crate) async fn response_body_text(response: Response<Body>) -> String {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) fn parse_html_document(text: &str) -> Html {
    Html::parse_document(text)
}

pub(crate) fn parse_html_fragment(text: &str) -> Html {
    Html::parse_fragment(text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
