//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    category::{
        create_category, delete_category, get_edit_category_page, get_new_category_page,
        move_category, update_category,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    logging::logging_middleware,
    not_found::get_404_not_found,
    preview::get_preview_page,
    product::{
        create_product, delete_product, get_edit_product_page, get_new_product_page, move_product,
        toggle_product_featured, toggle_product_visibility, update_product,
    },
    public_menu::get_public_menu_page,
    register_user::{get_register_page, register_user},
    theme::toggle_theme,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::MENU_VIEW, get(get_public_menu_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::NEW_PRODUCT_VIEW, get(get_new_product_page))
        .route(endpoints::EDIT_PRODUCT_VIEW, get(get_edit_product_page))
        .route(endpoints::PREVIEW_VIEW, get(get_preview_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for
    // auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_CATEGORY, post(create_category))
            .route(
                endpoints::PUT_CATEGORY,
                put(update_category).delete(delete_category),
            )
            .route(endpoints::MOVE_CATEGORY, post(move_category))
            .route(endpoints::POST_PRODUCT, post(create_product))
            .route(
                endpoints::PUT_PRODUCT,
                put(update_product).delete(delete_product),
            )
            .route(endpoints::MOVE_PRODUCT, post(move_product))
            .route(
                endpoints::TOGGLE_PRODUCT_VISIBILITY,
                post(toggle_product_visibility),
            )
            .route(
                endpoints::TOGGLE_PRODUCT_FEATURED,
                post(toggle_product_featured),
            )
            .route(endpoints::TOGGLE_THEME, post(toggle_theme))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, routing::get_index_page};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "foobar")
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn public_menu_does_not_require_auth() {
        let server = get_test_server();

        let response = server.get(endpoints::MENU_VIEW).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn dashboard_requires_auth() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn api_routes_redirect_htmx_clients_to_log_in() {
        let server = get_test_server();

        let response = server.post(endpoints::POST_CATEGORY).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn form_submissions_reach_handlers_through_logging() {
        let server = get_test_server();
        let form = [("email", "ghost@example.com"), ("password", "nope")];

        // The logging middleware buffers and replays the request and response
        // bodies; the handler must still see the full form.
        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status_ok();
        assert!(response.text().contains("Incorrect email or password."));
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/route").await;

        response.assert_status_not_found();
    }
}
