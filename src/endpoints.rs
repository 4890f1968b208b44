//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/categories/{category_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for the logged in owner: the editable menu.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for adding a product to a category.
pub const NEW_PRODUCT_VIEW: &str = "/categories/{category_id}/products/new";
/// The page for editing an existing product.
pub const EDIT_PRODUCT_VIEW: &str = "/categories/{category_id}/products/{product_id}/edit";
/// The owner-facing preview of the public menu inside a phone frame.
pub const PREVIEW_VIEW: &str = "/preview";
/// The public, unauthenticated menu page for diners.
pub const MENU_VIEW: &str = "/menu";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register the owner account.
pub const USERS: &str = "/api/users";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to move a category to a new position.
pub const MOVE_CATEGORY: &str = "/api/categories/{category_id}/move";
/// The route to add a product to a category.
pub const POST_PRODUCT: &str = "/api/categories/{category_id}/products";
/// The route to update a product.
pub const PUT_PRODUCT: &str = "/api/categories/{category_id}/products/{product_id}";
/// The route to delete a product.
pub const DELETE_PRODUCT: &str = "/api/categories/{category_id}/products/{product_id}";
/// The route to move a product within its category.
pub const MOVE_PRODUCT: &str = "/api/categories/{category_id}/products/{product_id}/move";
/// The route to flip a product's visibility.
pub const TOGGLE_PRODUCT_VISIBILITY: &str = "/api/products/{product_id}/visibility";
/// The route to flip a product's featured flag.
pub const TOGGLE_PRODUCT_FEATURED: &str = "/api/products/{product_id}/featured";
/// The route to flip the public menu between light and dark mode.
pub const TOGGLE_THEME: &str = "/api/theme";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace. For example,
/// in the endpoint path '/categories/{category_id}/edit', '{category_id}' is
/// the parameter.
///
/// Paths with two parameters (the product routes) are formatted by calling
/// this function once per id, category id first.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
