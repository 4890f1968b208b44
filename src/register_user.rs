//! The registration page for creating the restaurant owner's account.
//!
//! Carta is single-tenant: registration is only open while no account exists.
//! Once the owner account is created, further registrations are rejected.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    app_state::create_cookie_key,
    auth::cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, email_input, link,
        log_in_register, password_input,
    },
    user::{count_users, create_user},
};

/// The minimum number of characters the password should have to be considered
/// valid on the client side (server-side validation is done on top of this
/// validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn registration_form(
    email: &str,
    email_error_message: Option<&str>,
    password_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target="this"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, email_error_message))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, password_error_message))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, confirm_password_error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None, None);
    let content = log_in_register("Create the owner account", &registration_form);

    Html(base("Register", &content).into_string()).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
    /// Create the cookie key from a string and set the default cookie
    /// duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection,
        }
    }
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests.
///
/// On success the owner is logged in immediately and redirected to the
/// dashboard. Validation problems re-render the form with inline error
/// messages.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    match count_users(
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    ) {
        Ok(count) if count >= 1 => {
            tracing::warn!("registration attempted but {}", Error::RegistrationClosed);
            return form_response(
                &user_data.email,
                Some("An owner account already exists, please log in instead."),
                None,
                None,
            );
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("could not count users: {error}");
            return error.into_response();
        }
    }

    let email = user_data.email.trim();
    if email.is_empty() || !email.contains('@') {
        return form_response(email, Some("Enter a valid email address."), None, None);
    }

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            return form_response(email, None, Some(error.to_string().as_ref()), None);
        }
    };

    if user_data.password != user_data.confirm_password {
        return form_response(email, None, None, Some("Passwords do not match"));
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_response();
        }
    };

    let user = match create_user(
        email,
        password_hash,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    ) {
        Ok(user) => user,
        Err(Error::EmailTaken) => {
            return form_response(
                email,
                Some("The email address is already registered."),
                None,
                None,
            );
        }
        Err(error) => {
            tracing::error!("could not create user: {error}");
            return error.into_response();
        }
    };

    set_auth_cookie(jar, user.id, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
                .into_response()
        })
        .unwrap_or_else(|error| {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                (),
            )
                .into_response()
        })
}

fn form_response(
    email: &str,
    email_error: Option<&str>,
    password_error: Option<&str>,
    confirm_error: Option<&str>,
) -> Response {
    (
        StatusCode::OK,
        Html(registration_form(email, email_error, password_error, confirm_error).into_string()),
    )
        .into_response()
}

#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        PasswordHash, endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, must_get_form,
            parse_html_document, response_body_text,
        },
        user::{count_users, create_user, create_user_table},
    };

    use super::{RegisterForm, RegistrationState, get_register_page, register_user};

    const STRONG_PASSWORD: &str = "averysafeandsecurepassword";

    fn get_test_state() -> RegistrationState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        RegistrationState::new("foobar", Arc::new(Mutex::new(connection)))
    }

    async fn post_register(state: RegistrationState, form: RegisterForm) -> axum::response::Response {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        register_user(State(state), jar, Form(form)).await
    }

    #[tokio::test]
    async fn register_page_displays_form() {
        let response = get_register_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        let document = parse_html_document(&text);
        let form = must_get_form(&document);

        assert_hx_endpoint(&form, endpoints::USERS, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn registration_creates_owner_and_redirects_to_dashboard() {
        let state = get_test_state();

        let response = post_register(
            state.clone(),
            RegisterForm {
                email: "owner@example.com".to_string(),
                password: STRONG_PASSWORD.to_string(),
                confirm_password: STRONG_PASSWORD.to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );
        assert_eq!(
            count_users(&state.db_connection.lock().unwrap()).unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn registration_is_closed_once_an_account_exists() {
        let state = get_test_state();
        create_user(
            "owner@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = post_register(
            state.clone(),
            RegisterForm {
                email: "second@example.com".to_string(),
                password: STRONG_PASSWORD.to_string(),
                confirm_password: STRONG_PASSWORD.to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        assert!(text.contains("already exists"));
        assert_eq!(
            count_users(&state.db_connection.lock().unwrap()).unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn registration_rejects_weak_password() {
        let state = get_test_state();

        let response = post_register(
            state.clone(),
            RegisterForm {
                email: "owner@example.com".to_string(),
                password: "password1234".to_string(),
                confirm_password: "password1234".to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            count_users(&state.db_connection.lock().unwrap()).unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn registration_rejects_mismatched_passwords() {
        let state = get_test_state();

        let response = post_register(
            state,
            RegisterForm {
                email: "owner@example.com".to_string(),
                password: STRONG_PASSWORD.to_string(),
                confirm_password: "somethingelseentirely".to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = response_body_text(response).await;
        assert!(text.contains("Passwords do not match"));
    }
}
