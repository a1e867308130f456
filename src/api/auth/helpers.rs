use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::ManagerCredentials;

const MANAGER_REALM: &str = r#"Basic realm="Acces Gerant", charset="UTF-8""#;

/// Plain comparison against the configured manager account.
pub fn check_credentials(expected: &ManagerCredentials, username: &str, password: &str) -> bool {
    username == expected.username && password == expected.password
}

/// 401 challenge asking the browser for the manager credentials
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static(MANAGER_REALM))],
        "Accès refusé. Authentification requise.",
    )
        .into_response()
}
