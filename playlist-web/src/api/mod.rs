//! HTTP handlers for playlist-web
//!
//! Each handler runs one or two store calls and then renders a page or
//! redirects.

pub mod health;
pub mod playlists;
pub mod songs;

pub use health::health_routes;
pub use playlists::playlist_routes;
pub use songs::song_routes;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};

use crate::flash::{clear_cookie, Flash, FLASH_COOKIE};
use crate::session::{read_cookie, Session};

/// GET /
///
/// Homepage: redirect to /playlists
pub async fn root() -> Redirect {
    Redirect::to("/playlists")
}

/// Render a page with the session's cookies (new session, consumed flash)
pub(crate) fn render(html: String, session: &Session) -> Response {
    (session_cookies(session, None), Html(html)).into_response()
}

/// Redirect, keeping the session's cookies
pub(crate) fn redirect(to: &str, session: &Session) -> Response {
    (session_cookies(session, None), Redirect::to(to)).into_response()
}

/// Redirect and leave a flash for the next rendered page
pub(crate) fn redirect_with_flash(to: &str, session: &Session, flash: &Flash) -> Response {
    (session_cookies(session, Some(flash)), Redirect::to(to)).into_response()
}

fn session_cookies(
    session: &Session,
    outgoing: Option<&Flash>,
) -> AppendHeaders<Vec<(header::HeaderName, header::HeaderValue)>> {
    let mut cookies = session.response_cookies();
    if let Some(flash) = outgoing {
        // The new flash replaces, rather than clears, any incoming one
        cookies.retain(|value| !value.as_bytes().starts_with(b"flash="));
        cookies.push(session.flash_cookie(flash));
    }
    AppendHeaders(cookies.into_iter().map(|value| (header::SET_COOKIE, value)).collect())
}

/// Clear an incoming flash cookie on 4xx/5xx responses, which never show it
pub async fn clear_flash_on_error(request: Request, next: Next) -> Response {
    let had_flash = read_cookie(request.headers(), FLASH_COOKIE).is_some();
    let mut response = next.run(request).await;

    let status = response.status();
    if had_flash && (status.is_client_error() || status.is_server_error()) {
        response.headers_mut().append(header::SET_COOKIE, clear_cookie());
    }
    response
}
