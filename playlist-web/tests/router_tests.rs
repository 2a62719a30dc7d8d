//! Integration tests for playlist-web routes
//!
//! Each test builds the router over a fresh in-memory database and drives it
//! with `oneshot` requests.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use playlist_common::db::DatabaseOptions;
use playlist_common::Store;
use playlist_web::api::playlists::{DUPLICATE_NAME_MESSAGE, PLAYLIST_ADDED_MESSAGE};
use playlist_web::forms::{CSRF_INVALID_MESSAGE, CSRF_MISSING_MESSAGE};
use playlist_web::{build_router, AppState, SessionKey};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: store over an empty in-memory database plus its router
async fn setup_app() -> (Store, Router) {
    let store = Store::connect(&DatabaseOptions::in_memory())
        .await
        .expect("in-memory database");
    let app = build_router(AppState::new(store.clone(), SessionKey::generate()));
    (store, app)
}

/// A browser that has loaded a form: its session cookie and the form's token
struct Browser {
    cookie: String,
    token: String,
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form_with_cookie(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST as `browser`, including its CSRF token
fn post_form(uri: &str, browser: &Browser, body: &str) -> Request<Body> {
    let body = if body.is_empty() {
        format!("csrf_token={}", browser.token)
    } else {
        format!("csrf_token={}&{}", browser.token, body)
    };
    post_form_with_cookie(uri, &browser.cookie, &body)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

/// Full `Set-Cookie` value for the named cookie, if the response sets it
fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with(&prefix))
}

/// `name=value` part of a `Set-Cookie` value
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

fn csrf_token_in(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("csrf_token field") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

/// Load a form page as a first-time visitor
async fn open_form(app: &Router, uri: &str) -> Browser {
    let response = send(app, get(uri)).await;
    assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    let cookie = cookie_pair(&set_cookie(&response, "session").expect("session cookie"));
    let token = csrf_token_in(&body_text(response).await);
    Browser { cookie, token }
}

// =============================================================================
// Root and health
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_playlists() {
    let (_store, app) = setup_app().await;

    let response = send(&app, get("/")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/playlists");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_store, app) = setup_app().await;

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "playlist-web");
    assert!(body["version"].is_string());
}

// =============================================================================
// Playlists
// =============================================================================

#[tokio::test]
async fn test_playlists_page_serves_html() {
    let (_store, app) = setup_app().await;

    let response = send(&app, get("/playlists")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
    assert!(body_text(response).await.contains("No playlists yet."));
}

#[tokio::test]
async fn test_add_playlist_redirects_with_one_shot_flash() {
    let (store, app) = setup_app().await;
    let browser = open_form(&app, "/playlists/add").await;

    let response = send(&app, post_form("/playlists/add", &browser, "name=Road+Trip")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/playlists");
    let cookie = set_cookie(&response, "flash").expect("flash cookie");
    assert!(cookie.starts_with("flash=success."));

    let playlists = store.list_playlists().await.unwrap();
    assert_eq!(playlists.iter().filter(|p| p.name == "Road Trip").count(), 1);

    // Next page shows the message and clears the cookie
    let cookies = format!("{}; {}", browser.cookie, cookie_pair(&cookie));
    let response = send(&app, get_with_cookie("/playlists", &cookies)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response, "flash").expect("clearing cookie");
    assert!(cleared.contains("Max-Age=0"));
    let html = body_text(response).await;
    assert!(html.contains(PLAYLIST_ADDED_MESSAGE));
    assert!(html.contains("Road Trip"));

    // The page after that does not
    let response = send(&app, get_with_cookie("/playlists", &browser.cookie)).await;
    assert!(set_cookie(&response, "flash").is_none());
    assert!(!body_text(response).await.contains(PLAYLIST_ADDED_MESSAGE));
}

#[tokio::test]
async fn test_duplicate_playlist_rerenders_form_with_error() {
    let (store, app) = setup_app().await;
    store.create_playlist("Road Trip").await.unwrap();
    let browser = open_form(&app, "/playlists/add").await;

    let response = send(&app, post_form("/playlists/add", &browser, "name=Road+Trip")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"class="flash error""#));
    assert!(html.contains(DUPLICATE_NAME_MESSAGE));
    assert!(html.contains(r#"value="Road Trip""#));

    assert_eq!(store.list_playlists().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_playlist_name_shows_field_error() {
    let (store, app) = setup_app().await;
    let browser = open_form(&app, "/playlists/add").await;

    let response = send(&app, post_form("/playlists/add", &browser, "name=")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This field is required."));

    // A missing field is treated the same as a blank one
    let response = send(&app, post_form("/playlists/add", &browser, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This field is required."));

    assert!(store.list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_playlist_is_404() {
    let (_store, app) = setup_app().await;

    for uri in ["/playlists/999", "/playlists/abc", "/playlists/999/add-song"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let browser = open_form(&app, "/songs/add").await;
    let response = send(&app, post_form("/playlists/999/add-song", &browser, "song=1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playlist_page_lists_exactly_linked_songs() {
    let (store, app) = setup_app().await;
    let playlist = store.create_playlist("Mix").await.unwrap();
    let s1 = store.create_song("Imagine", "John Lennon").await.unwrap();
    let s2 = store.create_song("Hey Jude", "The Beatles").await.unwrap();
    store.create_song("Yesterday", "The Beatles").await.unwrap();
    store.add_song_to_playlist(playlist.id, s1.id).await.unwrap();
    store.add_song_to_playlist(playlist.id, s2.id).await.unwrap();

    let response = send(&app, get(&format!("/playlists/{}", playlist.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains(&format!(r#"<a href="/songs/{}">Imagine</a> by John Lennon"#, s1.id)));
    assert!(html.contains(&format!(r#"<a href="/songs/{}">Hey Jude</a> by The Beatles"#, s2.id)));
    assert!(!html.contains("Yesterday"));
}

// =============================================================================
// Add song to playlist
// =============================================================================

#[tokio::test]
async fn test_add_song_to_playlist_flow() {
    let (store, app) = setup_app().await;
    let playlist = store.create_playlist("Mix").await.unwrap();
    let s1 = store.create_song("Imagine", "John Lennon").await.unwrap();
    let s2 = store.create_song("Hey Jude", "The Beatles").await.unwrap();
    let form_uri = format!("/playlists/{}/add-song", playlist.id);

    let response = send(&app, get(&form_uri)).await;
    let cookie = cookie_pair(&set_cookie(&response, "session").expect("session cookie"));
    let html = body_text(response).await;
    assert!(html.contains(&format!(r#"<option value="{}">Imagine</option>"#, s1.id)));
    assert!(html.contains(&format!(r#"<option value="{}">Hey Jude</option>"#, s2.id)));
    let browser = Browser {
        cookie,
        token: csrf_token_in(&html),
    };

    let response = send(&app, post_form(&form_uri, &browser, &format!("song={}", s1.id))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/playlists/{}", playlist.id));

    // The linked song is no longer offered
    let html = body_text(send(&app, get(&form_uri)).await).await;
    assert!(!html.contains(&format!(r#"<option value="{}">"#, s1.id)));
    assert!(html.contains(&format!(r#"<option value="{}">Hey Jude</option>"#, s2.id)));

    let available = store.list_songs_not_in_playlist(playlist.id).await.unwrap();
    assert_eq!(available.len(), 2 - 1);
}

#[tokio::test]
async fn test_add_song_rejects_choice_not_offered() {
    let (store, app) = setup_app().await;
    let playlist = store.create_playlist("Mix").await.unwrap();
    let song = store.create_song("Imagine", "John Lennon").await.unwrap();
    store.add_song_to_playlist(playlist.id, song.id).await.unwrap();
    let form_uri = format!("/playlists/{}/add-song", playlist.id);
    let browser = open_form(&app, &form_uri).await;

    for body in [format!("song={}", song.id), "song=999".to_string(), "song=abc".to_string()] {
        let response = send(&app, post_form(&form_uri, &browser, &body)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", body);
        assert!(body_text(response).await.contains("Not a valid choice."));
    }

    assert_eq!(store.list_playlist_songs(playlist.id).await.unwrap().len(), 1);
}

// =============================================================================
// Songs
// =============================================================================

#[tokio::test]
async fn test_add_song_and_view_it() {
    let (store, app) = setup_app().await;
    let browser = open_form(&app, "/songs/add").await;

    let response = send(&app, post_form("/songs/add", &browser, "title=Imagine&artist=John+Lennon")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/songs");

    let songs = store.list_songs().await.unwrap();
    assert_eq!(songs.len(), 1);

    let html = body_text(send(&app, get(&format!("/songs/{}", songs[0].id))).await).await;
    assert!(html.contains("<h1>Imagine</h1>"));
    assert!(html.contains("Artist: John Lennon"));

    let html = body_text(send(&app, get("/songs")).await).await;
    assert!(html.contains("Imagine</a> by John Lennon"));
}

#[tokio::test]
async fn test_song_form_keeps_values_on_error() {
    let (store, app) = setup_app().await;
    let browser = open_form(&app, "/songs/add").await;

    let response = send(&app, post_form("/songs/add", &browser, "title=Imagine&artist=")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="Imagine""#));
    assert!(html.contains("This field is required."));
    assert!(store.list_songs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_song_page_lists_its_playlists() {
    let (store, app) = setup_app().await;
    let playlist = store.create_playlist("Road <Trip>").await.unwrap();
    let song = store.create_song("Imagine", "John Lennon").await.unwrap();
    store.add_song_to_playlist(playlist.id, song.id).await.unwrap();

    let html = body_text(send(&app, get(&format!("/songs/{}", song.id))).await).await;

    assert!(html.contains(&format!(
        r#"<a href="/playlists/{}">Road &lt;Trip&gt;</a>"#,
        playlist.id
    )));
}

#[tokio::test]
async fn test_missing_song_is_404() {
    let (_store, app) = setup_app().await;

    assert_eq!(send(&app, get("/songs/999")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&app, get("/songs/xyz")).await.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Cross-site request protection
// =============================================================================

#[tokio::test]
async fn test_form_post_without_csrf_token_writes_nothing() {
    let (store, app) = setup_app().await;
    let playlist = store.create_playlist("Mix").await.unwrap();
    let song = store.create_song("Imagine", "John Lennon").await.unwrap();
    let add_song_uri = format!("/playlists/{}/add-song", playlist.id);
    let browser = open_form(&app, "/playlists/add").await;

    let posts = [
        ("/playlists/add", "name=Road+Trip".to_string()),
        ("/songs/add", "title=Hey+Jude&artist=The+Beatles".to_string()),
        (add_song_uri.as_str(), format!("song={}", song.id)),
    ];

    for (uri, body) in &posts {
        let response = send(&app, post_form_with_cookie(uri, &browser.cookie, body)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let html = body_text(response).await;
        assert!(html.contains(CSRF_MISSING_MESSAGE), "{}", uri);
        // The re-rendered form carries a usable token
        assert_eq!(csrf_token_in(&html), browser.token);
    }

    assert_eq!(store.list_playlists().await.unwrap().len(), 1);
    assert_eq!(store.list_songs().await.unwrap().len(), 1);
    assert!(store.list_playlist_songs(playlist.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_from_another_session_rejected() {
    let (store, app) = setup_app().await;
    let victim = open_form(&app, "/playlists/add").await;
    let attacker = open_form(&app, "/playlists/add").await;

    let forged = Browser {
        cookie: victim.cookie.clone(),
        token: attacker.token.clone(),
    };
    let response = send(&app, post_form("/playlists/add", &forged, "name=Pwned")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(CSRF_INVALID_MESSAGE));
    assert!(store.list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_without_session_starts_one_and_writes_nothing() {
    let (store, app) = setup_app().await;
    let other = open_form(&app, "/songs/add").await;

    let body = format!("csrf_token={}&title=Imagine&artist=John+Lennon", other.token);
    let request = Request::builder()
        .method("POST")
        .uri("/songs/add")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "session").is_some());
    assert!(body_text(response).await.contains(CSRF_INVALID_MESSAGE));
    assert!(store.list_songs().await.unwrap().is_empty());
}

// =============================================================================
// Flash integrity
// =============================================================================

#[tokio::test]
async fn test_forged_flash_cookie_is_not_shown() {
    let (_store, app) = setup_app().await;

    // "success." followed by base64url("You won a prize"), with no signature
    let response = send(
        &app,
        get_with_cookie("/playlists", "flash=success.WW91IHdvbiBhIHByaXpl"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response, "flash").expect("clearing cookie");
    assert!(cleared.contains("Max-Age=0"));
    let html = body_text(response).await;
    assert!(!html.contains("You won a prize"));
    assert!(!html.contains(r#"class="flash"#));
}

#[tokio::test]
async fn test_error_page_spends_incoming_flash() {
    let (_store, app) = setup_app().await;
    let browser = open_form(&app, "/playlists/add").await;

    let response = send(&app, post_form("/playlists/add", &browser, "name=Road+Trip")).await;
    let flash = cookie_pair(&set_cookie(&response, "flash").expect("flash cookie"));
    let cookies = format!("{}; {}", browser.cookie, flash);

    for uri in ["/playlists/999", "/songs/abc"] {
        let response = send(&app, get_with_cookie(uri, &cookies)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let cleared = set_cookie(&response, "flash").expect("clearing cookie");
        assert!(cleared.contains("Max-Age=0"), "{}", uri);
    }
}
