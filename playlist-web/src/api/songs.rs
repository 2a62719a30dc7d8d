//! Song routes

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Form, Router,
};
use tracing::debug;

use super::{redirect, render};
use crate::error::{parse_id, AppResult};
use crate::forms::{FormErrors, SongForm};
use crate::pages::songs::{new_song_page, song_page, songs_page};
use crate::session::Session;
use crate::AppState;

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(show_all_songs))
        .route("/songs/add", get(new_song_form).post(add_song))
        .route("/songs/:song_id", get(show_song))
}

/// GET /songs
async fn show_all_songs(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let songs = state.store.list_songs().await?;
    Ok(render(songs_page(&songs, session.flash()), &session))
}

/// GET /songs/:song_id
async fn show_song(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    session: Session,
) -> AppResult<Response> {
    let song_id = parse_id("song", &raw_id)?;
    let song = state.store.get_song(song_id).await?;
    let playlists = state.store.list_song_playlists(song_id).await?;

    Ok(render(song_page(&song, &playlists, session.flash()), &session))
}

/// GET /songs/add
async fn new_song_form(session: Session) -> Response {
    let html = new_song_page(
        &SongForm::default(),
        &FormErrors::default(),
        &session.csrf_token(),
        session.flash(),
    );
    render(html, &session)
}

/// POST /songs/add
async fn add_song(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SongForm>,
) -> AppResult<Response> {
    if let Err(errors) = form.validate(&session) {
        debug!("New song form invalid: {:?}", errors);
        let html = new_song_page(&form, &errors, &session.csrf_token(), session.flash());
        return Ok(render(html, &session));
    }

    state.store.create_song(&form.title, &form.artist).await?;
    Ok(redirect("/songs", &session))
}
