//! Playlist routes

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Form, Router,
};
use tracing::debug;

use super::{redirect, redirect_with_flash, render};
use crate::error::{parse_id, AppResult};
use crate::flash::Flash;
use crate::forms::{FormErrors, NewSongForPlaylistForm, PlaylistForm};
use crate::pages::playlists::{
    add_song_to_playlist_page, new_playlist_page, playlist_page, playlists_page,
};
use crate::session::Session;
use crate::AppState;

pub const PLAYLIST_ADDED_MESSAGE: &str = "New playlist added successfully!";
pub const DUPLICATE_NAME_MESSAGE: &str =
    "A playlist with this name already exists. Please choose a different name.";

/// Build playlist routes
pub fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/playlists", get(show_all_playlists))
        .route("/playlists/add", get(new_playlist_form).post(add_playlist))
        .route("/playlists/:playlist_id", get(show_playlist))
        .route(
            "/playlists/:playlist_id/add-song",
            get(new_song_for_playlist_form).post(add_song_to_playlist),
        )
}

/// GET /playlists
async fn show_all_playlists(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let playlists = state.store.list_playlists().await?;
    Ok(render(playlists_page(&playlists, session.flash()), &session))
}

/// GET /playlists/:playlist_id
async fn show_playlist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    session: Session,
) -> AppResult<Response> {
    let playlist_id = parse_id("playlist", &raw_id)?;
    let playlist = state.store.get_playlist(playlist_id).await?;
    let songs = state.store.list_playlist_songs(playlist_id).await?;

    Ok(render(playlist_page(&playlist, &songs, session.flash()), &session))
}

/// GET /playlists/add
async fn new_playlist_form(session: Session) -> Response {
    let html = new_playlist_page(
        &PlaylistForm::default(),
        &FormErrors::default(),
        &session.csrf_token(),
        session.flash(),
    );
    render(html, &session)
}

/// POST /playlists/add
///
/// Valid and unique: create, flash success, redirect to /playlists.
/// Invalid (including a missing or wrong CSRF token): re-render with field
/// errors. Duplicate: re-render with an error flash.
async fn add_playlist(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PlaylistForm>,
) -> AppResult<Response> {
    let csrf_token = session.csrf_token();

    if let Err(errors) = form.validate(&session) {
        debug!("New playlist form invalid: {:?}", errors);
        let html = new_playlist_page(&form, &errors, &csrf_token, session.flash());
        return Ok(render(html, &session));
    }

    match state.store.create_playlist(&form.name).await {
        Ok(_) => Ok(redirect_with_flash(
            "/playlists",
            &session,
            &Flash::success(PLAYLIST_ADDED_MESSAGE),
        )),
        Err(playlist_common::Error::DuplicateName(_)) => {
            let duplicate = Flash::error(DUPLICATE_NAME_MESSAGE);
            let html = new_playlist_page(&form, &FormErrors::default(), &csrf_token, Some(&duplicate));
            Ok(render(html, &session))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /playlists/:playlist_id/add-song
async fn new_song_for_playlist_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    session: Session,
) -> AppResult<Response> {
    let playlist_id = parse_id("playlist", &raw_id)?;
    let playlist = state.store.get_playlist(playlist_id).await?;
    let choices = state.store.list_songs_not_in_playlist(playlist_id).await?;

    let html = add_song_to_playlist_page(
        &playlist,
        &choices,
        &NewSongForPlaylistForm::default(),
        &FormErrors::default(),
        &session.csrf_token(),
        session.flash(),
    );
    Ok(render(html, &session))
}

/// POST /playlists/:playlist_id/add-song
///
/// The selection must be one of the songs not yet on the playlist.
async fn add_song_to_playlist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    session: Session,
    Form(form): Form<NewSongForPlaylistForm>,
) -> AppResult<Response> {
    let playlist_id = parse_id("playlist", &raw_id)?;
    let playlist = state.store.get_playlist(playlist_id).await?;
    let choices = state.store.list_songs_not_in_playlist(playlist_id).await?;

    match form.validate(&session, &choices) {
        Ok(song_id) => {
            state.store.add_song_to_playlist(playlist_id, song_id).await?;
            Ok(redirect(&format!("/playlists/{}", playlist_id), &session))
        }
        Err(errors) => {
            debug!("Add-song form invalid for playlist {}: {:?}", playlist_id, errors);
            let html = add_song_to_playlist_page(
                &playlist,
                &choices,
                &form,
                &errors,
                &session.csrf_token(),
                session.flash(),
            );
            Ok(render(html, &session))
        }
    }
}
