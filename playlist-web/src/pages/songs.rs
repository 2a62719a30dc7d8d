//! Song pages

use playlist_common::db::{Playlist, Song};

use super::{csrf_field, escape, layout, text_field};
use crate::flash::Flash;
use crate::forms::{FormErrors, SongForm};

/// All songs
pub fn songs_page(songs: &[Song], flash: Option<&Flash>) -> String {
    let items = if songs.is_empty() {
        "<p>No songs yet.</p>".to_string()
    } else {
        let rows: Vec<String> = songs
            .iter()
            .map(|s| {
                format!(
                    r#"        <li><a href="/songs/{}">{}</a> by {}</li>"#,
                    s.id,
                    escape(&s.title),
                    escape(&s.artist)
                )
            })
            .collect();
        format!("<ul>\n{}\n    </ul>", rows.join("\n"))
    };

    layout(
        "Songs",
        flash,
        &format!(
            r#"<h1>Songs</h1>
    {items}
    <p><a href="/songs/add" class="button">Add Song</a></p>"#,
            items = items
        ),
    )
}

/// One song and the playlists it is on
pub fn song_page(song: &Song, playlists: &[Playlist], flash: Option<&Flash>) -> String {
    let on_playlists = if playlists.is_empty() {
        "<p>Not on any playlist.</p>".to_string()
    } else {
        let rows: Vec<String> = playlists
            .iter()
            .map(|p| format!(r#"        <li><a href="/playlists/{}">{}</a></li>"#, p.id, escape(&p.name)))
            .collect();
        format!("<ul>\n{}\n    </ul>", rows.join("\n"))
    };

    layout(
        &song.title,
        flash,
        &format!(
            r#"<h1>{title}</h1>
    <p>Artist: {artist}</p>
    <h2>Playlists</h2>
    {on_playlists}"#,
            title = escape(&song.title),
            artist = escape(&song.artist),
            on_playlists = on_playlists
        ),
    )
}

/// New song form
pub fn new_song_page(form: &SongForm, errors: &FormErrors, csrf_token: &str, flash: Option<&Flash>) -> String {
    layout(
        "New Song",
        flash,
        &format!(
            r#"<h1>New Song</h1>
    <form method="POST" action="/songs/add">
    {csrf}
    {title}
    {artist}
    <button type="submit" class="button">Add</button>
    </form>"#,
            csrf = csrf_field(csrf_token, errors),
            title = text_field("title", "Title", &form.title, errors),
            artist = text_field("artist", "Artist", &form.artist, errors)
        ),
    )
}
