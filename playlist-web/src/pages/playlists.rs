//! Playlist pages

use playlist_common::db::{Playlist, PlaylistSongDetail, Song};

use super::{csrf_field, escape, field_errors, layout, text_field};
use crate::flash::Flash;
use crate::forms::{FormErrors, NewSongForPlaylistForm, PlaylistForm};

/// All playlists
pub fn playlists_page(playlists: &[Playlist], flash: Option<&Flash>) -> String {
    let items = if playlists.is_empty() {
        "<p>No playlists yet.</p>".to_string()
    } else {
        let rows: Vec<String> = playlists
            .iter()
            .map(|p| format!(r#"        <li><a href="/playlists/{}">{}</a></li>"#, p.id, escape(&p.name)))
            .collect();
        format!("<ul>\n{}\n    </ul>", rows.join("\n"))
    };

    layout(
        "Playlists",
        flash,
        &format!(
            r#"<h1>Playlists</h1>
    {items}
    <p><a href="/playlists/add" class="button">Add Playlist</a></p>"#,
            items = items
        ),
    )
}

/// One playlist and its songs
pub fn playlist_page(playlist: &Playlist, songs: &[PlaylistSongDetail], flash: Option<&Flash>) -> String {
    let items = if songs.is_empty() {
        "<p>This playlist has no songs yet.</p>".to_string()
    } else {
        let rows: Vec<String> = songs
            .iter()
            .map(|s| {
                format!(
                    r#"        <li><a href="/songs/{}">{}</a> by {}</li>"#,
                    s.song_id,
                    escape(&s.title),
                    escape(&s.artist)
                )
            })
            .collect();
        format!("<ul>\n{}\n    </ul>", rows.join("\n"))
    };

    layout(
        &playlist.name,
        flash,
        &format!(
            r#"<h1>{name}</h1>
    <h2>Songs</h2>
    {items}
    <p><a href="/playlists/{id}/add-song" class="button">Add Song</a></p>"#,
            name = escape(&playlist.name),
            items = items,
            id = playlist.id
        ),
    )
}

/// New playlist form
pub fn new_playlist_page(
    form: &PlaylistForm,
    errors: &FormErrors,
    csrf_token: &str,
    flash: Option<&Flash>,
) -> String {
    layout(
        "New Playlist",
        flash,
        &format!(
            r#"<h1>New Playlist</h1>
    <form method="POST" action="/playlists/add">
    {csrf}
    {name}
    <button type="submit" class="button">Add</button>
    </form>"#,
            csrf = csrf_field(csrf_token, errors),
            name = text_field("name", "Name", &form.name, errors)
        ),
    )
}

/// Add-song form; only songs not yet on the playlist are offered
pub fn add_song_to_playlist_page(
    playlist: &Playlist,
    choices: &[Song],
    form: &NewSongForPlaylistForm,
    errors: &FormErrors,
    csrf_token: &str,
    flash: Option<&Flash>,
) -> String {
    let options: Vec<String> = choices
        .iter()
        .map(|song| {
            let selected = if form.song.trim() == song.id.to_string() {
                " selected"
            } else {
                ""
            };
            format!(
                r#"            <option value="{}"{}>{}</option>"#,
                song.id,
                selected,
                escape(&song.title)
            )
        })
        .collect();

    layout(
        &format!("Add a song to {}", playlist.name),
        flash,
        &format!(
            r#"<h1>Add a song to {name}</h1>
    <form method="POST" action="/playlists/{id}/add-song">
    {csrf}
    <div class="field">
        <label for="song">Song</label>
        <select id="song" name="song">
{options}
        </select>
        {errors}
    </div>
    <button type="submit" class="button">Add</button>
    </form>
    <p><a href="/playlists/{id}">Back to {name}</a></p>"#,
            name = escape(&playlist.name),
            id = playlist.id,
            csrf = csrf_field(csrf_token, errors),
            options = options.join("\n"),
            errors = field_errors(errors, "song")
        ),
    )
}
