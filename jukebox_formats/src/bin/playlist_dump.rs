use std::env;

use anyhow::{Context, Result};
use jukebox_formats::PlaylistTable;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: playlist_dump <playlist CSV>")?;
    let table = PlaylistTable::open(&path);
    let songs = table.load()?;
    println!("{} songs in {}", songs.len(), table.path().display());
    for song in &songs {
        println!(
            "{title:<32} {artist:<24} {genre:<12} {popularity:>6} {rating:>6.1}",
            title = song.title,
            artist = song.artist,
            genre = song.genre,
            popularity = song.popularity,
            rating = song.rating
        );
    }
    Ok(())
}
