pub mod playlist;

pub use playlist::{
    FIELD_DELIMITER, PLAYLIST_HEADER, PlaylistTable, SongRecord, discover_playlists,
};
