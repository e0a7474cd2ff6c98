use jukebox_formats::SongRecord;

/// Pluggable ordering over playlist records. Implementations are pure:
/// they return a reordered copy and never touch the backing table. All
/// three orderings are stable, so records sharing a key keep their
/// relative input order.
pub trait SortStrategy {
    fn sort(&self, songs: &[SongRecord]) -> Vec<SongRecord>;
}

/// Ascending lexicographic order on the genre field.
pub struct SortByGenre;

impl SortStrategy for SortByGenre {
    fn sort(&self, songs: &[SongRecord]) -> Vec<SongRecord> {
        let mut sorted = songs.to_vec();
        sorted.sort_by(|a, b| a.genre.cmp(&b.genre));
        sorted
    }
}

/// Descending numeric order on the popularity field.
pub struct SortByPopularity;

impl SortStrategy for SortByPopularity {
    fn sort(&self, songs: &[SongRecord]) -> Vec<SongRecord> {
        let mut sorted = songs.to_vec();
        sorted.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        sorted
    }
}

/// Descending numeric order on the rating field. Ratings are validated as
/// finite at parse time, so the total order never sees a NaN.
pub struct SortByUserRating;

impl SortStrategy for SortByUserRating {
    fn sort(&self, songs: &[SongRecord]) -> Vec<SongRecord> {
        let mut sorted = songs.to_vec();
        sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        sorted
    }
}
