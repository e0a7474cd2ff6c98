use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use walkdir::WalkDir;

/// Header row written at the top of every freshly created table.
pub const PLAYLIST_HEADER: &str = "title,artist,genre,popularity,rating";

/// Field delimiter used by playlist tables.
pub const FIELD_DELIMITER: char = ',';

/// One playlist row. Fields are validated when the record is built, so a
/// `SongRecord` in hand always carries a non-empty title, an integral
/// popularity and a finite rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub popularity: u32,
    pub rating: f32,
}

impl SongRecord {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
        popularity: u32,
        rating: f32,
    ) -> Result<Self> {
        let record = SongRecord {
            title: title.into().trim().to_string(),
            artist: artist.into().trim().to_string(),
            genre: genre.into().trim().to_string(),
            popularity,
            rating,
        };

        if record.title.is_empty() {
            bail!("song title must not be empty");
        }
        if !record.rating.is_finite() {
            bail!("song rating must be a finite number");
        }
        for field in [&record.title, &record.artist, &record.genre] {
            if field.contains(FIELD_DELIMITER) || field.contains('\n') {
                bail!("song field {field:?} contains a delimiter or newline");
            }
        }

        Ok(record)
    }

    /// Parse one delimited data row. Surrounding whitespace on every field
    /// is discarded.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).map(str::trim).collect();
        if fields.len() != 5 {
            bail!(
                "expected 5 comma-separated fields, got {}: {line:?}",
                fields.len()
            );
        }

        let popularity: u32 = fields[3]
            .parse()
            .with_context(|| format!("parsing popularity {:?}", fields[3]))?;
        let rating: f32 = fields[4]
            .parse()
            .with_context(|| format!("parsing rating {:?}", fields[4]))?;

        SongRecord::new(fields[0], fields[1], fields[2], popularity, rating)
    }

    /// Render the record as one delimited data row.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.title, self.artist, self.genre, self.popularity, self.rating
        )
    }

    /// The "Title - Artist" form shown to players and used for clip names.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// A named, file-backed ordered collection of song records. The file is an
/// UTF-8 comma-delimited table with an optional header row whose first
/// field is the literal `title` (any case).
#[derive(Debug, Clone)]
pub struct PlaylistTable {
    path: PathBuf,
}

impl PlaylistTable {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        PlaylistTable { path: path.into() }
    }

    /// Create a new empty table at `path`, writing the canonical header.
    /// An existing file at the same path is replaced.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let table = PlaylistTable { path: path.into() };
        fs::write(&table.path, format!("{PLAYLIST_HEADER}\n"))
            .with_context(|| format!("creating playlist table {}", table.path.display()))?;
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The table name players see: the file stem.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Load every data row, skipping the header when present. A malformed
    /// row fails the whole load.
    pub fn load(&self) -> Result<Vec<SongRecord>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading playlist table {}", self.path.display()))?;

        let mut songs = Vec::new();
        let mut first_content = true;
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if first_content {
                first_content = false;
                if is_header(trimmed) {
                    continue;
                }
            }
            let record = SongRecord::parse_line(trimmed).with_context(|| {
                format!("row {} of {}", index + 1, self.path.display())
            })?;
            songs.push(record);
        }

        Ok(songs)
    }

    /// Append one record. The table is read back and rewritten whole, never
    /// patched in place, so a file without a trailing newline stays intact.
    pub fn append(&self, record: &SongRecord) -> Result<()> {
        let mut text = match fs::read_to_string(&self.path) {
            Ok(existing) => existing,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading playlist table {}", self.path.display()));
            }
        };

        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&record.to_line());
        text.push('\n');

        fs::write(&self.path, text)
            .with_context(|| format!("writing playlist table {}", self.path.display()))
    }
}

fn is_header(line: &str) -> bool {
    line.split(FIELD_DELIMITER)
        .next()
        .map(|field| field.trim().eq_ignore_ascii_case("title"))
        .unwrap_or(false)
}

/// Scan `root` recursively for playlist tables, in deterministic path order.
pub fn discover_playlists(root: &Path) -> Result<Vec<PlaylistTable>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.with_context(|| format!("scanning playlist root {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_table = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_table {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths.into_iter().map(PlaylistTable::open).collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn seeded_table(dir: &Path) -> PlaylistTable {
        let path = dir.join("mix.csv");
        fs::write(
            &path,
            "title,artist,genre,popularity,rating\n\
             Song1,Artist1,Rock,50,4.2\n\
             Song2,Artist2,Jazz,75,3.8\n\
             Song3,Artist3,Rock,30,4.9\n",
        )
        .expect("seed playlist");
        PlaylistTable::open(path)
    }

    #[test]
    fn loads_rows_and_skips_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = seeded_table(dir.path());

        let songs = table.load().expect("loaded table");
        let titles: Vec<&str> = songs.iter().map(|song| song.title.as_str()).collect();
        assert_eq!(titles, vec!["Song1", "Song2", "Song3"]);
        assert_eq!(songs[1].popularity, 75);
        assert_eq!(songs[2].rating, 4.9);
    }

    #[test]
    fn loads_headerless_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bare.csv");
        fs::write(&path, "Song1,Artist1,Pop,10,4.5\n").expect("seed playlist");

        let songs = PlaylistTable::open(path).load().expect("loaded table");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Song1");
    }

    #[test]
    fn malformed_row_fails_whole_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.csv");
        fs::write(
            &path,
            "title,artist,genre,popularity,rating\n\
             Song1,Artist1,Pop,not-a-number,4.5\n",
        )
        .expect("seed playlist");

        assert!(PlaylistTable::open(path).load().is_err());
    }

    #[test]
    fn parse_line_trims_surrounding_whitespace() {
        let record =
            SongRecord::parse_line("  Song1 , Artist1 ,  Pop , 10 , 4.5 ").expect("parsed row");
        assert_eq!(record.title, "Song1");
        assert_eq!(record.artist, "Artist1");
        assert_eq!(record.genre, "Pop");
        assert_eq!(record.popularity, 10);
        assert_eq!(record.rating, 4.5);
    }

    #[test]
    fn parse_line_rejects_bad_rows() {
        assert!(SongRecord::parse_line("Song1,Artist1,Pop,10").is_err());
        assert!(SongRecord::parse_line("Song1,Artist1,Pop,10,4.5,extra").is_err());
        assert!(SongRecord::parse_line("Song1,Artist1,Pop,-3,4.5").is_err());
        assert!(SongRecord::parse_line("Song1,Artist1,Pop,10,wild").is_err());
        assert!(SongRecord::parse_line(",Artist1,Pop,10,4.5").is_err());
    }

    #[test]
    fn append_round_trips_through_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = seeded_table(dir.path());

        let record = SongRecord::new("Song4", "Artist4", "Pop", 10, 4.5).expect("record");
        table.append(&record).expect("appended row");

        let songs = table.load().expect("reloaded table");
        assert_eq!(songs.len(), 4);
        assert_eq!(songs[3], record);
    }

    #[test]
    fn append_handles_missing_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mix.csv");
        fs::write(&path, "Song1,Artist1,Pop,10,4.5").expect("seed playlist");
        let table = PlaylistTable::open(path);

        let record = SongRecord::new("Song2", "Artist2", "Jazz", 20, 3.0).expect("record");
        table.append(&record).expect("appended row");

        let songs = table.load().expect("reloaded table");
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].title, "Song2");
    }

    #[test]
    fn create_writes_canonical_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fresh.csv");

        let table = PlaylistTable::create(&path).expect("created table");
        let text = fs::read_to_string(&path).expect("read back");
        assert_eq!(text, format!("{PLAYLIST_HEADER}\n"));
        assert!(table.load().expect("loaded empty table").is_empty());
    }

    #[test]
    fn discovery_returns_tables_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("zebra.csv"), "").expect("seed");
        fs::write(dir.path().join("alpha.csv"), "").expect("seed");
        fs::write(dir.path().join("notes.txt"), "").expect("seed");

        let tables = discover_playlists(dir.path()).expect("scanned root");
        let names: Vec<String> = tables.iter().map(PlaylistTable::name).collect();
        assert_eq!(names, vec!["alpha", "zebra"]);
    }
}
