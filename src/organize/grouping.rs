use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::Serialize;
use crate::audio::metadata::TagReader;
use crate::{OrganizedSong, Tags};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A file whose tags could not be read. It is left where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Artist -> album -> file name -> song.
///
/// The innermost key is the destination file name (title plus the source
/// extension), so two files sharing a title but not an extension both keep
/// their place. Inserting under an existing key replaces the earlier song.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Grouping {
    artists: BTreeMap<String, BTreeMap<String, BTreeMap<String, OrganizedSong>>>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `song`, returning the song it displaced, if any.
    pub fn insert(&mut self, song: OrganizedSong) -> Option<OrganizedSong> {
        let file_name = format!("{}{}", song.title, extension_suffix(&song.source_path));
        self.artists
            .entry(song.artist.clone())
            .or_default()
            .entry(song.album.clone())
            .or_default()
            .insert(file_name, song)
    }

    /// Songs in artist, album, file name order.
    pub fn songs(&self) -> impl Iterator<Item = &OrganizedSong> {
        self.artists
            .values()
            .flat_map(|albums| albums.values())
            .flat_map(|songs| songs.values())
    }

    pub fn artists(&self) -> impl Iterator<Item = &str> {
        self.artists.keys().map(String::as_str)
    }

    pub fn albums(&self, artist: &str) -> impl Iterator<Item = &str> {
        self.artists
            .get(artist)
            .into_iter()
            .flat_map(|albums| albums.keys().map(String::as_str))
    }

    #[cfg(test)]
    pub fn get(&self, artist: &str, album: &str, file_name: &str) -> Option<&OrganizedSong> {
        self.artists.get(artist)?.get(album)?.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.songs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// Output of [`organize`].
#[derive(Debug, Default)]
pub struct Organized {
    pub grouping: Grouping,
    pub failures: Vec<TagFailure>,
    /// Songs displaced by a later file resolving to the same destination.
    pub collisions: Vec<OrganizedSong>,
}

/// Reads the tags of every path and groups the results.
pub fn organize<R: TagReader + ?Sized>(paths: &[PathBuf], reader: &R) -> Organized {
    let mut organized = Organized::default();

    for path in paths {
        let tags = match reader.read_tags(path) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("Could not read tags from {}: {}", path.display(), e);
                organized.failures.push(TagFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let song = resolve_tags(path, tags);
        if let Some(displaced) = organized.grouping.insert(song) {
            warn!(
                "{} resolves to the same destination as {}, keeping the latter",
                displaced.source_path.display(),
                path.display()
            );
            organized.collisions.push(displaced);
        }
    }

    let grouping = &organized.grouping;
    let album_count: usize = grouping.artists().map(|a| grouping.albums(a).count()).sum();
    info!(
        "Grouped {} songs under {} artists and {} albums ({} unreadable)",
        grouping.len(),
        grouping.artists().count(),
        album_count,
        organized.failures.len()
    );
    organized
}

/// Fills in missing or empty tags: "Unknown Artist", "Unknown Album", and the
/// file name without its final extension for the title.
pub fn resolve_tags(path: &Path, tags: Tags) -> OrganizedSong {
    let present = |value: Option<String>| value.filter(|v| !v.is_empty());

    let title = present(tags.title).unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    OrganizedSong {
        source_path: path.to_path_buf(),
        artist: present(tags.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: present(tags.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        title,
    }
}

/// The source file's final extension with its leading dot, or an empty string.
pub fn extension_suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
