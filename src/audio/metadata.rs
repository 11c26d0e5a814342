use std::io;
use std::path::Path;
use id3::TagLike;
use log::{debug, warn};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, StandardTagKey, Tag};
use symphonia::core::probe::Hint;
use crate::{OrganizeError, Result, Tags};

/// Best-effort source of artist/album/title for a file.
///
/// Files with partial or no metadata yield `Ok` with the missing fields set to
/// `None`. An `Err` means the file could not be read at all.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<Tags>;
}

impl<F> TagReader for F
where
    F: Fn(&Path) -> Result<Tags>,
{
    fn read_tags(&self, path: &Path) -> Result<Tags> {
        self(path)
    }
}

/// Reads tags from ID3v2 headers with `id3`, then fills whatever is still
/// missing from container metadata (FLAC comments, RIFF INFO, MP4 atoms, ...)
/// through symphonia's probe.
///
/// A file without any recognizable tag, including one that is not audio at
/// all, yields empty [`Tags`]. Only failing to open or read the file is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTagReader;

impl FileTagReader {
    pub fn new() -> Self {
        Self
    }
}

impl TagReader for FileTagReader {
    fn read_tags(&self, path: &Path) -> Result<Tags> {
        let file = std::fs::File::open(path)?;

        let mut tags = read_id3(path)?;
        if tags.artist.is_none() || tags.album.is_none() || tags.title.is_none() {
            read_container(path, file, &mut tags);
        }
        Ok(tags)
    }
}

fn read_id3(path: &Path) -> Result<Tags> {
    match id3::Tag::read_from_path(path) {
        Ok(tag) => Ok(Tags {
            artist: non_empty(tag.artist()),
            album: non_empty(tag.album()),
            title: non_empty(tag.title()),
        }),
        Err(e) => match e.kind {
            id3::ErrorKind::NoTag => Ok(Tags::default()),
            // Files shorter than an ID3 header simply have no tag.
            id3::ErrorKind::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Ok(Tags::default())
            }
            id3::ErrorKind::Io(err) => Err(OrganizeError::Io(err)),
            _ => {
                warn!("Ignoring unreadable ID3 tag in {}: {}", path.display(), e.description);
                Ok(Tags::default())
            }
        },
    }
}

fn read_container(path: &Path, file: std::fs::File, tags: &mut Tags) {
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let mut probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        Err(e) => {
            debug!("No container metadata in {}: {}", path.display(), e);
            return;
        }
    };

    // Container metadata first, tags found while probing fill the gaps.
    if let Some(revision) = probed.format.metadata().current() {
        apply_tags(tags, revision.tags());
    }
    if let Some(metadata) = probed.metadata.get() {
        if let Some(revision) = metadata.current() {
            apply_tags(tags, revision.tags());
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim_end_matches('\0'))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn apply_tags(tags: &mut Tags, source: &[Tag]) {
    for tag in source {
        let slot = match tag.std_key {
            Some(StandardTagKey::Artist) => &mut tags.artist,
            Some(StandardTagKey::Album) => &mut tags.album,
            Some(StandardTagKey::TrackTitle) => &mut tags.title,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }
        let value = tag.value.to_string();
        let value = value.trim_end_matches('\0');
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }
}
