use std::path::{Component, Path, PathBuf};
use std::fs;
use log::{debug, info, warn};
use serde::Serialize;
use crate::organize::grouping::{extension_suffix, Grouping};
use crate::{OrganizeError, OrganizedSong, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message")]
pub enum MoveOutcome {
    Moved,
    DryRun,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: MoveOutcome,
}

impl MoveResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Failed(_))
    }
}

/// Relocates grouped songs under a destination root as `Artist/Album/Title.ext`.
pub struct Mover {
    destination_root: PathBuf,
    dry_run: bool,
}

impl Mover {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
            dry_run: false,
        }
    }

    /// When set, destinations are computed and reported but nothing is touched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Where `song` belongs under the destination root.
    ///
    /// Every tag has to be usable as a single path component; anything that
    /// would add, climb or replace directories is rejected.
    pub fn destination_for(&self, song: &OrganizedSong) -> Result<PathBuf> {
        let file_name = format!("{}{}", song.title, extension_suffix(&song.source_path));
        let mut destination = self.destination_root.clone();
        for segment in [song.artist.as_str(), song.album.as_str(), file_name.as_str()] {
            push_segment(&mut destination, segment)?;
        }
        Ok(destination)
    }

    /// Moves every song in `grouping`. Songs already in place produce no result;
    /// every other song produces exactly one, failures included.
    pub fn move_all(&self, grouping: &Grouping) -> Vec<MoveResult> {
        let mut results = Vec::new();

        for song in grouping.songs() {
            let source = song.source_path.clone();
            let destination = match self.destination_for(song) {
                Ok(destination) => destination,
                Err(e) => {
                    warn!("Cannot place {}: {}", source.display(), e);
                    results.push(MoveResult {
                        source,
                        destination: self.destination_root.clone(),
                        outcome: MoveOutcome::Failed(e.to_string()),
                    });
                    continue;
                }
            };

            if destination == source {
                debug!("Already in place: {}", source.display());
                continue;
            }

            let outcome = if self.dry_run {
                info!("would mv {} {}", source.display(), destination.display());
                MoveOutcome::DryRun
            } else {
                match self.relocate(&source, &destination) {
                    Ok(()) => MoveOutcome::Moved,
                    Err(e) => {
                        warn!("Error moving {}: {}", source.display(), e);
                        MoveOutcome::Failed(e.to_string())
                    }
                }
            };

            results.push(MoveResult {
                source,
                destination,
                outcome,
            });
        }

        results
    }

    fn relocate(&self, source: &Path, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            info!("mkdir {}", parent.display());
            fs::create_dir_all(parent)?;
        }

        // Looks at the entry itself so a dangling symlink still counts as taken.
        if fs::symlink_metadata(destination).is_ok() {
            return Err(OrganizeError::DestinationExists(destination.to_path_buf()));
        }

        info!("mv {} {}", source.display(), destination.display());
        fs::rename(source, destination)?;
        Ok(())
    }
}

/// Checks that `path` exists and is a directory, returning its canonical form.
pub fn existing_directory(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !fs::metadata(path)?.is_dir() {
        return Err(OrganizeError::NotADirectory(path.to_path_buf()));
    }
    Ok(fs::canonicalize(path)?)
}

fn push_segment(path: &mut PathBuf, segment: &str) -> Result<()> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == segment => {
            path.push(segment);
            Ok(())
        }
        _ => Err(OrganizeError::InvalidSegment(segment.to_string())),
    }
}
