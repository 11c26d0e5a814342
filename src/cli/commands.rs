use clap::Parser;
use std::path::PathBuf;
use crate::utils::file_ops::existing_directory;
use crate::{OrganizeError, Result};

pub const DESTINATION_ENV: &str = "MUSIC_STORAGE_DIRECTORY";

#[derive(Parser, Debug)]
#[command(name = "id3-to-directories")]
#[command(version)]
#[command(about = "Organize a directory of unsorted but tagged music files into \"$MUSIC_STORAGE_DIRECTORY/Artist Name/Album Name/Song Title.ext\"")]
#[command(after_help = "Example:\n  export MUSIC_STORAGE_DIRECTORY=/home/adamsmith/Music\n  id3-to-directories ~/Downloads")]
pub struct Cli {
    /// Directory to scan recursively for music files
    pub src_dir: PathBuf,

    /// Destination root, must already exist
    #[arg(long = "dest", env = DESTINATION_ENV)]
    pub dest_dir: Option<PathBuf>,

    /// Show what would be moved without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write a CSV report of every move and failure to this file
    #[arg(short = 'r', long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Canonical source and destination roots, both of which must be existing
    /// directories.
    pub fn directories(&self) -> Result<(PathBuf, PathBuf)> {
        let dest_dir = self
            .dest_dir
            .as_ref()
            .ok_or(OrganizeError::MissingDestination(DESTINATION_ENV))?;
        Ok((existing_directory(&self.src_dir)?, existing_directory(dest_dir)?))
    }
}
