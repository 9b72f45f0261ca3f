use std::{
    fs,
    path::{Path, PathBuf},
};

use ignore::{DirEntry, WalkBuilder};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{
    error::{Result, StylometryError},
    stylometry::corpus::{config::CorpusConfig, Corpus},
};

/// separator between author and title in a file stem
pub const NAME_SEPARATOR: &str = "_-_";

/// Parallel author / title / text lists read from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocuments {
    pub authors: Vec<String>,
    pub titles: Vec<String>,
    pub texts: Vec<String>,
}

impl RawDocuments {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn into_corpus(self, config: CorpusConfig) -> Result<Corpus> {
        Corpus::new(self.authors, self.titles, self.texts, config)
    }
}

/// Split an `author_-_title` file stem, underscores become spaces
pub fn parse_file_stem(stem: &str) -> Option<(String, String)> {
    let (author, title) = stem.split_once(NAME_SEPARATOR)?;
    if author.is_empty() || title.is_empty() {
        return None;
    }
    Some((author.replace('_', " "), title.replace('_', " ")))
}

/// walk entry, or `None` with a warning when it could not be read
fn readable_entry(root: &Path, entry: std::result::Result<DirEntry, ignore::Error>) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!("skipping unreadable entry below {}: {}", root.display(), err);
            None
        }
    }
}

/// Read every `author_-_title.txt` file below `root`
///
/// The walk is recursive and includes hidden and ignored files; files whose
/// name does not follow the pattern are skipped. Documents come back sorted
/// by path, contents are read in parallel.
///
/// # Errors
/// * `PathNotFound` - `root` does not exist
/// * `Io` - a matching file could not be read
pub fn load_documents(root: impl AsRef<Path>) -> Result<RawDocuments> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(StylometryError::PathNotFound(root.to_path_buf()));
    }

    let mut files: Vec<(PathBuf, String, String)> = WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|e| readable_entry(root, e))
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|e| {
            let path = e.into_path();
            if path.extension().and_then(|x| x.to_str()) != Some("txt") {
                return None;
            }
            let parsed = path.file_stem().and_then(|s| s.to_str()).and_then(parse_file_stem);
            if parsed.is_none() {
                debug!("skipping {}: not an author_-_title file", path.display());
            }
            parsed.map(|(author, title)| (path, author, title))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let texts = files
        .par_iter()
        .map(|(path, _, _)| fs::read_to_string(path))
        .collect::<std::io::Result<Vec<String>>>()?;

    let (authors, titles) = files.into_iter().map(|(_, a, t)| (a, t)).unzip();
    info!("loaded {} documents from {}", texts.len(), root.display());
    Ok(RawDocuments { authors, titles, texts })
}
