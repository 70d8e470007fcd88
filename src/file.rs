//! Loading of JSON documents (fixtures and calibrations) from the filesystem.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::trace;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, io::Error> {
    let path = path.as_ref();
    trace!("reading {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub trait FromJsonFile: Sized {
    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error>;
}

impl<D: DeserializeOwned> FromJsonFile for D {
    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        read_json(path)
    }
}

/// Expands `path` into the `.json` files beneath it, in lexicographic order. A path naming a file
/// is returned as-is, whatever its extension.
pub fn json_files(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, io::Error> {
    let path = path.as_ref();
    if !fs::metadata(path)?.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = vec![];
    collect(path.to_path_buf(), &mut files, &|extension: &OsStr| extension == "json")?;
    files.sort();
    Ok(files)
}

fn collect(path: PathBuf, files: &mut Vec<PathBuf>, filter: &impl Fn(&OsStr) -> bool) -> Result<(), io::Error> {
    if fs::metadata(&path)?.is_dir() {
        for entry in fs::read_dir(path)? {
            collect(entry?.path(), files, filter)?;
        }
    } else if filter(path.extension().unwrap_or_default()) {
        files.push(path);
    }
    Ok(())
}
