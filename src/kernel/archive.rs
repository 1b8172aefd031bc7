use std::fmt;
use std::io::{Cursor, Seek, Write};

use rustc_hash::FxHashSet;
use zip_next::result::ZipError;
use zip_next::write::SimpleFileOptions;
use zip_next::{CompressionMethod, ZipWriter};

use crate::models::file_tree::{Node, NodeBody};

#[derive(Debug)]
pub enum ArchiveError {
    Zip(ZipError),
    Io(std::io::Error),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Zip(e) => write!(f, "archive error: {}", e),
            ArchiveError::Io(e) => write!(f, "archive io error: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Zip(e) => Some(e),
            ArchiveError::Io(e) => Some(e),
        }
    }
}

impl From<ZipError> for ArchiveError {
    fn from(value: ZipError) -> Self {
        Self::Zip(value)
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn archive_file_name(workspace: &str) -> String {
    format!("{}.zip", workspace)
}

/// Zips the tree: folders become `a/b/` directory entries, files `a/b/name`.
/// Sibling name clashes get a ` (n)` suffix before the extension, in tree order.
pub fn export_workspace(tree: &[Node]) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut written = FxHashSet::default();
        for node in tree {
            add_node(&mut zip, node, "", options, &mut written)?;
        }
        zip.finish()?;
    }
    Ok(buffer.into_inner())
}

fn add_node<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    node: &Node,
    prefix: &str,
    options: SimpleFileOptions,
    written: &mut FxHashSet<String>,
) -> Result<(), ArchiveError> {
    match &node.body {
        NodeBody::File { content, .. } => {
            let path = unique_entry(written, prefix, &node.name, "");
            zip.start_file(path, options)?;
            zip.write_all(content.as_bytes())?;
        }
        NodeBody::Folder { children, .. } => {
            let dir = unique_entry(written, prefix, &node.name, "/");
            zip.add_directory(dir.clone(), options)?;
            for child in children {
                add_node(zip, child, &dir, options, written)?;
            }
        }
    }
    Ok(())
}

/// First free `prefix + name + suffix`, trying `stem (2).ext`, `stem (3).ext`, ...
fn unique_entry(written: &mut FxHashSet<String>, prefix: &str, name: &str, suffix: &str) -> String {
    let mut path = format!("{}{}{}", prefix, name, suffix);
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && suffix.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 2;
    while written.contains(&path) {
        path = match ext {
            Some(ext) => format!("{}{} ({}).{}{}", prefix, stem, n, ext, suffix),
            None => format!("{}{} ({}){}", prefix, stem, n, suffix),
        };
        n += 1;
    }
    written.insert(path.clone());
    path
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/archive.rs"]
mod tests;
