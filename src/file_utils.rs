use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, file name prefixed
    pub fn output_path_for<P: AsRef<Path>>(input_file: P, prefix: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let file_name = input_file.file_name().unwrap_or_default().to_string_lossy();
        input_file.with_file_name(format!("{}{}", prefix, file_name))
    }

    // @checks: Whether a file is itself the product of an earlier run
    pub fn is_translated_output<P: AsRef<Path>>(path: P, prefix: &str) -> bool {
        !prefix.is_empty()
            && path.as_ref()
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
    }

    // @checks: Extension against a list, case-insensitive, leading dot optional
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        let Some(ext) = path.as_ref().extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        extensions.iter()
            .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
    }

    /// Find subtitle files in a directory, sorted by path.
    ///
    /// Without `recursive` only the directory itself is searched.
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P, extensions: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let max_depth = if recursive { usize::MAX } else { 1 };

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).max_depth(max_depth).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to read directory entry in {:?}", dir))?;
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, extensions) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file.
    ///
    /// The content goes to a temporary file in the same directory first and
    /// is renamed over the target, so a failed run never leaves half a file.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to move output into place: {:?}", path))?;

        Ok(())
    }
}
