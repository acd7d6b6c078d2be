use anyhow::{Result, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use encoding_rs::GB18030;
use log::debug;
use tempfile::NamedTempFile;

use crate::errors::SubtitleError;

// @module: File and directory utilities

/// Suffix carried by translated output files, e.g. `lesson1.en.srt`.
pub const OUTPUT_SUFFIX: &str = ".en.srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a subtitle file, detecting its encoding.
    ///
    /// Tries strict UTF-8 first, then UTF-8 with a BOM (stripped), then
    /// GB18030 for legacy-encoded Chinese files. A file that none of the
    /// three can decode losslessly is a document-level error.
    pub fn read_subtitle_file<P: AsRef<Path>>(path: P) -> Result<String, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| SubtitleError::Encoding(format!("{}: {}", path.display(), e)))?;

        // UTF-8 with BOM
        if let Some(stripped) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
            return match std::str::from_utf8(stripped) {
                Ok(s) => {
                    debug!("Decoded {} as UTF-8 with BOM", path.display());
                    Ok(s.to_string())
                }
                Err(e) => Err(SubtitleError::Encoding(format!(
                    "{}: BOM present but body is not valid UTF-8: {}",
                    path.display(),
                    e
                ))),
            };
        }

        // Plain UTF-8
        if let Ok(s) = std::str::from_utf8(&bytes) {
            return Ok(s.to_string());
        }

        // GB18030 fallback
        let (decoded, _, had_errors) = GB18030.decode(&bytes);
        if had_errors {
            return Err(SubtitleError::Encoding(format!(
                "{}: not valid UTF-8 and not valid GB18030",
                path.display()
            )));
        }
        debug!("Decoded {} as GB18030", path.display());
        Ok(decoded.into_owned())
    }

    /// Write a string to a file atomically.
    ///
    /// The content goes to a temporary file in the destination directory
    /// which is then renamed into place, so a cancelled or failed run never
    /// leaves a partially written output document.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        Self::ensure_dir(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to temporary file for {:?}", path))?;
        tmp.persist(path)
            .with_context(|| format!("Failed to move temporary file into place at {:?}", path))?;

        Ok(())
    }

    /// Write a string to a file (non-atomic, for logs)
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Find `.srt` files in a directory tree, skipping files that already
    /// carry the translated-output suffix.
    pub fn find_srt_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            let Some(name) = name else { continue };

            if !name.to_lowercase().ends_with(".srt") {
                continue;
            }
            if name.to_lowercase().ends_with(OUTPUT_SUFFIX) {
                continue;
            }
            result.push(path.to_path_buf());
        }

        result.sort();
        Ok(result)
    }

    // @generates: Output path for a translated subtitle file
    // @default: `<stem>.en.srt` beside the input
    pub fn output_path_for<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(OUTPUT_SUFFIX);

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }
}
