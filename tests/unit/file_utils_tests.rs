/*!
 * Tests for file utilities: encoding detection, atomic writes, discovery
 */

use std::fs;
use anyhow::Result;
use aquarelle::file_utils::{FileManager, OUTPUT_SUFFIX};
use crate::common;

#[test]
fn test_readSubtitleFile_withUtf8_shouldDecode() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "a.srt", "先用铅笔起稿")?;
    assert_eq!(FileManager::read_subtitle_file(&path).unwrap(), "先用铅笔起稿");
    Ok(())
}

#[test]
fn test_readSubtitleFile_withUtf8Bom_shouldStripBom() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("bom.srt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("先用铅笔起稿".as_bytes());
    fs::write(&path, bytes)?;

    assert_eq!(FileManager::read_subtitle_file(&path).unwrap(), "先用铅笔起稿");
    Ok(())
}

#[test]
fn test_readSubtitleFile_withGb18030_shouldDecode() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("gbk.srt");
    let (encoded, _, _) = encoding_rs::GB18030.encode("先用铅笔起稿");
    fs::write(&path, encoded)?;

    assert_eq!(FileManager::read_subtitle_file(&path).unwrap(), "先用铅笔起稿");
    Ok(())
}

#[test]
fn test_writeAtomic_shouldCreateFileWithContent() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.srt");
    FileManager::write_atomic(&path, "content")?;
    assert_eq!(fs::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_writeAtomic_shouldOverwriteExistingFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.srt");
    fs::write(&path, "old")?;
    FileManager::write_atomic(&path, "new")?;
    assert_eq!(fs::read_to_string(&path)?, "new");
    Ok(())
}

#[test]
fn test_findSrtFiles_shouldSkipTranslatedOutputs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "lesson1.srt", "x")?;
    common::create_test_file(dir.path(), "lesson2.SRT", "x")?;
    common::create_test_file(dir.path(), "lesson1.en.srt", "x")?;
    common::create_test_file(dir.path(), "notes.txt", "x")?;
    fs::create_dir(dir.path().join("nested"))?;
    common::create_test_file(&dir.path().join("nested"), "lesson3.srt", "x")?;

    let files = FileManager::find_srt_files(dir.path())?;
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();

    assert_eq!(files.len(), 3);
    assert!(names.contains(&"lesson1.srt".to_string()));
    assert!(names.contains(&"lesson2.SRT".to_string()));
    assert!(names.contains(&"lesson3.srt".to_string()));
    Ok(())
}

#[test]
fn test_outputPathFor_shouldAppendSuffixBesideInput() {
    let output = FileManager::output_path_for("/lessons/lesson1.srt");
    assert_eq!(output.to_string_lossy(), format!("/lessons/lesson1{}", OUTPUT_SUFFIX));
}
