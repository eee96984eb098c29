use crate::tools::GlobPattern;
use anyhow::Result;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 候選影片檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描資料夾下所有符合 glob 的檔案，依路徑不分大小寫排序
pub fn scan_video_files(directory: &Path, glob: &GlobPattern) -> Result<Vec<VideoCandidate>> {
    let mut video_files: Vec<VideoCandidate> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(directory)
                .is_ok_and(|relative| glob.matches(relative))
        })
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoCandidate {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    video_files.sort_by(|a, b| compare_paths_case_insensitive(&a.path, &b.path));
    Ok(video_files)
}

/// 不分大小寫比較路徑；相同時保持原順序
#[must_use]
pub fn compare_paths_case_insensitive(a: &Path, b: &Path) -> Ordering {
    let a = a.to_string_lossy().to_lowercase();
    let b = b.to_string_lossy().to_lowercase();
    a.cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::DEFAULT_VIDEO_GLOB;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_sorts_case_insensitive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Sub")).unwrap();
        fs::write(temp.path().join("b.mp4"), b"bb").unwrap();
        fs::write(temp.path().join("A.MKV"), b"a").unwrap();
        fs::write(temp.path().join("Sub/c.avi"), b"ccc").unwrap();
        fs::write(temp.path().join("readme.txt"), b"x").unwrap();

        let glob = GlobPattern::new(DEFAULT_VIDEO_GLOB).unwrap();
        let files = scan_video_files(temp.path(), &glob).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("A.MKV"),
                PathBuf::from("b.mp4"),
                PathBuf::from("Sub/c.avi")
            ]
        );
        assert_eq!(files[1].size, 2);
    }

    #[test]
    fn test_compare_paths_case_insensitive() {
        assert_eq!(
            compare_paths_case_insensitive(Path::new("/x/Apple.mp4"), Path::new("/x/banana.mp4")),
            Ordering::Less
        );
        assert_eq!(
            compare_paths_case_insensitive(Path::new("/x/ABC.mp4"), Path::new("/x/abc.mp4")),
            Ordering::Equal
        );
    }
}
