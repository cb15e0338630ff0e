use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{api::error, constants::SIDECAR_SUFFIX, modules::analysis::model::VideoAnalysis};

/// `clip.mp4` -> `clip-analysis.json`; names without an extension get the suffix appended.
pub fn sidecar_name(video_filename: &str) -> String {
    let stem = match video_filename.rfind('.') {
        Some(dot) if dot > 0 => &video_filename[..dot],
        _ => video_filename,
    };
    format!("{stem}{SIDECAR_SUFFIX}")
}

pub fn sidecar_path(video_path: &Path) -> PathBuf {
    let name = video_path
        .file_name()
        .map(|name| sidecar_name(&name.to_string_lossy()))
        .unwrap_or_else(|| SIDECAR_SUFFIX.trim_start_matches('-').to_string());
    video_path.with_file_name(name)
}

pub async fn read(path: &Path) -> Result<Option<VideoAnalysis>, error::SystemError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes through a temporary file and renames it into place, so readers
/// see either the previous document or the new one. Last writer wins.
pub async fn write(path: &Path, analysis: &VideoAnalysis) -> Result<(), error::SystemError> {
    let json = serde_json::to_vec_pretty(analysis)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", uuid::Uuid::now_v7()));
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        tokio::fs::remove_file(&tmp).await.ok();
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_final_extension() {
        assert_eq!(sidecar_name("clip.mp4"), "clip-analysis.json");
        assert_eq!(sidecar_name("video-17-42.webm"), "video-17-42-analysis.json");
        assert_eq!(sidecar_name("my.clip.mov"), "my.clip-analysis.json");
    }

    #[test]
    fn appends_when_no_extension() {
        assert_eq!(sidecar_name("clip"), "clip-analysis.json");
        assert_eq!(sidecar_name(".hidden"), ".hidden-analysis.json");
    }

    #[test]
    fn keeps_sidecar_next_to_video() {
        let path = sidecar_path(Path::new("/data/uploads/video-1-2.mp4"));
        assert_eq!(path, PathBuf::from("/data/uploads/video-1-2-analysis.json"));
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip-analysis.json");

        assert!(read(&path).await.unwrap().is_none());

        write(&path, &VideoAnalysis::fallback("first")).await.unwrap();
        write(&path, &VideoAnalysis::fallback("second")).await.unwrap();

        let doc = read(&path).await.unwrap().unwrap();
        assert_eq!(doc.summary, "second");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
