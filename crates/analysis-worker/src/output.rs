//! Writing finished documents so readers never see a half-written file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::WorkerError;

pub fn round_file_name(season: u32, round: u32) -> String {
    format!("season-{season}-round-{round}.json")
}

pub fn highlights_file_name(season: u32) -> String {
    format!("season-{season}-highlights.json")
}

/// Pretty-print `document` to a sibling temp file, then rename it over `path`.
pub async fn write_json_atomic<T: Serialize>(path: &Path, document: &T) -> Result<(), WorkerError> {
    let json = serde_json::to_string_pretty(document)?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(path).with_file_name(tmp_name);

    tokio::fs::write(&tmp, json.as_bytes()).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!(path = %path.display(), bytes = json.len(), "Document written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(round_file_name(2, 5), "season-2-round-5.json");
        assert_eq!(highlights_file_name(3), "season-3-highlights.json");
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = std::env::temp_dir().join(format!("league-out-{}", std::process::id()));
        let path = dir.join("nested").join(round_file_name(1, 1));

        write_json_atomic(&path, &serde_json::json!({"roundNumber": 1})).await.unwrap();
        write_json_atomic(&path, &serde_json::json!({"roundNumber": 2})).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["roundNumber"], 2);
        assert!(!path.with_file_name("season-1-round-1.json.tmp").exists());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
