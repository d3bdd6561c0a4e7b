//! Stock footage download over HTTP.

use futures_util::StreamExt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Stream `url` into the file at `path`.
///
/// The response body is written chunk by chunk; a partial file is removed
/// when the transfer fails.
pub async fn download_to_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> MediaResult<u64> {
    debug!("Downloading {} -> {}", url, path.display());

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::download_failed(format!(
            "GET {} returned {}",
            url, status
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let written = match write_body(response, path).await {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(path).await;
            return Err(e);
        }
    };

    if written == 0 {
        let _ = fs::remove_file(path).await;
        return Err(MediaError::download_failed(format!("empty body from {}", url)));
    }

    info!(
        "Download finished: {} ({} bytes)",
        path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
        written
    );
    Ok(written)
}

async fn write_body(response: reqwest::Response, path: &Path) -> MediaResult<u64> {
    let mut file = fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let data = chunk?;
        file.write_all(&data).await?;
        written += data.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path as url_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(url_path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("scene_1_raw.mp4");
        let client = reqwest::Client::new();

        let n = download_to_file(&client, &format!("{}/clip.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(n, 1024);
        assert_eq!(fs::read(&dest).await.unwrap().len(), 1024);
    }

    #[tokio::test]
    async fn test_download_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing.mp4");
        let err = download_to_file(&reqwest::Client::new(), &server.uri(), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed { .. }));
        assert!(!dest.exists());
    }
}
