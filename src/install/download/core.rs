//! Archive download with bounded redirect following

use std::io::IsTerminal;
use std::path::Path;

use async_recursion::async_recursion;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::InstallError;

/// Redirect hops allowed before giving up
pub const MAX_REDIRECTS: u32 = 5;

const USER_AGENT: &str = concat!("easygit-installer/", env!("CARGO_PKG_VERSION"));

/// Streams one release archive to disk
///
/// The client never follows redirects on its own; each hop is an explicit
/// recursive call carrying the hop count, so there is no shared counter.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: reqwest::Client,
    max_redirects: u32,
    show_progress: bool,
}

impl ArchiveFetcher {
    pub fn new() -> Result<Self, InstallError> {
        Ok(Self {
            client: build_client(USER_AGENT)?,
            max_redirects: MAX_REDIRECTS,
            show_progress: std::io::stderr().is_terminal(),
        })
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download `url` into `destination`, returning the number of bytes written
    ///
    /// On error the destination may hold a partial file; the caller owns cleanup.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, InstallError> {
        self.fetch_hop(url.to_string(), destination, 0).await
    }

    #[async_recursion]
    async fn fetch_hop(&self, url: String, destination: &Path, hops: u32) -> Result<u64, InstallError> {
        debug!("GET {url} (hop {hops})");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| InstallError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_redirection()
            && let Some(location) = response.headers().get(LOCATION)
        {
            let location = location.to_str().map_err(|_| InstallError::InvalidRedirect {
                url: url.clone(),
                location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            })?;
            let next = resolve_location(&url, location)?;

            let hops = hops + 1;
            if hops > self.max_redirects {
                return Err(InstallError::TooManyRedirects {
                    url,
                    max: self.max_redirects,
                });
            }

            debug!("{status} redirect -> {next}");
            return self.fetch_hop(next, destination, hops).await;
        }

        if status != StatusCode::OK {
            return Err(InstallError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        self.stream_to_file(response, &url, destination).await
    }

    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        url: &str,
        destination: &Path,
    ) -> Result<u64, InstallError> {
        let total_bytes = response.content_length();
        let progress = self.progress_bar(total_bytes);

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| InstallError::io(destination, e))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| InstallError::Network {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| InstallError::io(destination, e))?;
            downloaded += chunk.len() as u64;
            progress.set_position(downloaded);
        }

        file.flush().await.map_err(|e| InstallError::io(destination, e))?;
        progress.finish_and_clear();

        info!("Downloaded {downloaded} bytes to {}", destination.display());
        Ok(downloaded)
    }

    fn progress_bar(&self, total_bytes: Option<u64>) -> ProgressBar {
        match total_bytes {
            Some(total) if self.show_progress => {
                let pb = ProgressBar::new(total);
                let style = ProgressStyle::default_bar()
                    .template("   [{bar:50.green/blue}] {bytes}/{total_bytes}  {msg}")
                    .map(|s| s.progress_chars("█▓░"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
                pb.set_style(style);
                pb.set_message("📥 easygit");
                pb
            }
            _ => ProgressBar::hidden(),
        }
    }
}

fn build_client(user_agent: &str) -> Result<reqwest::Client, InstallError> {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .user_agent(user_agent)
        .build()
        .map_err(|source| InstallError::HttpClient { source })
}

/// Resolve a possibly relative `Location` header against the current URL
fn resolve_location(current: &str, location: &str) -> Result<String, InstallError> {
    let invalid = || InstallError::InvalidRedirect {
        url: current.to_string(),
        location: location.to_string(),
    };
    let base = Url::parse(current).map_err(|_| invalid())?;
    let next = base.join(location).map_err(|_| invalid())?;
    Ok(next.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_location_replaces_url() {
        let next = resolve_location("https://a.example/x/y", "https://b.example/z").unwrap();
        assert_eq!(next, "https://b.example/z");
    }

    #[test]
    fn relative_location_is_joined() {
        let next = resolve_location("https://a.example/v1/easygit.tar.gz", "/cdn/blob").unwrap();
        assert_eq!(next, "https://a.example/cdn/blob");
    }

    #[test]
    fn client_build_failure_is_not_a_config_error() {
        let err = build_client("bad\nagent").unwrap_err();
        assert!(matches!(err, InstallError::HttpClient { .. }), "unexpected error: {err:?}");
        assert!(err.to_string().contains("HTTP client"));
    }

    #[test]
    fn unparsable_base_is_invalid_redirect() {
        let err = resolve_location("not a url", "/x").unwrap_err();
        assert!(matches!(err, InstallError::InvalidRedirect { .. }));
    }
}
