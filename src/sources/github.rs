//! GitHub contents API fetcher
//!
//! Enumerates a repository tree through the contents endpoint. Directory
//! listings are paginated; subdirectories are walked breadth-first and
//! flattened into a single record list. Only entries carrying a known
//! image extension survive.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::ImageRecord;
use crate::utils::is_image_name;

use super::ImageFetcher;

/// Directory entries per page; the API caps at 100
const PER_PAGE: u32 = 100;

/// One entry of a contents-API directory listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentsEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub download_url: Option<String>,
}

pub struct GitHubTreeFetcher {
    client: reqwest::Client,
    contents_url: Url,
}

impl GitHubTreeFetcher {
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        let contents_url =
            Url::parse(config.contents_url.trim_end_matches('/')).map_err(|e| {
                SourceError::InvalidConfig {
                    message: format!("invalid contents URL '{}': {e}", config.contents_url),
                }
            })?;

        // The GitHub API rejects requests without a User-Agent.
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| SourceError::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            contents_url,
        })
    }

    /// URL of a directory inside the tree; the root for an empty path
    fn directory_url(&self, dir_path: &str) -> SourceResult<Url> {
        let mut url = self.contents_url.clone();
        if !dir_path.is_empty() {
            url.path_segments_mut()
                .map_err(|_| SourceError::InvalidConfig {
                    message: format!("contents URL '{}' cannot be a base", self.contents_url),
                })?
                .extend(dir_path.split('/'));
        }
        Ok(url)
    }

    /// One page of a directory listing
    async fn fetch_page(&self, dir_path: &str, page: u32) -> SourceResult<Vec<ContentsEntry>> {
        let mut url = self.directory_url(dir_path)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &PER_PAGE.to_string());

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SourceError::fetch_failed(url.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<Vec<ContentsEntry>>()
            .await
            .map_err(|e| SourceError::fetch_failed(url.as_str(), e.to_string()))
    }

    /// All entries of one directory, following pagination to exhaustion
    async fn list_directory(&self, dir_path: &str) -> SourceResult<Vec<ContentsEntry>> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(dir_path, page).await?;
            if batch.is_empty() {
                break;
            }
            let full_page = batch.len() as u32 == PER_PAGE;
            entries.extend(batch);
            if !full_page {
                break;
            }
            page += 1;
        }

        Ok(entries)
    }
}

#[async_trait]
impl ImageFetcher for GitHubTreeFetcher {
    async fn fetch(&self) -> SourceResult<Vec<ImageRecord>> {
        let mut records = Vec::new();
        // Breadth-first over the tree, root first
        let mut pending_dirs = std::collections::VecDeque::from([String::new()]);

        while let Some(dir_path) = pending_dirs.pop_front() {
            let entries = self.list_directory(&dir_path).await?;
            let (found, subdirs) = collect_image_records(entries);

            debug!(
                "Listed {:?}: {} image(s), {} subdirectory(ies)",
                if dir_path.is_empty() { "/" } else { dir_path.as_str() },
                found.len(),
                subdirs.len()
            );

            records.extend(found);
            pending_dirs.extend(subdirs);
        }

        if records.is_empty() {
            warn!("Source tree at {} listed no images", self.contents_url);
            return Err(SourceError::EmptyListing {
                url: self.contents_url.to_string(),
            });
        }

        Ok(records)
    }

    fn describe(&self) -> String {
        self.contents_url.to_string()
    }
}

/// Split a directory listing into image records and subdirectory paths
///
/// Files without a resolvable download URL or without an image extension
/// are dropped.
pub(crate) fn collect_image_records(
    entries: Vec<ContentsEntry>,
) -> (Vec<ImageRecord>, Vec<String>) {
    let mut records = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries {
        match entry.entry_type.as_str() {
            "file" if is_image_name(&entry.name) => {
                if let Some(download_url) = entry.download_url {
                    records.push(ImageRecord::new(entry.name, download_url));
                }
            }
            "dir" => subdirs.push(entry.path),
            _ => {}
        }
    }

    (records, subdirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, path: &str, entry_type: &str, download_url: Option<&str>) -> ContentsEntry {
        ContentsEntry {
            name: name.to_string(),
            path: path.to_string(),
            entry_type: entry_type.to_string(),
            download_url: download_url.map(str::to_string),
        }
    }

    #[test]
    fn listing_splits_into_images_and_subdirs() {
        let entries = vec![
            entry("cat.png", "cat.png", "file", Some("https://raw.test/cat.png")),
            entry("README.md", "README.md", "file", Some("https://raw.test/README.md")),
            entry("quotes", "Some interesting quotes", "dir", None),
            entry("loop.GIF", "loop.GIF", "file", Some("https://raw.test/loop.GIF")),
        ];

        let (records, subdirs) = collect_image_records(entries);

        assert_eq!(
            records,
            vec![
                ImageRecord::new("cat.png", "https://raw.test/cat.png"),
                ImageRecord::new("loop.GIF", "https://raw.test/loop.GIF"),
            ]
        );
        assert_eq!(subdirs, vec!["Some interesting quotes".to_string()]);
    }

    #[test]
    fn files_without_download_url_are_dropped() {
        let entries = vec![entry("cat.png", "cat.png", "file", None)];
        let (records, subdirs) = collect_image_records(entries);
        assert!(records.is_empty());
        assert!(subdirs.is_empty());
    }

    #[test]
    fn directory_urls_encode_awkward_path_segments() {
        let config = SourceConfig {
            contents_url: "https://api.github.com/repos/owner/repo/contents".to_string(),
            ..SourceConfig::default()
        };
        let fetcher = GitHubTreeFetcher::new(&config).unwrap();

        let url = fetcher.directory_url("Some interesting quotes").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/owner/repo/contents/Some%20interesting%20quotes"
        );
    }

    #[test]
    fn invalid_contents_url_is_rejected() {
        let config = SourceConfig {
            contents_url: "not a url".to_string(),
            ..SourceConfig::default()
        };
        assert!(matches!(
            GitHubTreeFetcher::new(&config),
            Err(SourceError::InvalidConfig { .. })
        ));
    }
}
