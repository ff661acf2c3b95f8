//! Concurrent avatar download.
//!
//! Every identifier gets its own task; the batch resolves once all of them
//! have settled and the results come back in request order. A failed
//! download is just a missing avatar.

use futures::future::join_all;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{Error, Result, USER_ID_PLACEHOLDER};

/// Raw avatar bytes, `None` when the download failed
pub type AvatarData = Option<Vec<u8>>;

#[derive(Debug, Clone)]
pub struct AvatarFetcher {
    client: Client,
    url_template: String,
    timeout: Option<Duration>,
}

impl AvatarFetcher {
    /// Build a fetcher for `url_template`, which must contain `{user_id}`.
    ///
    /// `timeout` bounds each individual request; `None` leaves it to the
    /// transport defaults.
    pub fn new(url_template: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let url_template = url_template.into();
        if !url_template.contains(USER_ID_PLACEHOLDER) {
            return Err(Error::ConfigError(format!(
                "avatar URL template has no {} placeholder: {}",
                USER_ID_PLACEHOLDER, url_template
            )));
        }
        url::Url::parse(&url_template.replace(USER_ID_PLACEHOLDER, "0")).map_err(|e| {
            Error::ConfigError(format!("invalid avatar URL template {}: {}", url_template, e))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url_template,
            timeout,
        })
    }

    /// URL the avatar of `user_id` is downloaded from.
    pub fn avatar_url(&self, user_id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(user_id.as_bytes()).collect();
        self.url_template.replace(USER_ID_PLACEHOLDER, &encoded)
    }

    /// Download all avatars concurrently.
    ///
    /// The result has one slot per input identifier, in input order, no
    /// matter which downloads finish first or fail.
    pub async fn fetch_all<S: AsRef<str>>(&self, ids: &[S]) -> Vec<AvatarData> {
        if ids.is_empty() {
            return Vec::new();
        }
        log::debug!("Fetching {} avatar(s)", ids.len());

        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let client = self.client.clone();
                let user_id = id.as_ref().to_string();
                let url = self.avatar_url(&user_id);
                let timeout = self.timeout;
                tokio::spawn(async move { fetch_one(&client, &user_id, &url, timeout).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(data) => data,
                Err(e) => {
                    log::error!("Avatar task did not complete: {}", e);
                    None
                }
            })
            .collect()
    }
}

async fn fetch_one(client: &Client, user_id: &str, url: &str, timeout: Option<Duration>) -> AvatarData {
    let mut request = client.get(url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            log::error!("Failed to download avatar for {}: {}", user_id, e);
            return None;
        }
    };
    if response.status() != StatusCode::OK {
        log::warn!("Avatar for {} returned HTTP {}", user_id, response.status());
        return None;
    }
    match response.bytes().await {
        Ok(body) if !body.is_empty() => Some(body.to_vec()),
        Ok(_) => {
            log::warn!("Avatar for {} was empty", user_id);
            None
        }
        Err(e) => {
            log::error!("Failed to read avatar body for {}: {}", user_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = AvatarFetcher::new("http://example.com/avatar.png", None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn unparsable_template_is_rejected() {
        let err = AvatarFetcher::new("not a url {user_id}", None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn avatar_url_substitutes_and_encodes() {
        let f = AvatarFetcher::new("http://h/a?uin={user_id}&spec=640", None).unwrap();
        assert_eq!(f.avatar_url("12345"), "http://h/a?uin=12345&spec=640");
        assert_eq!(f.avatar_url("a&b"), "http://h/a?uin=a%26b&spec=640");
    }

    #[tokio::test]
    async fn empty_batch_returns_empty() {
        let f = AvatarFetcher::new("http://127.0.0.1:9/{user_id}", None).unwrap();
        let ids: [&str; 0] = [];
        assert!(f.fetch_all(&ids).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_none() {
        // Port 9 (discard) is closed on test hosts; connection is refused.
        let f = AvatarFetcher::new("http://127.0.0.1:9/{user_id}", Some(Duration::from_secs(2))).unwrap();
        let out = f.fetch_all(&["1", "2"]).await;
        assert_eq!(out, vec![None, None]);
    }
}
