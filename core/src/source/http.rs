//! Production [`ListSource`]: fetches lists over HTTP(S), or reads them from disk
//! when a location is a plain path.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use vpncheck_common::AddressFamily;
use vpncheck_common::config::{Config, ListLocation};

use super::{ListFormat, ListSource, RawList};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("vpncheck/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
struct Endpoint {
    location: ListLocation,
    format: ListFormat,
}

#[derive(Debug, Clone)]
pub struct HttpListSource {
    client: reqwest::Client,
    ipv4: Endpoint,
    ipv6: Endpoint,
}

/// MISP warning lists carry other metadata too; only `list` matters here.
#[derive(Debug, Deserialize)]
struct MispList {
    #[serde(default)]
    list: Vec<serde_json::Value>,
}

impl HttpListSource {
    pub fn new(
        ipv4: ListLocation,
        ipv6: ListLocation,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport {
                location: "http client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            ipv4: Endpoint {
                location: ipv4,
                format: ListFormat::default_for(AddressFamily::Ipv4),
            },
            ipv6: Endpoint {
                location: ipv6,
                format: ListFormat::default_for(AddressFamily::Ipv6),
            },
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, FetchError> {
        Self::new(
            cfg.ipv4_source.clone(),
            cfg.ipv6_source.clone(),
            cfg.fetch_timeout,
        )
    }

    fn endpoint(&self, family: AddressFamily) -> &Endpoint {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            location: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl ListSource for HttpListSource {
    async fn fetch(&self, family: AddressFamily) -> Result<RawList, FetchError> {
        let endpoint = self.endpoint(family);
        let location = endpoint.location.to_string();
        debug!(%family, %location, "fetching range list");

        let body = match &endpoint.location {
            ListLocation::Url(url) => self.download(url).await?,
            ListLocation::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        location: location.clone(),
                        source,
                    })?
            }
        };

        decode(endpoint.format, &location, body)
    }
}

fn decode(format: ListFormat, location: &str, body: String) -> Result<RawList, FetchError> {
    match format {
        ListFormat::PlainText => Ok(RawList::Text(body)),
        ListFormat::MispJson => {
            let parsed: MispList =
                serde_json::from_str(&body).map_err(|e| FetchError::Payload {
                    location: location.to_string(),
                    message: e.to_string(),
                })?;

            let entries: Vec<String> = parsed
                .list
                .iter()
                .filter_map(|value| value.as_str())
                .filter(|entry| !entry.trim().is_empty())
                .map(str::to_string)
                .collect();

            Ok(RawList::Entries(entries))
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
