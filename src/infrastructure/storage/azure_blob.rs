//! Azure Blob Storage over its REST API, authorized with Shared Key.

use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode, Url, header::CONTENT_TYPE};
use sha2::Sha256;
use tracing::{debug, info};

use crate::domain::repositories::BlobStore;

const API_VERSION: &str = "2021-08-06";
const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

type HmacSha256 = Hmac<Sha256>;

/// Account credentials and API endpoint read from a storage connection string.
#[derive(Debug, Clone)]
pub struct StorageAccount {
    pub name: String,
    key: Vec<u8>,
    pub blob_endpoint: Url,
}

impl StorageAccount {
    /// Accepts `AccountName=..;AccountKey=..;` strings with either
    /// `EndpointSuffix` or an explicit `BlobEndpoint`, and
    /// `UseDevelopmentStorage=true` for the local emulator.
    pub fn from_connection_string(value: &str) -> anyhow::Result<Self> {
        let settings: BTreeMap<&str, &str> = value
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim()))
            .collect();

        if settings.get("UseDevelopmentStorage") == Some(&"true") {
            return Self::new(DEV_ACCOUNT_NAME, DEV_ACCOUNT_KEY, DEV_BLOB_ENDPOINT);
        }

        let name = settings
            .get("AccountName")
            .context("connection string has no AccountName")?;
        let key = settings
            .get("AccountKey")
            .context("connection string has no AccountKey")?;
        let endpoint = match settings.get("BlobEndpoint") {
            Some(endpoint) => endpoint.to_string(),
            None => format!(
                "{}://{}.blob.{}",
                settings.get("DefaultEndpointsProtocol").unwrap_or(&"https"),
                name,
                settings.get("EndpointSuffix").unwrap_or(&"core.windows.net")
            ),
        };

        Self::new(name, key, &endpoint)
    }

    fn new(name: &str, key: &str, endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            name: name.to_string(),
            key: STANDARD
                .decode(key)
                .context("storage account key is not valid base64")?,
            blob_endpoint: Url::parse(endpoint.trim_end_matches('/'))
                .with_context(|| format!("invalid blob endpoint '{endpoint}'"))?,
        })
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> anyhow::Result<Url> {
        let mut url = self.blob_endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("blob endpoint cannot be a base url"))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn sign(&self, string_to_sign: &str) -> String {
        let mut mac =
            <HmacSha256 as Mac>::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// The parts of a request covered by a Shared Key signature.
struct SignedRequest<'a> {
    method: Method,
    url: Url,
    content_length: usize,
    content_type: Option<&'a str>,
    ms_headers: BTreeMap<&'static str, String>,
}

impl<'a> SignedRequest<'a> {
    fn put(url: Url, date: String) -> Self {
        let mut ms_headers = BTreeMap::new();
        ms_headers.insert("x-ms-date", date);
        ms_headers.insert("x-ms-version", API_VERSION.to_string());
        Self {
            method: Method::PUT,
            url,
            content_length: 0,
            content_type: None,
            ms_headers,
        }
    }

    fn header(mut self, name: &'static str, value: &str) -> Self {
        self.ms_headers.insert(name, value.to_string());
        self
    }

    fn string_to_sign(&self, account: &str) -> String {
        let content_length = match self.content_length {
            0 => String::new(),
            length => length.to_string(),
        };
        let headers: String = self
            .ms_headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in self.url.query_pairs() {
            params
                .entry(key.to_lowercase())
                .or_default()
                .push(value.into_owned());
        }
        let mut resource = format!("/{}{}", account, self.url.path());
        for (key, values) in params {
            resource.push_str(&format!("\n{}:{}", key, values.join(",")));
        }

        format!(
            "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}{}",
            self.method.as_str(),
            content_length,
            self.content_type.unwrap_or_default(),
            headers,
            resource
        )
    }
}

/// Stores images as block blobs. The container is created on first use
/// with public read access for blobs; an existing container gets that
/// access level re-applied.
pub struct AzureBlobStore {
    http: Client,
    account: StorageAccount,
    public_endpoint: String,
}

impl AzureBlobStore {
    pub fn new(http: Client, account: StorageAccount, public_endpoint: impl Into<String>) -> Self {
        Self {
            http,
            account,
            public_endpoint: public_endpoint.into(),
        }
    }

    fn rfc1123_now() -> String {
        Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    async fn send(&self, request: SignedRequest<'_>, body: Bytes) -> anyhow::Result<StatusCode> {
        let signature = self.account.sign(&request.string_to_sign(&self.account.name));
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .header(
                "authorization",
                format!("SharedKey {}:{}", self.account.name, signature),
            );
        for (name, value) in &request.ms_headers {
            builder = builder.header(*name, value);
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        let response = builder.body(body).send().await?;
        Ok(response.status())
    }

    async fn ensure_container(&self, container: &str) -> anyhow::Result<()> {
        let url = self.account.url(&[container], &[("restype", "container")])?;
        let request = SignedRequest::put(url, Self::rfc1123_now())
            .header("x-ms-blob-public-access", "blob");

        match ContainerState::from_status(self.send(request, Bytes::new()).await?)? {
            ContainerState::Created => {
                info!(container, "created blob container");
                Ok(())
            }
            ContainerState::Exists => self.set_public_access(container).await,
        }
    }

    async fn set_public_access(&self, container: &str) -> anyhow::Result<()> {
        let url = self
            .account
            .url(&[container], &[("restype", "container"), ("comp", "acl")])?;
        let request = SignedRequest::put(url, Self::rfc1123_now())
            .header("x-ms-blob-public-access", "blob");

        let status = self.send(request, Bytes::new()).await?;
        if !status.is_success() {
            anyhow::bail!("setting access on container '{container}' returned {status}");
        }
        debug!(container, "container access level set to blob");
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ContainerState {
    Created,
    Exists,
}

impl ContainerState {
    fn from_status(status: StatusCode) -> anyhow::Result<Self> {
        match status {
            StatusCode::CREATED => Ok(ContainerState::Created),
            StatusCode::CONFLICT => Ok(ContainerState::Exists),
            other => anyhow::bail!("creating container returned {other}"),
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn save(
        &self,
        container: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        self.ensure_container(container).await?;

        let url = self.account.url(&[container, file_name], &[])?;
        let mut request =
            SignedRequest::put(url, Self::rfc1123_now()).header("x-ms-blob-type", "BlockBlob");
        request.content_length = bytes.len();
        request.content_type = content_type;

        let status = self.send(request, bytes).await?;
        if !status.is_success() {
            anyhow::bail!("uploading blob '{container}/{file_name}' returned {status}");
        }

        Ok(format!(
            "{}/{}/{}",
            self.public_endpoint.trim_end_matches('/'),
            container,
            file_name
        ))
    }
}
