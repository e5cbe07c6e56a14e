use std::sync::OnceLock;

use reqwest::Client;

static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Outbound HTTP client shared by every collaborator for the life of the
/// process. Clones share one connection pool.
pub fn shared_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .user_agent(concat!("line-ocr-hook/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build shared http client")
        })
        .clone()
}
