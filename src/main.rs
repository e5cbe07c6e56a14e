use std::{io::Error, sync::Arc};

use poem::{Server, listener::TcpListener};
use tokio::main;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    application::{
        handlers::{
            dispatcher::Dispatcher,
            image_pipeline::{ImagePipeline, ImagePipelineConfig},
            text_handler::TextHandler,
        },
        services::signature::SignatureVerifier,
        usecases::receive_webhook::ReceiveWebhookUseCase,
    },
    config::Config,
    infrastructure::{
        http::shared_client,
        messaging::line::{LineClient, LineConfig},
        ocr::computer_vision::{ComputerVisionClient, ComputerVisionConfig},
        storage::azure_blob::{AzureBlobStore, StorageAccount},
    },
    presentation::http::{endpoints::root::ApiState, routes},
};

mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let http = shared_client();

    let messenger = Arc::new(LineClient::new(
        http.clone(),
        LineConfig {
            channel_access_token: config.channel_access_token.clone(),
            api_base: config.line_api_base.clone(),
            data_api_base: config.line_data_api_base.clone(),
        },
    ));

    let account = StorageAccount::from_connection_string(&config.storage_connection_string)
        .map_err(Error::other)?;
    info!(account = %account.name, "using azure blob storage");
    let blob_store = Arc::new(AzureBlobStore::new(
        http.clone(),
        account,
        config.blob_endpoint.clone(),
    ));

    let ocr = Arc::new(ComputerVisionClient::new(
        http,
        ComputerVisionConfig {
            endpoint: config.ocr_api.clone(),
            api_key: config.ocr_api_key.clone(),
        },
    ));

    let dispatcher = Dispatcher::new(
        TextHandler::new(messenger.clone()),
        ImagePipeline::new(
            messenger,
            blob_store,
            ocr,
            ImagePipelineConfig {
                container: config.container_name.clone(),
            },
        ),
    );

    let state = Arc::new(ApiState {
        receive_webhook: Arc::new(ReceiveWebhookUseCase::new(
            SignatureVerifier::new(config.channel_secret.clone()),
            dispatcher,
        )),
    });

    let bind = format!("{}:{}", config.host, config.port);
    let server_url = format!("http://{}", bind);
    info!("Starting server at {}", server_url);

    Server::new(TcpListener::bind(bind))
        .run(routes(state, server_url))
        .await
}
