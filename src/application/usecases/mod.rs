pub mod receive_webhook;
