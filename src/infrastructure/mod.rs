pub mod http_client;
pub mod logging;
pub mod output;
