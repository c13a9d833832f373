pub mod brandfetch_client;
pub mod config_store;
pub mod credentials_store;
pub mod http_client;
pub mod image_encoder;
pub mod vision_client;

pub use brandfetch_client::BrandfetchClient;
pub use config_store::TomlConfigStore;
pub use credentials_store::{InMemoryCredentials, StoredCredentials};
pub use http_client::ReqwestHttpClient;
pub use image_encoder::JpegImageEncoder;
pub use vision_client::GoogleVisionClient;
