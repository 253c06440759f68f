//! HTTP client bound to one hospital scope and one bearer credential.

mod config;
mod scope;
mod scoped_client;

pub use config::{ClientConfig, ConfigBuilder};
pub use scope::RequestScope;
pub use scoped_client::ScopedClient;
