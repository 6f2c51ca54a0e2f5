pub mod entities;
pub mod http_client;
pub mod memory;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use entities::Entities;
pub use http_client::HttpEntityGateway;
pub use memory::InMemoryGateway;
pub use types::{EntityGateway, GatewayError, SortSpec};
