pub mod admin_api;
pub mod cdn;
pub mod object_store;

pub use admin_api::AdminApiClient;
pub use cdn::CdnClient;
pub use object_store::ObjectStore;
