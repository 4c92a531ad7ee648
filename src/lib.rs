pub mod clients;
pub mod collections;
pub mod config;
pub mod error;
pub mod orders;
pub mod partners;
pub mod secrets;
pub mod server;
