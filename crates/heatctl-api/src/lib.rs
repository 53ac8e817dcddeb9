// heatctl-api: Async Rust client for the 21control heater API

pub mod client;
pub mod error;
pub mod heater;
pub mod models;
pub mod system;
pub mod transport;

pub use client::DeviceClient;
pub use error::{Error, ErrorKind};
pub use models::{DeviceIdentity, NetworkStatus, Payload, PoolConfig, PowerTarget};
pub use reqwest::Method;
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
