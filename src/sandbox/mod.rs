//! The shim service and sandbox model: the task-lifecycle RPC surface
//! mapped onto a long-lived wasmtime engine, in either of two shapes:
//! direct (one shim, one engine) or grouped (one shim proxying to a
//! sandbox child that owns the engine for a pod).

pub mod engine;
pub mod error;
pub mod events;
pub mod instance;
pub mod local;
pub mod oci;
pub mod proxy;
pub mod shim;
pub mod sync;
pub mod task;

pub use engine::EngineHost;
pub use error::{Error, Result};
pub use events::{EventSender, RemoteEventSender};
pub use local::Local;
pub use proxy::{
    Proxy, NAMESPACE_ENV, NETNS_PATH_ENV, SANDBOX_MODE_ENV, SANDBOX_SOCKET, TTRPC_ADDRESS_ENV,
};
pub use shim::Cli;
pub use task::Service;
