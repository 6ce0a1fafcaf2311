//! hostfxr-based hosting of the managed bridge runtime.

mod backend;
mod config;
mod dispatch;
mod ffi;
mod hosting;
mod loader;
mod marshal;

pub use backend::DotnetBackend;
pub use config::{HostConfig, BRIDGE_ASSEMBLY_FILE, BRIDGE_RUNTIME_CONFIG_FILE};
pub use dispatch::MethodDispatcher;
pub use hosting::{HostContext, HostFxr};

use std::path::PathBuf;

/// Errors raised while standing up or driving the managed runtime host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to load library {path:?}: {reason}")]
    LoadFailure { path: PathBuf, reason: String },
    #[error("Export '{symbol}' not found in {library}: {reason}")]
    MissingExport {
        library: String,
        symbol: String,
        reason: String,
    },
    #[error("hostfxr discovery failed with status {status:#010x}")]
    Discovery { status: u32 },
    #[error("Runtime host initialization failed with status {status:#010x}")]
    HostInit { status: u32 },
    #[error("Failed to obtain the load-assembly delegate (status {status:#010x})")]
    DelegateResolution { status: u32 },
    #[error("Failed to resolve managed entry point '{type_name}' (status {status:#010x})")]
    EntryPointResolution { type_name: String, status: u32 },
    #[error("Managed call faulted at the interop boundary")]
    ManagedFault,
    #[error("Dotnet backend is not initialized")]
    NotInitialized,
    #[error("A dotnet backend is already active in this process")]
    AlreadyActive,
    #[error("Call string contains an interior nul byte")]
    InteriorNul,
    #[error("Invalid host configuration: {0}")]
    Config(String),
}
