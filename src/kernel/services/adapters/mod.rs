//! Service adapters: runtime/OS specific implementations (IO/async).

pub mod app_dirs;
pub mod assistant;
pub mod chain;
pub mod compiler;
pub mod runtime;
pub mod settings;

use std::sync::Arc;

use super::host::ServicePorts;

pub use app_dirs::{ensure_export_dir, ensure_log_dir, get_export_dir, get_log_dir};
pub use assistant::OfflineAssistant;
pub use chain::{SimulatedNetwork, SimulatedWallet};
pub use compiler::{compile_source, SimulatedCompiler};
pub use runtime::AsyncRuntime;
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, save_settings_to,
};

/// Ports backed entirely by the in-process simulations.
pub fn simulated_ports() -> ServicePorts {
    ServicePorts {
        compiler: Arc::new(SimulatedCompiler),
        network: Arc::new(SimulatedNetwork::default()),
        wallet: Arc::new(SimulatedWallet::default()),
        assistant: Arc::new(OfflineAssistant),
    }
}
