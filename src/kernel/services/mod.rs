//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the kernel.
//! - `adapters`: runtime/OS specific implementations (tokio, filesystem, simulated backends).

pub mod adapters;
pub mod bus;
pub mod host;
pub mod ports;

pub use bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
pub use host::{KernelServiceContext, KernelServiceHost, ServicePorts};
