//! # Kernel Module
//!
//! Ciclo de vida do módulo randnumchar.
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | `abi` | Metadados (`modinfo`) |
//! | `randnum` | `module_init`/`module_exit`: major, classe e nó |

pub mod abi;
pub mod randnum;

pub use abi::ModuleInfo;
pub use randnum::{initialize, shutdown, DeviceIdentity, ModuleError, RandNumModule};
