// src/lib.rs
//! randnumchar - driver de caractere que entrega números aleatórios.
//!
//! O dispositivo aparece como `/dev/randnumchar`. Cada `read()` gera um
//! número aleatório de 4 bytes e o copia para o buffer do usuário.
//!
//! # Organização
//!
//! ```text
//! module::randnum          Carga/descarga: major -> class -> node (e o inverso)
//!        │
//!        ▼
//! fs::devfs::registry      Registro de majors, classes e nós (/dev)
//!        │ fops
//!        ▼
//! fs::devfs::devices       RandNumDevice: open/read/write/release
//!        │            │
//!        ▼            ▼
//! drivers::rng     mm::uaccess
//! (entropia)       (copy_to_user)
//! ```

#![cfg_attr(not(test), no_std)]

// --- Infraestrutura ---
pub mod core; // Logging (macros kinfo!/kerror!/...)
pub mod drivers; // Backend de log, gerador de entropia
pub mod klib; // Framework de self-test
pub mod sys; // Errno

// --- Subsistemas ---
pub mod fs; // DevFS: números de dispositivo, fops, registro
pub mod mm; // Acesso à memória do usuário
pub mod module; // Ciclo de vida do módulo randnumchar

// Re-exports para acesso fácil
pub use crate::fs::devfs::devices::randnum::{RandNumDevice, DEVICE_NAME, RANDNUM_SIZE};
pub use crate::module::randnum::{DeviceIdentity, ModuleError, RandNumModule, CLASS_NAME};
