//! Testes para o DevFS e para o dispositivo randnumchar
//!
//! # Como Executar os Testes
//!
//! ```bash
//! # Todos os testes de filesystem
//! cargo test --lib fs::tests
//!
//! # Um módulo específico
//! cargo test --lib fs::tests::devfs
//! cargo test --lib fs::tests::randnum
//! ```
//!
//! # Estrutura dos Testes
//!
//! - `devfs.rs` - Números de dispositivo, flags, registro, DevFS
//! - `randnum.rs` - open/read/write/release do /dev/randnumchar
//!
//! # Convenções
//!
//! - Prefixo `test_` para testes unitários
//! - Testes que inspecionam o log usam `test_log()` e procuram linhas
//!   específicas do próprio teste (os testes rodam em paralelo)

#![cfg(test)]

pub mod randnum;

use crate::drivers::rng::XorShiftRng;
use crate::drivers::serial::{self, RingSink};
use crate::fs::devfs::devices::randnum::RandNumDevice;
use crate::fs::devfs::FileOperations;
use crate::mm::UserWindow;

/// Base da janela de usuário usada nos testes
pub const USER_BASE: usize = 0x4000_0000;

/// Tamanho da janela de usuário usada nos testes
pub const USER_LEN: usize = 64;

pub type TestWindow = UserWindow<USER_LEN>;

const LOG_CAPACITY: usize = 1 << 20;

static LOG: RingSink<LOG_CAPACITY> = RingSink::new();
static LOG_INSTALLED: spin::Once = spin::Once::new();

/// Helper: instala (uma vez) e retorna o sink de log compartilhado
pub fn test_log() -> &'static RingSink<LOG_CAPACITY> {
    LOG_INSTALLED.call_once(|| serial::set_sink(&LOG));
    &LOG
}

/// Helper: janela de usuário vazia
pub fn create_test_window() -> TestWindow {
    UserWindow::new(USER_BASE)
}

/// Helper: dispositivo com gerador determinístico
pub fn create_test_device<'w>(
    seed: u64,
    window: &'w TestWindow,
) -> RandNumDevice<XorShiftRng, &'w TestWindow> {
    RandNumDevice::new(XorShiftRng::new(seed), window)
}

/// Driver sem nenhuma operação própria (usa os defaults do trait)
pub struct NullOps;

impl FileOperations for NullOps {}

/// Instância estática para registros de teste
pub static NULL_OPS: NullOps = NullOps;
