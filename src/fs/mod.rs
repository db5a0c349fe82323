//! Sistema de arquivos de dispositivos.
//!
//! Submódulos:
//! - `devfs`: números de dispositivo, operações de arquivo e registro (/dev).

pub mod devfs;

#[cfg(test)]
pub(crate) mod tests;
