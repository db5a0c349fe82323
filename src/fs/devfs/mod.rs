//! DevFS - Device Filesystem
//!
//! Camada que liga caminhos em /dev aos drivers registrados.
//!
//! # Módulos
//!
//! - `device` - DeviceNumber, DeviceNode e tipos base
//! - `class` - Handles de classe e de nó
//! - `operations` - FileOperations (open, read, write, release)
//! - `registry` - Registro de majors, classes e nós
//! - `devices/*` - Implementações específicas
//!
//! # Fluxo de uma chamada
//!
//! ```text
//! open("/dev/randnumchar") -> registry.lookup -> DeviceNumber
//!                          -> registry.fops(major) -> &dyn FileOperations
//!                          -> fops.open(&mut File)
//! ```

pub mod class;
pub mod device;
pub mod operations;
pub mod registry;

pub mod devices {
    pub mod randnum;
}

// Re-exports públicos
pub use class::{DeviceClass, NodeHandle};
pub use device::{DeviceNode, DeviceNumber, DeviceType};
pub use operations::{File, FileOperations, FsError, FsResult, OpenFlags};
pub use registry::{DeviceRegistry, RegistrationService, RegistryError, RegistryStage};

use crate::mm::UserPtr;

/// DevFS - resolve caminhos e despacha operações
pub struct DevFS<'r, 'a> {
    registry: &'r DeviceRegistry<'a>,
}

impl<'r, 'a> DevFS<'r, 'a> {
    /// Cria um DevFS sobre o registro dado
    pub const fn new(registry: &'r DeviceRegistry<'a>) -> Self {
        Self { registry }
    }

    /// Abre um dispositivo por caminho
    pub fn open(&self, path: &str, flags: OpenFlags) -> FsResult<OpenFile<'a>> {
        let dev = self.registry.lookup(path).ok_or(FsError::NotFound)?;
        let fops = self.registry.fops(dev.major).ok_or(FsError::NoDevice)?;

        let mut file = File::new(dev, flags);
        fops.open(&mut file)?;
        Ok(OpenFile { file, fops })
    }
}

/// Arquivo aberto: estado + operações do driver
pub struct OpenFile<'a> {
    file: File,
    fops: &'a dyn FileOperations,
}

impl<'a> OpenFile<'a> {
    /// Estado do arquivo
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Lê para o buffer de usuário
    pub fn read(&mut self, buf: UserPtr, len: usize) -> FsResult<usize> {
        if !self.file.flags.can_read() {
            return Err(FsError::BadMode);
        }
        self.fops.read(&mut self.file, buf, len)
    }

    /// Escreve a partir do buffer de usuário
    pub fn write(&mut self, buf: UserPtr, len: usize) -> FsResult<usize> {
        if !self.file.flags.can_write() {
            return Err(FsError::BadMode);
        }
        self.fops.write(&mut self.file, buf, len)
    }

    /// Fecha o arquivo (chama `release`)
    pub fn close(mut self) -> FsResult<()> {
        self.fops.release(&mut self.file)
    }
}
