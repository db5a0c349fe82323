//! # randnumchar - Carga e descarga do módulo
//!
//! A identidade do dispositivo é criada em três passos, cada um retendo um
//! recurso do registro:
//!
//! ```text
//! acquire_identifier ──► create_class ──► create_node
//!        │ falha              │ falha            │ falha
//!        ▼                    ▼                  ▼
//!   (nada a desfazer)   release_identifier   destroy_class
//!                                            release_identifier
//! ```
//!
//! A descarga percorre a cadeia ao contrário: nó, classe (unregister +
//! destroy) e por fim o major.

use core::fmt;
use core::marker::PhantomData;

use super::abi::ModuleInfo;
use crate::fs::devfs::devices::randnum::DEVICE_NAME;
use crate::fs::devfs::{
    DeviceClass, DeviceNumber, FileOperations, NodeHandle, RegistrationService, RegistryError,
};
use crate::sys::Errno;

/// Nome da classe (/sys/class/randnum)
pub const CLASS_NAME: &str = "randnum";

/// Minor do único nó criado
pub const RANDNUM_MINOR: u32 = 0;

/// Metadados do módulo
pub static MODULE_INFO: ModuleInfo = ModuleInfo {
    name: DEVICE_NAME,
    author: "Le Hoang Anh",
    description: "A simple Linux char driver return a random number",
    version: "0.1",
    license: "GPL",
};

/// Falhas na carga do módulo. Cada variante guarda a causa no registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleError {
    /// Nenhum major disponível
    Allocation(RegistryError),
    /// Registro recusou a classe
    ClassCreation(RegistryError),
    /// Registro recusou o nó
    NodeCreation(RegistryError),
}

impl ModuleError {
    /// Causa reportada pelo registro
    pub fn cause(&self) -> RegistryError {
        match *self {
            Self::Allocation(e) | Self::ClassCreation(e) | Self::NodeCreation(e) => e,
        }
    }

    /// Código errno correspondente
    pub fn errno(&self) -> Errno {
        self.cause().errno()
    }

    /// Retorno de `module_init` (`-errno`)
    pub fn as_isize(&self) -> isize {
        self.errno().as_isize()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocation(_) => "Falha ao registrar o major number",
            Self::ClassCreation(_) => "Falha ao registrar a classe do dispositivo",
            Self::NodeCreation(_) => "Falha ao criar o dispositivo",
        }
    }
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.cause())
    }
}

/// Identidade do dispositivo: major + classe + nó.
///
/// Só existe completa: `initialize` devolve todos os handles ou nenhum.
#[derive(Debug)]
pub struct DeviceIdentity {
    major: u32,
    name: &'static str,
    class: DeviceClass,
    node: NodeHandle,
}

impl DeviceIdentity {
    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `MKDEV(major, 0)`
    pub fn device_number(&self) -> DeviceNumber {
        DeviceNumber::new(self.major, RANDNUM_MINOR)
    }

    pub fn class(&self) -> &DeviceClass {
        &self.class
    }

    pub fn node(&self) -> &NodeHandle {
        &self.node
    }
}

/// Cria major, classe e nó, desfazendo os passos já feitos se algum falhar.
pub fn initialize<'a, R>(
    registry: &R,
    fops: &'a dyn FileOperations,
) -> Result<DeviceIdentity, ModuleError>
where
    R: RegistrationService<'a> + ?Sized,
{
    crate::kinfo!("randnumchar: Initializing the randnumchar LKM");

    let major = registry
        .acquire_identifier(DEVICE_NAME, fops)
        .map_err(|e| {
            crate::kerror!("randnumchar failed to register a major number");
            ModuleError::Allocation(e)
        })?;
    crate::kinfo!("randnumchar: registered correctly with major number ", major);

    let class = match registry.create_class(major, CLASS_NAME) {
        Ok(class) => class,
        Err(e) => {
            registry.release_identifier(major, DEVICE_NAME);
            crate::kerror!("Failed to register device class");
            return Err(ModuleError::ClassCreation(e));
        }
    };
    crate::kinfo!("randnumchar: device class registered correctly");

    let dev = DeviceNumber::new(major, RANDNUM_MINOR);
    let node = match registry.create_node(&class, dev, DEVICE_NAME) {
        Ok(node) => node,
        Err(e) => {
            registry.destroy_class(class);
            registry.release_identifier(major, DEVICE_NAME);
            crate::kerror!("Failed to create the device");
            return Err(ModuleError::NodeCreation(e));
        }
    };
    crate::kinfo!("randnumchar: device class created correctly");

    Ok(DeviceIdentity {
        major,
        name: DEVICE_NAME,
        class,
        node,
    })
}

/// Destrói a identidade na ordem inversa da criação.
pub fn shutdown<'a, R>(registry: &R, identity: DeviceIdentity)
where
    R: RegistrationService<'a> + ?Sized,
{
    let DeviceIdentity {
        major,
        name,
        class,
        node,
    } = identity;

    registry.destroy_node(&class, node.device_number());
    registry.unregister_class(&class);
    registry.destroy_class(class);
    registry.release_identifier(major, name);
    crate::kinfo!("randnumchar: Goodbye from the LKM!");
}

/// Módulo carregado: mantém a identidade viva até `unload` (ou drop).
pub struct RandNumModule<'r, 'a, R>
where
    R: RegistrationService<'a> + ?Sized,
{
    registry: &'r R,
    identity: Option<DeviceIdentity>,
    _fops: PhantomData<&'a dyn FileOperations>,
}

impl<'r, 'a, R> RandNumModule<'r, 'a, R>
where
    R: RegistrationService<'a> + ?Sized,
{
    /// Carrega o módulo (`module_init`)
    pub fn load(registry: &'r R, fops: &'a dyn FileOperations) -> Result<Self, ModuleError> {
        if MODULE_INFO.taints_kernel() {
            crate::kwarn!("randnumchar: licença não-GPL, kernel tainted");
        }
        let identity = initialize(registry, fops)?;
        Ok(Self {
            registry,
            identity: Some(identity),
            _fops: PhantomData,
        })
    }

    /// Metadados do módulo
    pub fn info(&self) -> &'static ModuleInfo {
        &MODULE_INFO
    }

    /// Identidade registrada
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Descarrega o módulo (`module_exit`)
    pub fn unload(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(identity) = self.identity.take() {
            shutdown(self.registry, identity);
        }
    }
}

impl<'r, 'a, R> Drop for RandNumModule<'r, 'a, R>
where
    R: RegistrationService<'a> + ?Sized,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
