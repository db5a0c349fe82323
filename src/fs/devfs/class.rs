//! Device Class - Agrupamento de dispositivos (`/sys/class/<nome>`)

/// Handle de uma classe criada no registro.
///
/// Não é `Clone`: `destroy_class` consome o handle, então uma classe não
/// pode ser destruída duas vezes.
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceClass {
    pub(super) slot: usize,
    pub(super) name: &'static str,
    pub(super) major: u32,
}

impl DeviceClass {
    /// Nome da classe
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Major ao qual a classe foi associada na criação
    pub fn major(&self) -> u32 {
        self.major
    }
}

/// Handle de um nó criado em /dev.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeHandle {
    pub(super) slot: usize,
    pub(super) name: &'static str,
    pub(super) dev: super::device::DeviceNumber,
}

impl NodeHandle {
    /// Nome do nó (sem /dev/)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Device number do nó
    pub fn device_number(&self) -> super::device::DeviceNumber {
        self.dev
    }
}
