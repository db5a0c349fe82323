//! Device - Números e nós de dispositivo

use core::fmt;

/// Bits reservados ao minor no formato interno (`MINORBITS` do Linux)
pub const MINOR_BITS: u32 = 20;

/// Máscara do minor
pub const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;

/// Tipo de dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Dispositivo de caractere (char device)
    Character,
    /// Dispositivo de bloco (block device)
    Block,
}

/// Número major/minor de dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceNumber {
    /// Major number (identifica o driver)
    pub major: u32,
    /// Minor number (identifica o dispositivo específico)
    pub minor: u32,
}

impl DeviceNumber {
    /// Cria um novo device number (equivalente a `MKDEV`)
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Converte para o formato interno: `major << 20 | minor`
    pub const fn as_u64(&self) -> u64 {
        ((self.major as u64) << MINOR_BITS) | ((self.minor & MINOR_MASK) as u64)
    }

    /// Cria a partir do formato interno
    pub const fn from_u64(dev: u64) -> Self {
        Self {
            major: (dev >> MINOR_BITS) as u32,
            minor: (dev as u32) & MINOR_MASK,
        }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Nó de dispositivo visível em /dev
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceNode {
    /// Nome do nó (sem o prefixo /dev/)
    pub name: &'static str,
    /// Tipo de dispositivo
    pub device_type: DeviceType,
    /// Device number
    pub dev: DeviceNumber,
    /// Permissões (Unix mode)
    pub mode: u16,
    /// UID do dono
    pub uid: u32,
    /// GID do grupo
    pub gid: u32,
}

impl DeviceNode {
    /// Cria um novo nó de caractere (root:root, 0600 como o devtmpfs)
    pub const fn new(name: &'static str, dev: DeviceNumber) -> Self {
        Self {
            name,
            device_type: DeviceType::Character,
            dev,
            mode: 0o600,
            uid: 0,
            gid: 0,
        }
    }

    /// Cria um device node com permissões customizadas
    pub const fn with_mode(mut self, mode: u16) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Debug for DeviceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceNode")
            .field("name", &self.name)
            .field("type", &self.device_type)
            .field("dev", &format_args!("{}", self.dev))
            .field("mode", &format_args!("{:o}", self.mode))
            .finish()
    }
}
