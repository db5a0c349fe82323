//! Device Registry - Registro de majors, classes e nós de dispositivo
//!
//! Equivale ao trio `register_chrdev` / `class_create` / `device_create`
//! do Linux. Todas as tabelas têm capacidade fixa (sem heap) e ficam atrás
//! de um único spinlock.
//!
//! # Alocação de major
//!
//! Majors dinâmicos são distribuídos do topo da faixa para baixo
//! (`DYNAMIC_MAJOR_MAX` → `DYNAMIC_MAJOR_MIN`), como `register_chrdev(0, ..)`.
//!
//! # Injeção de falhas
//!
//! `fail_next(stage, err)` faz a próxima chamada daquele estágio falhar com
//! `err`. Usado para exercitar o rollback da carga de módulos.

use core::fmt;
use spin::Mutex;

use super::class::{DeviceClass, NodeHandle};
use super::device::{DeviceNode, DeviceNumber};
use super::operations::FileOperations;
use crate::drivers::serial::LineBuf;
use crate::sys::Errno;

/// Número máximo de drivers de caractere registrados
pub const MAX_CHRDEVS: usize = 32;

/// Número máximo de classes
pub const MAX_CLASSES: usize = 16;

/// Número máximo de nós em /dev
pub const MAX_NODES: usize = 64;

/// Faixa de majors dinâmicos (inclusiva)
pub const DYNAMIC_MAJOR_MIN: u32 = 234;
pub const DYNAMIC_MAJOR_MAX: u32 = 254;

/// Tamanho máximo de nome (o byte 32 seria o terminador)
pub const NAME_MAX_LEN: usize = 31;

/// Erros do registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Faixa de majors dinâmicos esgotada
    NoFreeMajor,
    /// Tabela interna cheia
    TableFull,
    /// Nome já registrado
    AlreadyExists,
    /// Nome vazio, longo demais ou com '/'
    InvalidName,
    /// Handle, major ou classe desconhecidos
    NotFound,
}

impl RegistryError {
    /// Código errno correspondente
    pub fn errno(&self) -> Errno {
        match self {
            Self::NoFreeMajor => Errno::EBUSY,
            Self::TableFull => Errno::ENOMEM,
            Self::AlreadyExists => Errno::EEXIST,
            Self::InvalidName => Errno::EINVAL,
            Self::NotFound => Errno::ENODEV,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFreeMajor => "Nenhum major dinâmico livre",
            Self::TableFull => "Tabela do registro cheia",
            Self::AlreadyExists => "Nome já registrado",
            Self::InvalidName => "Nome inválido",
            Self::NotFound => "Entrada não encontrada",
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estágio da cadeia de registro (para injeção de falhas)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStage {
    /// `acquire_identifier`
    Identifier,
    /// `create_class`
    Class,
    /// `create_node`
    Node,
}

impl RegistryStage {
    const fn index(self) -> usize {
        match self {
            Self::Identifier => 0,
            Self::Class => 1,
            Self::Node => 2,
        }
    }
}

/// Contrato do serviço de registro usado pelos módulos.
///
/// `'a` é o tempo de vida das tabelas de operações registradas.
pub trait RegistrationService<'a> {
    /// Aloca um major dinâmico e associa `fops` a ele
    fn acquire_identifier(
        &self,
        name: &'static str,
        fops: &'a dyn FileOperations,
    ) -> Result<u32, RegistryError>;

    /// Cria uma classe de dispositivo
    fn create_class(&self, major: u32, name: &'static str) -> Result<DeviceClass, RegistryError>;

    /// Cria o nó visível em /dev
    fn create_node(
        &self,
        class: &DeviceClass,
        dev: DeviceNumber,
        name: &'static str,
    ) -> Result<NodeHandle, RegistryError>;

    /// Remove o nó `dev` da classe
    fn destroy_node(&self, class: &DeviceClass, dev: DeviceNumber);

    /// Desfaz o registro da classe (o slot continua ocupado até `destroy_class`)
    fn unregister_class(&self, class: &DeviceClass);

    /// Libera a classe
    fn destroy_class(&self, class: DeviceClass);

    /// Libera o major
    fn release_identifier(&self, major: u32, name: &'static str);
}

/// Quantidade de entradas ocupadas em cada tabela
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryCounts {
    pub majors: usize,
    pub classes: usize,
    pub nodes: usize,
}

impl RegistryCounts {
    /// Nenhum recurso retido
    pub const fn is_empty(&self) -> bool {
        self.majors == 0 && self.classes == 0 && self.nodes == 0
    }
}

#[derive(Clone, Copy)]
struct ChrdevEntry<'a> {
    major: u32,
    name: &'static str,
    fops: &'a dyn FileOperations,
}

#[derive(Clone, Copy)]
struct ClassEntry {
    name: &'static str,
    major: u32,
    registered: bool,
}

#[derive(Clone, Copy)]
struct NodeEntry {
    node: DeviceNode,
    class_slot: usize,
}

struct Tables<'a> {
    chrdevs: [Option<ChrdevEntry<'a>>; MAX_CHRDEVS],
    classes: [Option<ClassEntry>; MAX_CLASSES],
    nodes: [Option<NodeEntry>; MAX_NODES],
}

impl<'a> Tables<'a> {
    fn major_in_use(&self, major: u32) -> bool {
        self.chrdevs.iter().flatten().any(|c| c.major == major)
    }

    fn class_at(&self, class: &DeviceClass) -> Option<&ClassEntry> {
        self.classes
            .get(class.slot)?
            .as_ref()
            .filter(|c| c.name == class.name)
    }
}

/// Registro de dispositivos
pub struct DeviceRegistry<'a> {
    tables: Mutex<Tables<'a>>,
    faults: Mutex<[Option<RegistryError>; 3]>,
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.len() > NAME_MAX_LEN || name.contains('/') {
        return Err(RegistryError::InvalidName);
    }
    Ok(())
}

impl<'a> DeviceRegistry<'a> {
    /// Cria um registro vazio
    pub const fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                chrdevs: [None; MAX_CHRDEVS],
                classes: [None; MAX_CLASSES],
                nodes: [None; MAX_NODES],
            }),
            faults: Mutex::new([None; 3]),
        }
    }

    /// Faz a próxima chamada de `stage` falhar com `err`
    pub fn fail_next(&self, stage: RegistryStage, err: RegistryError) {
        self.faults.lock()[stage.index()] = Some(err);
    }

    fn take_fault(&self, stage: RegistryStage) -> Option<RegistryError> {
        self.faults.lock()[stage.index()].take()
    }

    /// Quantidade de majors, classes e nós retidos
    pub fn counts(&self) -> RegistryCounts {
        let t = self.tables.lock();
        RegistryCounts {
            majors: t.chrdevs.iter().flatten().count(),
            classes: t.classes.iter().flatten().count(),
            nodes: t.nodes.iter().flatten().count(),
        }
    }

    /// Resolve `/dev/<nome>` (ou só `<nome>`) para o device number
    pub fn lookup(&self, path: &str) -> Option<DeviceNumber> {
        self.node(path).map(|n| n.dev)
    }

    /// Nó registrado para `/dev/<nome>` (ou só `<nome>`)
    pub fn node(&self, path: &str) -> Option<DeviceNode> {
        let name = path.strip_prefix("/dev/").unwrap_or(path);
        let t = self.tables.lock();
        t.nodes
            .iter()
            .flatten()
            .find(|n| n.node.name == name)
            .map(|n| n.node)
    }

    /// Operações associadas ao major
    pub fn fops(&self, major: u32) -> Option<&'a dyn FileOperations> {
        let t = self.tables.lock();
        t.chrdevs
            .iter()
            .flatten()
            .find(|c| c.major == major)
            .map(|c| c.fops)
    }

    /// Verifica se existe uma classe registrada com o nome
    pub fn class_registered(&self, name: &str) -> bool {
        let t = self.tables.lock();
        t.classes
            .iter()
            .flatten()
            .any(|c| c.registered && c.name == name)
    }

    /// Imprime a tabela de majors no console, no formato de /proc/devices
    pub fn dump_chrdevs(&self) {
        let t = self.tables.lock();
        let mut header = LineBuf::new();
        header.push_str("Character devices:");
        header.push_nl();
        header.flush();
        for c in t.chrdevs.iter().flatten() {
            let mut line = LineBuf::new();
            line.push_dec(u64::from(c.major));
            line.push(b" ");
            line.push_str(c.name);
            line.push_nl();
            line.flush();
        }
    }
}

impl Default for DeviceRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RegistrationService<'a> for DeviceRegistry<'a> {
    fn acquire_identifier(
        &self,
        name: &'static str,
        fops: &'a dyn FileOperations,
    ) -> Result<u32, RegistryError> {
        if let Some(err) = self.take_fault(RegistryStage::Identifier) {
            crate::ktrace!("(DevFS) register_chrdev: falha injetada");
            return Err(err);
        }
        validate_name(name)?;

        let mut t = self.tables.lock();
        let major = (DYNAMIC_MAJOR_MIN..=DYNAMIC_MAJOR_MAX)
            .rev()
            .find(|m| !t.major_in_use(*m))
            .ok_or(RegistryError::NoFreeMajor)?;
        let slot = t
            .chrdevs
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(RegistryError::TableFull)?;
        *slot = Some(ChrdevEntry { major, name, fops });

        crate::ktrace!("(DevFS) register_chrdev: major=", major);
        Ok(major)
    }

    fn create_class(&self, major: u32, name: &'static str) -> Result<DeviceClass, RegistryError> {
        if let Some(err) = self.take_fault(RegistryStage::Class) {
            crate::ktrace!("(DevFS) class_create: falha injetada");
            return Err(err);
        }
        validate_name(name)?;

        let mut t = self.tables.lock();
        if t.classes
            .iter()
            .flatten()
            .any(|c| c.registered && c.name == name)
        {
            return Err(RegistryError::AlreadyExists);
        }
        let slot = t
            .classes
            .iter()
            .position(|s| s.is_none())
            .ok_or(RegistryError::TableFull)?;
        t.classes[slot] = Some(ClassEntry {
            name,
            major,
            registered: true,
        });

        crate::ktrace!("(DevFS) class_create: slot=", slot);
        Ok(DeviceClass { slot, name, major })
    }

    fn create_node(
        &self,
        class: &DeviceClass,
        dev: DeviceNumber,
        name: &'static str,
    ) -> Result<NodeHandle, RegistryError> {
        if let Some(err) = self.take_fault(RegistryStage::Node) {
            crate::ktrace!("(DevFS) device_create: falha injetada");
            return Err(err);
        }
        validate_name(name)?;

        let mut t = self.tables.lock();
        match t.class_at(class) {
            Some(c) if c.registered => {}
            _ => return Err(RegistryError::NotFound),
        }
        if !t.major_in_use(dev.major) {
            return Err(RegistryError::NotFound);
        }
        if t.nodes.iter().flatten().any(|n| n.node.name == name) {
            return Err(RegistryError::AlreadyExists);
        }
        let slot = t
            .nodes
            .iter()
            .position(|s| s.is_none())
            .ok_or(RegistryError::TableFull)?;
        t.nodes[slot] = Some(NodeEntry {
            node: DeviceNode::new(name, dev),
            class_slot: class.slot,
        });

        crate::ktrace!("(DevFS) device_create: dev=", dev.as_u64());
        Ok(NodeHandle { slot, name, dev })
    }

    fn destroy_node(&self, class: &DeviceClass, dev: DeviceNumber) {
        let mut t = self.tables.lock();
        let slot = t.nodes.iter_mut().find(
            |s| matches!(s, Some(n) if n.node.dev == dev && n.class_slot == class.slot),
        );
        match slot {
            Some(s) => {
                *s = None;
                crate::ktrace!("(DevFS) device_destroy: dev=", dev.as_u64());
            }
            None => crate::kwarn!("(DevFS) device_destroy: nó inexistente dev=", dev.as_u64()),
        }
    }

    fn unregister_class(&self, class: &DeviceClass) {
        let mut t = self.tables.lock();
        match t.classes.get_mut(class.slot) {
            Some(Some(c)) if c.name == class.name => {
                c.registered = false;
                crate::ktrace!("(DevFS) class_unregister: slot=", class.slot);
            }
            _ => crate::kwarn!("(DevFS) class_unregister: classe inexistente slot=", class.slot),
        }
    }

    fn destroy_class(&self, class: DeviceClass) {
        let mut t = self.tables.lock();
        if t.class_at(&class).is_none() {
            crate::kwarn!("(DevFS) class_destroy: classe inexistente slot=", class.slot);
            return;
        }
        t.classes[class.slot] = None;

        // Nós órfãos não podem sobreviver à classe
        for s in t.nodes.iter_mut() {
            if matches!(s, Some(n) if n.class_slot == class.slot) {
                crate::kwarn!("(DevFS) class_destroy: removendo nó órfão");
                *s = None;
            }
        }
        crate::ktrace!("(DevFS) class_destroy: slot=", class.slot);
    }

    fn release_identifier(&self, major: u32, name: &'static str) {
        let mut t = self.tables.lock();
        let slot = t
            .chrdevs
            .iter_mut()
            .find(|s| matches!(s, Some(c) if c.major == major && c.name == name));
        match slot {
            Some(s) => {
                *s = None;
                crate::ktrace!("(DevFS) unregister_chrdev: major=", major);
            }
            None => crate::kwarn!("(DevFS) unregister_chrdev: major não registrado ", major),
        }
    }
}
