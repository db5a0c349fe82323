//! Metadados de módulo (o que `modinfo` mostra)

/// Licenças que não marcam o kernel como "tainted"
const GPL_COMPATIBLE: &[&str] = &[
    "GPL",
    "GPL v2",
    "GPL and additional rights",
    "Dual BSD/GPL",
    "Dual MIT/GPL",
    "Dual MPL/GPL",
];

/// Informações do módulo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Nome do módulo
    pub name: &'static str,
    /// Autor
    pub author: &'static str,
    /// Descrição curta
    pub description: &'static str,
    /// Versão
    pub version: &'static str,
    /// Licença
    pub license: &'static str,
}

impl ModuleInfo {
    /// Verifica se a licença é compatível com GPL
    pub fn is_gpl_compatible(&self) -> bool {
        GPL_COMPATIBLE.contains(&self.license)
    }

    /// Carregar este módulo marcaria o kernel como tainted
    pub fn taints_kernel(&self) -> bool {
        !self.is_gpl_compatible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn info(license: &'static str) -> ModuleInfo {
        ModuleInfo {
            name: "m",
            author: "a",
            description: "d",
            version: "0",
            license,
        }
    }

    #[test]
    fn test_license_taint() {
        assert!(!info("GPL").taints_kernel());
        assert!(!info("Dual MIT/GPL").taints_kernel());
        assert!(info("Proprietary").taints_kernel());
        assert!(info("gpl").taints_kernel());
    }
}
