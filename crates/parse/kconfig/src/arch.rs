//! Package architecture to kernel source architecture mapping.
//!
//! Kconfig trees refer to the architecture directory through `$(SRCARCH)`
//! (or the older `$SRCARCH`). Distribution architecture names differ from
//! the kernel's `arch/` directory names, so the two are mapped here.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Built-in mapping, keyed by package architecture name.
const DEFAULT_MAP: &[(&str, &str)] = &[
    // Debian architectures
    ("amd64", "x86"),
    ("arm64", "arm64"),
    ("armhf", "arm"),
    ("i386", "x86"),
    ("s390x", "s390"),
    // Kernel architectures
    ("s390", "s390"),
    ("x86", "x86"),
];

/// The two placeholder spellings substituted in `source` paths.
///
/// `$(SRCARCH)` must be replaced first: `$SRCARCH` is a suffix of it.
const PLACEHOLDERS: [&str; 2] = ["$(SRCARCH)", "$SRCARCH"];

/// Lookup table from package architecture to source architecture.
#[derive(Debug, Clone)]
pub struct ArchTable {
    map: BTreeMap<String, String>,
}

impl Default for ArchTable {
    fn default() -> Self {
        Self {
            map: DEFAULT_MAP
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ArchTable {
    /// Adds or replaces a mapping.
    pub fn insert(&mut self, arch: impl Into<String>, srcarch: impl Into<String>) {
        self.map.insert(arch.into(), srcarch.into());
    }

    /// Resolves `arch` to its source architecture.
    ///
    /// Unknown names pass through unchanged.
    #[must_use]
    pub fn srcarch<'a>(&'a self, arch: &'a str) -> &'a str {
        self.map.get(arch).map_or(arch, String::as_str)
    }

    /// Substitutes both placeholder spellings in `path` with the source
    /// architecture for `arch`.
    #[must_use]
    pub fn substitute<'p>(&self, path: &'p str, arch: &str) -> Cow<'p, str> {
        if !path.contains("$SRCARCH") && !path.contains("$(SRCARCH)") {
            return Cow::Borrowed(path);
        }
        let srcarch = self.srcarch(arch);
        let mut out = path.to_string();
        for placeholder in PLACEHOLDERS {
            out = out.replace(placeholder, srcarch);
        }
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_names_map_to_kernel_dirs() {
        let table = ArchTable::default();
        assert_eq!(table.srcarch("amd64"), "x86");
        assert_eq!(table.srcarch("armhf"), "arm");
        assert_eq!(table.srcarch("s390x"), "s390");
    }

    #[test]
    fn unknown_arch_passes_through() {
        let table = ArchTable::default();
        assert_eq!(table.srcarch("riscv64"), "riscv64");
    }

    #[test]
    fn substitutes_both_spellings() {
        let table = ArchTable::default();
        assert_eq!(table.substitute("arch/$(SRCARCH)/Kconfig", "amd64"), "arch/x86/Kconfig");
        assert_eq!(table.substitute("arch/$SRCARCH/Kconfig", "i386"), "arch/x86/Kconfig");
        assert!(matches!(table.substitute("net/Kconfig", "amd64"), Cow::Borrowed(_)));
    }

    #[test]
    fn overrides_replace_builtin_entries() {
        let mut table = ArchTable::default();
        table.insert("riscv64", "riscv");
        table.insert("amd64", "um");
        assert_eq!(table.srcarch("riscv64"), "riscv");
        assert_eq!(table.srcarch("amd64"), "um");
    }
}
