//! Directory listing options.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask controlling [`FileStore::list`](crate::FileStore::list).
///
/// The default is `INCLUDE_DOTFILES | INCLUDE_SYMLINKS`: direct children
/// only, hidden entries and symlinks included. Symlinks only exist on disk;
/// other backends ignore that flag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListOptions(u8);

impl ListOptions {
    pub const NONE: Self = Self(0);
    /// Descend into subdirectories.
    pub const RECURSIVE: Self = Self(1);
    /// Keep paths with a segment starting with `.`.
    pub const INCLUDE_DOTFILES: Self = Self(1 << 1);
    /// Keep symbolic links that resolve to files (disk only).
    pub const INCLUDE_SYMLINKS: Self = Self(1 << 2);

    pub const DEFAULT: Self = Self(Self::INCLUDE_DOTFILES.0 | Self::INCLUDE_SYMLINKS.0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn recursive(self) -> bool {
        self.contains(Self::RECURSIVE)
    }

    pub const fn include_dotfiles(self) -> bool {
        self.contains(Self::INCLUDE_DOTFILES)
    }

    pub const fn include_symlinks(self) -> bool {
        self.contains(Self::INCLUDE_SYMLINKS)
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for ListOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ListOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.recursive() {
            names.push("RECURSIVE");
        }
        if self.include_dotfiles() {
            names.push("INCLUDE_DOTFILES");
        }
        if self.include_symlinks() {
            names.push("INCLUDE_SYMLINKS");
        }
        if names.is_empty() {
            names.push("NONE");
        }
        write!(f, "ListOptions({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dotfiles_and_symlinks_non_recursive() {
        let opts = ListOptions::default();
        assert_eq!(opts, ListOptions::INCLUDE_DOTFILES | ListOptions::INCLUDE_SYMLINKS);
        assert!(!opts.recursive());
        assert!(opts.include_dotfiles());
        assert!(opts.include_symlinks());
    }

    #[test]
    fn test_flags_are_independent() {
        let opts = ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES;
        assert!(opts.recursive());
        assert!(opts.include_dotfiles());
        assert!(!opts.include_symlinks());
        assert!(!opts.contains(ListOptions::INCLUDE_SYMLINKS));
        assert_eq!(opts.difference(ListOptions::RECURSIVE), ListOptions::INCLUDE_DOTFILES);
    }

    #[test]
    fn test_none() {
        assert!(ListOptions::NONE.is_empty());
        assert!(ListOptions::RECURSIVE.contains(ListOptions::NONE));
        assert!(!ListOptions::NONE.recursive());
    }

    #[test]
    fn test_bits_roundtrip_and_truncate() {
        let mut opts = ListOptions::NONE;
        opts |= ListOptions::RECURSIVE;
        opts |= ListOptions::INCLUDE_SYMLINKS;
        assert_eq!(opts.bits(), 0b101);
        assert_eq!(ListOptions::from_bits_truncate(0xff).bits(), 0b111);
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", ListOptions::NONE), "ListOptions(NONE)");
        assert_eq!(
            format!("{:?}", ListOptions::RECURSIVE | ListOptions::INCLUDE_DOTFILES),
            "ListOptions(RECURSIVE | INCLUDE_DOTFILES)"
        );
    }
}
