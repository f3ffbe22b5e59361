//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

use std::fmt;

/// Info flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Rule and ignore files picked up while descending.
    Rules,
    /// Directories entered and files emitted.
    Scan,
    /// Entries skipped because of ignore rules, filters, or boundaries.
    Skip,
    /// End-of-scan counters.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in declaration order.
    pub const ALL: [Self; 4] = [Self::Rules, Self::Scan, Self::Skip, Self::Stats];

    /// Token used for this flag on the command line and in tracing targets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Scan => "scan",
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for InfoFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// External command execution (`git` lookups).
    Cmd,
    /// Symlinked directories that point back at an ancestor.
    Dup,
    /// Pattern match decisions.
    Filter,
    /// Rule parsing and environment resolution.
    Rules,
    /// Directory listing and traversal order.
    Scan,
}

impl DebugFlag {
    /// Every debug flag, in declaration order.
    pub const ALL: [Self; 5] = [Self::Cmd, Self::Dup, Self::Filter, Self::Rules, Self::Scan];

    /// Token used for this flag on the command line and in tracing targets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cmd => "cmd",
            Self::Dup => "dup",
            Self::Filter => "filter",
            Self::Rules => "rules",
            Self::Scan => "scan",
        }
    }
}

impl fmt::Display for DebugFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Rule file loading level.
    pub rules: u8,
    /// Traversal progress level.
    pub scan: u8,
    /// Skipped entries level.
    pub skip: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Rules => self.rules,
            InfoFlag::Scan => self.scan,
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Rules => self.rules = level,
            InfoFlag::Scan => self.scan = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Command execution level.
    pub cmd: u8,
    /// Symlink loop detection level.
    pub dup: u8,
    /// Pattern decision level.
    pub filter: u8,
    /// Rule resolution level.
    pub rules: u8,
    /// Traversal level.
    pub scan: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Cmd => self.cmd,
            DebugFlag::Dup => self.dup,
            DebugFlag::Filter => self.filter,
            DebugFlag::Rules => self.rules,
            DebugFlag::Scan => self.scan,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Cmd => self.cmd = level,
            DebugFlag::Dup => self.dup = level,
            DebugFlag::Filter => self.filter = level,
            DebugFlag::Rules => self.rules = level,
            DebugFlag::Scan => self.scan = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}
