//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a verbose level (the number of `-v`
    /// flags given on the command line).
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config.info.rules = 1;
            config.info.skip = 1;
            config.info.stats = 1;
        }
        if level >= 2 {
            config.info.scan = 1;
            config.info.skip = 2;
            config.debug.cmd = 1;
            config.debug.dup = 1;
            config.debug.rules = 1;
        }
        if level >= 3 {
            config.info.scan = 2;
            config.debug.filter = 1;
            config.debug.rules = 2;
            config.debug.scan = 1;
        }
        if level >= 4 {
            config.debug.filter = 2;
            config.debug.scan = 2;
        }

        config
    }

    /// Apply a single info flag token (e.g., "rules", "skip2").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.info.set_all(level);
            return Ok(());
        }

        let flag = match name {
            "rules" => InfoFlag::Rules,
            "scan" => InfoFlag::Scan,
            "skip" => InfoFlag::Skip,
            "stats" => InfoFlag::Stats,
            _ => return Err(format!("unknown info flag: {name}")),
        };

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "filter2", "dup").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag = match name {
            "cmd" => DebugFlag::Cmd,
            "dup" => DebugFlag::Dup,
            "filter" => DebugFlag::Filter,
            "rules" => DebugFlag::Rules,
            "scan" => DebugFlag::Scan,
            _ => return Err(format!("unknown debug flag: {name}")),
        };

        self.debug.set(flag, level);
        Ok(())
    }

    /// Apply a comma-separated list of debug tokens (e.g., "filter2,dup").
    pub fn apply_debug_flags(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "filter2" into ("filter", 2) or "dup" into ("dup", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    let digit_start = token.find(|c: char| c.is_ascii_digit());

    match digit_start {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let name = &token[..pos];
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
