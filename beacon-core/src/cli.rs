//! `--key=value` flag parsing shared by the experiment drivers.
//!
//! An absent flag takes its default. A present flag that does not parse is a
//! [`ConfigError`], never a silent fallback.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::signal::Resolution;

/// Value of `--name=value`, if given.
pub fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("--{}=", name);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
}

/// Whether the bare switch `--name` is present.
pub fn has_switch(args: &[String], name: &str) -> bool {
    let switch = format!("--{}", name);
    args.iter().any(|a| *a == switch)
}

/// Parse `--name=value` as `T`, or return `default` when absent.
pub fn parse_flag<T: FromStr>(
    args: &[String],
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match flag_value(args, name) {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidFlag {
            flag: name,
            value: v.to_string(),
        }),
    }
}

/// Map `--name=value` onto one of `choices`, or return `default` when absent.
pub fn parse_choice<T: Copy>(
    args: &[String],
    name: &'static str,
    choices: &[(&str, T)],
    default: T,
) -> Result<T, ConfigError> {
    match flag_value(args, name) {
        None => Ok(default),
        Some(v) => choices
            .iter()
            .find(|(key, _)| *key == v)
            .map(|&(_, value)| value)
            .ok_or_else(|| ConfigError::UnknownEntry {
                kind: name,
                name: v.to_string(),
            }),
    }
}

/// Parse a single grid side, defaulting to `default`.
pub fn parse_resolution(
    args: &[String],
    name: &'static str,
    default: usize,
) -> Result<Resolution, ConfigError> {
    Resolution::new(parse_flag(args, name, default)?)
}

/// Parse a comma-separated list of grid sides. Every entry must parse and be
/// positive; an empty list is [`ConfigError::NoResolutions`].
pub fn parse_resolutions(
    args: &[String],
    name: &'static str,
    default: &[usize],
) -> Result<Vec<Resolution>, ConfigError> {
    let sides = match flag_value(args, name) {
        None => default.to_vec(),
        Some(v) => v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>().map_err(|_| ConfigError::InvalidFlag {
                    flag: name,
                    value: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    if sides.is_empty() {
        return Err(ConfigError::NoResolutions);
    }
    sides.into_iter().map(Resolution::new).collect()
}
