//! Parsers for text printed by Android shell tools

use std::collections::HashMap;

/// Parses `getprop` output (`[key]: [value]` per line) into a map
///
/// Lines that do not follow the bracketed form are skipped.
///
/// # Examples
///
/// ```
/// use msc_core::device::parse::parse_getprop;
///
/// let props = parse_getprop("[ro.product.model]: [Pixel 4]\n[ro.build.version.sdk]: [30]\n");
/// assert_eq!(props["ro.product.model"], "Pixel 4");
/// assert_eq!(props["ro.build.version.sdk"], "30");
/// ```
pub fn parse_getprop(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once("]: [")?;
            let key = key.strip_prefix('[')?;
            let value = value.strip_suffix(']')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Display sizes reported by `wm size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmSize {
    /// Native panel resolution
    pub physical: (u32, u32),
    /// Resolution the display renders at; differs from `physical` when an
    /// `Override size` is set
    pub current: (u32, u32),
}

/// Parses `wm size` output
///
/// A missing `Physical size` line falls back to the override and vice versa.
///
/// # Examples
///
/// ```
/// use msc_core::device::parse::parse_wm_size;
///
/// let size = parse_wm_size("Physical size: 1440x3040\nOverride size: 1080x2280\n").unwrap();
/// assert_eq!(size.physical, (1440, 3040));
/// assert_eq!(size.current, (1080, 2280));
/// ```
pub fn parse_wm_size(output: &str) -> Option<WmSize> {
    let mut physical = None;
    let mut overridden = None;
    for line in output.lines() {
        let line = line.trim();
        if let Some(size) = line.strip_prefix("Override size: ") {
            overridden = parse_dimensions(size).or(overridden);
        } else if let Some(size) = line.strip_prefix("Physical size: ") {
            physical = parse_dimensions(size).or(physical);
        }
    }

    let physical = physical.or(overridden)?;
    Some(WmSize {
        physical,
        current: overridden.unwrap_or(physical),
    })
}

fn parse_dimensions(size: &str) -> Option<(u32, u32)> {
    let (w, h) = size.trim().split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Returns the output of `pm path <package>` without its `package:` prefix
pub fn parse_pm_path(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("package:"))
        .map(str::to_string)
        .filter(|path| !path.is_empty())
}
