//! Console registry: the folders under the overlays root that carry a frame asset.

use std::path::Path;

use gridframe_core::{NO_CONSOLES_FOUND, OVERLAY_FILE_NAME, ValidationError, is_console_selected};

/// List the consoles available under `overlays_root`, sorted.
///
/// A console is an immediate subdirectory containing `overlay.png`. When
/// nothing qualifies, or the root can't be read, the result is the single
/// [`NO_CONSOLES_FOUND`] sentinel so a picker always has an entry to show.
pub fn list_consoles(overlays_root: &Path) -> Vec<String> {
    match scan_consoles(overlays_root) {
        Ok(consoles) if !consoles.is_empty() => consoles,
        Ok(_) => vec![NO_CONSOLES_FOUND.to_string()],
        Err(e) => {
            log::warn!(
                "Error loading consoles from {}: {}",
                overlays_root.display(),
                e
            );
            vec![NO_CONSOLES_FOUND.to_string()]
        }
    }
}

fn scan_consoles(overlays_root: &Path) -> std::io::Result<Vec<String>> {
    let mut consoles = Vec::new();

    for entry in std::fs::read_dir(overlays_root)?.flatten() {
        let path = entry.path();
        if !path.is_dir() || !path.join(OVERLAY_FILE_NAME).is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            consoles.push(name.to_string());
        }
    }

    consoles.sort();
    Ok(consoles)
}

/// Check that `console` is a real selection present in the registry.
pub fn validate_console_selection(
    overlays_root: &Path,
    console: &str,
) -> Result<(), ValidationError> {
    if !is_console_selected(console) {
        return Err(ValidationError::NoConsoleSelected);
    }
    let known = scan_consoles(overlays_root).unwrap_or_default();
    if known.iter().any(|c| c == console) {
        Ok(())
    } else {
        Err(ValidationError::UnknownConsole(console.to_string()))
    }
}

/// Re-list consoles and pick the selection to show afterwards.
///
/// The current selection is kept if it is still listed; otherwise the first
/// real console is chosen. With no consoles the current value is returned
/// unchanged.
pub fn refresh_selection(overlays_root: &Path, current: &str) -> (Vec<String>, String) {
    let consoles = list_consoles(overlays_root);
    let selected = if consoles.iter().any(|c| c == current && is_console_selected(c)) {
        current.to_string()
    } else {
        match consoles.first() {
            Some(first) if is_console_selected(first) => first.clone(),
            _ => current.to_string(),
        }
    };
    (consoles, selected)
}

#[cfg(test)]
#[path = "tests/consoles_tests.rs"]
mod tests;
