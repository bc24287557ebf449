use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gridframe_core::is_console_selected;
use gridframe_scraper::{SettingSource, Settings};

use super::{mask_value, prompt_line};
use crate::cli_types::SettingKey;
use crate::error::CliError;

/// Show current settings and their sources.
pub(crate) fn run_config_show() {
    let path = gridframe_scraper::settings_path();
    let sources = gridframe_scraper::setting_sources();
    let effective = Settings::load_effective();

    log::info!(
        "{}",
        "gridframe Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Settings file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let api_key = Some(effective.api_key())
        .filter(|k| !k.is_empty())
        .map(mask_value);
    let console = Some(effective.console())
        .filter(|c| is_console_selected(c))
        .map(str::to_string);

    let fields: [(&str, &SettingSource, Option<String>); 4] = [
        ("api_key", &sources.api_key, api_key),
        ("console", &sources.selected_console, console),
        (
            "output",
            &sources.output_folder,
            Some(effective.output_root().display().to_string()),
        ),
        (
            "overlays",
            &sources.overlays_folder,
            Some(effective.overlays_root().display().to_string()),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        let label = format!("{}:", name);
        match value {
            Some(v) => log::info!(
                "  {:<10} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {:<10} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

/// Interactively edit the settings file.
pub(crate) fn run_config_setup() -> Result<(), CliError> {
    println!(
        "{}",
        "gridframe Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!(
        "  {}",
        "Press Enter to keep the current value.".if_supports_color(Stdout, |t| t.dimmed()),
    );
    println!();

    let mut settings = Settings::load();
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let current_key = settings.api_key().to_string();
    let shown_key = if current_key.is_empty() {
        "not set".to_string()
    } else {
        mask_value(&current_key)
    };
    if let Some(key) = prompt_line(&mut input, &format!("  API key [{}]: ", shown_key))? {
        if !key.is_empty() {
            settings.api_key = key;
        }
    }

    let output = settings.output_root();
    if let Some(dir) = prompt_line(
        &mut input,
        &format!("  Output folder [{}]: ", output.display()),
    )? {
        if !dir.is_empty() {
            settings.output_folder = Some(PathBuf::from(dir));
        }
    }

    let overlays = settings.overlays_root();
    if let Some(dir) = prompt_line(
        &mut input,
        &format!("  Overlays folder [{}]: ", overlays.display()),
    )? {
        if !dir.is_empty() {
            settings.overlays_folder = Some(PathBuf::from(dir));
        }
    }

    let (consoles, selected) =
        gridframe_overlay::refresh_selection(&settings.overlays_root(), settings.console());
    let real: Vec<&String> = consoles.iter().filter(|c| is_console_selected(c)).collect();
    if real.is_empty() {
        println!(
            "  {}",
            "No consoles found in the overlays folder.".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        println!("  Consoles: {}", consoles.join(", "));
        loop {
            let Some(choice) =
                prompt_line(&mut input, &format!("  Console [{}]: ", selected))?
            else {
                break;
            };
            let choice = if choice.is_empty() { selected.clone() } else { choice };
            if real.iter().any(|c| **c == choice) {
                settings.selected_console = choice;
                break;
            }
            println!(
                "    {}",
                format!("Unknown console '{}'.", choice).if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }

    let path = settings.save()?;
    println!();
    println!(
        "{} Settings saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Apply `key = value` to the settings file. An empty value clears the setting.
pub(crate) fn apply_setting(settings: &mut Settings, key: SettingKey, value: &str) {
    let value = value.trim();
    let folder = (!value.is_empty()).then(|| PathBuf::from(value));
    match key {
        SettingKey::ApiKey => settings.api_key = value.to_string(),
        SettingKey::Console => settings.selected_console = value.to_string(),
        SettingKey::Output => settings.output_folder = folder,
        SettingKey::Overlays => settings.overlays_folder = folder,
    }
}

/// Set a single setting without prompting.
pub(crate) fn run_config_set(key: SettingKey, value: String) -> Result<(), CliError> {
    let mut settings = Settings::load();
    apply_setting(&mut settings, key, &value);

    if key == SettingKey::Console && !settings.selected_console.is_empty() {
        gridframe_overlay::validate_console_selection(
            &settings.overlays_root(),
            &settings.selected_console,
        )?;
    }

    let path = settings.save()?;
    log::info!(
        "{} Saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = gridframe_scraper::settings_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting() {
        let mut settings = Settings::default();

        apply_setting(&mut settings, SettingKey::ApiKey, " abc123 ");
        apply_setting(&mut settings, SettingKey::Console, "NES");
        apply_setting(&mut settings, SettingKey::Output, "/icons");
        assert_eq!(settings.api_key, "abc123");
        assert_eq!(settings.selected_console, "NES");
        assert_eq!(settings.output_folder, Some(PathBuf::from("/icons")));

        apply_setting(&mut settings, SettingKey::Output, "");
        assert_eq!(settings.output_folder, None);
        assert_eq!(settings.overlays_folder, None);
    }
}
