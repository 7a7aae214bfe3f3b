use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

use crate::contact::ContactRecord;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "cardfile";

/// Resolved application configuration.
///
/// Everything has a default; the config file is optional and only ever
/// adjusts presentation (colors), the draft template, and whether deletes
/// ask for confirmation. Contact data itself is never persisted.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the configuration was read from, when a file existed.
    pub config_path: Option<PathBuf>,
    pub ui: UiConfig,
    /// The record the form draft resets to after every submission.
    pub template: ContactRecord,
    /// Ask before deleting a contact.
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            ui: UiConfig::default(),
            template: ContactRecord::template(),
            confirm_delete: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            border: RgbColor::new(255, 165, 0),
            selection_bg: RgbColor::new(255, 165, 0),
            selection_fg: RgbColor::new(0, 0, 0),
            status_fg: RgbColor::new(255, 165, 0),
            status_bg: RgbColor::new(0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine config directories")?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the platform config dir, or defaults when no
/// file exists there.
pub fn load() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from(&path)
}

/// Load configuration from an explicit path (`--config`). The file must
/// exist and parse; unknown top-level keys only warn.
pub fn load_from(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

    let value: toml::Value = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

    warn_unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", path.display()))?;

    Ok(Config {
        config_path: Some(path.to_path_buf()),
        ui: cfg_file.ui.into(),
        template: cfg_file.template.into(),
        confirm_delete: cfg_file.confirm_delete.into(),
    })
}

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["ui", "template", "confirm_delete"]);
    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown configuration key `{}`", key);
        }
    }
}

// =============================================================================
// File-format types (serde side of the resolved config above)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    ui: UiFile,
    template: TemplateFile,
    confirm_delete: ConfirmDelete,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
struct ConfirmDelete(bool);

impl Default for ConfirmDelete {
    fn default() -> Self {
        Self(true)
    }
}

impl From<ConfirmDelete> for bool {
    fn from(value: ConfirmDelete) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiFile {
    colors: UiColorsFile,
}

impl From<UiFile> for UiConfig {
    fn from(file: UiFile) -> Self {
        Self {
            colors: file.colors.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiColorsFile {
    border: RgbColor,
    selection_bg: RgbColor,
    selection_fg: RgbColor,
    status_fg: RgbColor,
    status_bg: RgbColor,
}

impl Default for UiColorsFile {
    fn default() -> Self {
        let defaults = UiColors::default();
        Self {
            border: defaults.border,
            selection_bg: defaults.selection_bg,
            selection_fg: defaults.selection_fg,
            status_fg: defaults.status_fg,
            status_bg: defaults.status_bg,
        }
    }
}

impl From<UiColorsFile> for UiColors {
    fn from(file: UiColorsFile) -> Self {
        Self {
            border: file.border,
            selection_bg: file.selection_bg,
            selection_fg: file.selection_fg,
            status_fg: file.status_fg,
            status_bg: file.status_bg,
        }
    }
}

/// `[template]` section: any subset of the draft template's fields;
/// omitted fields keep their stock values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TemplateFile {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zipcode: Option<String>,
}

impl From<TemplateFile> for ContactRecord {
    fn from(file: TemplateFile) -> Self {
        let stock = ContactRecord::template();
        ContactRecord {
            name: file.name.unwrap_or(stock.name),
            email: file.email.unwrap_or(stock.email),
            phone: file.phone.unwrap_or(stock.phone),
            address: file.address.unwrap_or(stock.address),
            city: file.city.unwrap_or(stock.city),
            state: file.state.unwrap_or(stock.state),
            zipcode: file.zipcode.unwrap_or(stock.zipcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Config {
        let value: toml::Value = toml::from_str(raw).unwrap();
        let cfg_file: ConfigFile = value.try_into().unwrap();
        Config {
            config_path: None,
            ui: cfg_file.ui.into(),
            template: cfg_file.template.into(),
            confirm_delete: cfg_file.confirm_delete.into(),
        }
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let config = parse("");
        assert_eq!(config.template, ContactRecord::template());
        assert!(config.confirm_delete);
        assert_eq!(config.ui.colors.border, RgbColor::new(255, 165, 0));
    }

    #[test]
    fn test_colors_accept_array_and_map_forms() {
        let config = parse(
            r#"
            [ui.colors]
            border = [10, 20, 30]
            selection_bg = { r = 1, g = 2, b = 3 }
            "#,
        );
        assert_eq!(config.ui.colors.border, RgbColor::new(10, 20, 30));
        assert_eq!(config.ui.colors.selection_bg, RgbColor::new(1, 2, 3));
        // Unset colors keep defaults
        assert_eq!(config.ui.colors.status_bg, RgbColor::new(0, 0, 0));
    }

    #[test]
    fn test_template_partial_override() {
        let config = parse(
            r#"
            [template]
            name = "Jane Roe"
            city = "Portland"
            state = "OR"
            "#,
        );
        assert_eq!(config.template.name, "Jane Roe");
        assert_eq!(config.template.city, "Portland");
        assert_eq!(config.template.state, "OR");
        // Untouched fields fall back to the stock template
        assert_eq!(config.template.email, "john@doe.com");
        assert_eq!(config.template.phone, "(555) 555-5555");
    }

    #[test]
    fn test_confirm_delete_toggle() {
        let config = parse("confirm_delete = false");
        assert!(!config.confirm_delete);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "confirm_delete = false\n[template]\nname = \"T\"\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert!(!config.confirm_delete);
        assert_eq!(config.template.name, "T");
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[template\nname = ").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
