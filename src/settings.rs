use crate::config::{ColorScheme, TreeOverrides};
use crate::error::SettingsError;
use crate::geometry::Point;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub colors: ColorSettings,
}

/// `[tree]` table; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TreeSettings {
    pub root_x: Option<f64>,
    pub root_y: Option<f64>,
    pub start_length: Option<f64>,
    pub length_factor: Option<f64>,
    pub start_angle: Option<f64>,
    pub angle_factor: Option<f64>,
    pub branch_factor: Option<usize>,
    pub start_depth: Option<u32>,
    pub terminal_depth: Option<u32>,
    pub ticks_per_level: Option<u32>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ColorSettings {
    pub wood_dark: Option<[u8; 3]>,
    pub wood_light: Option<[u8; 3]>,
}

impl Settings {
    /// Load the user's settings; a missing file means defaults
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fractree")
            .join("config.toml")
    }

    pub fn tree_overrides(&self) -> TreeOverrides {
        let t = &self.tree;
        TreeOverrides {
            root: t.root_x.zip(t.root_y).map(|(x, y)| Point::new(x, y)),
            start_length: t.start_length,
            length_factor: t.length_factor,
            start_angle: t.start_angle,
            angle_factor: t.angle_factor,
            branch_factor: t.branch_factor,
            start_depth: t.start_depth,
            terminal_depth: t.terminal_depth,
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        let defaults = ColorScheme::default();
        let tuple = |c: [u8; 3]| (c[0], c[1], c[2]);
        ColorScheme {
            wood_dark: self.colors.wood_dark.map_or(defaults.wood_dark, tuple),
            wood_light: self.colors.wood_light.map_or(defaults.wood_light, tuple),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tree_overrides(), TreeOverrides::default());
        assert_eq!(settings.color_scheme(), ColorScheme::default());
    }

    #[test]
    fn partial_tree_table() {
        let settings: Settings = toml::from_str(
            r#"
            [tree]
            branch_factor = 4
            terminal_depth = 6
            root_x = 10.0

            [colors]
            wood_dark = [1, 2, 3]
            "#,
        )
        .unwrap();

        let tree = settings.tree_overrides();
        assert_eq!(tree.branch_factor, Some(4));
        assert_eq!(tree.terminal_depth, Some(6));
        // half a root position is ignored
        assert_eq!(tree.root, None);
        assert_eq!(settings.color_scheme().wood_dark, (1, 2, 3));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("fractree-no-such-dir").join("config.toml");
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("fractree-bad-{}.toml", std::process::id()));
        fs::write(&path, "[tree]\nbranch_factor = \"many\"\n").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
