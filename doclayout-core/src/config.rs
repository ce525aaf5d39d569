use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::{labels::Label, resolver::LabelResolver},
    consts::*,
    error::*,
};

/// How elements with an unrecognized type appear on the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedStyle {
    /// Leave them off the overlay.
    #[default]
    Omit,
    /// Draw them in a neutral color labelled with the raw type.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default)]
#[serde(default)]
pub struct VisualizationConfig {
    pub bbox_width: u32,
    pub font_size: f32,
    pub label_offset: i32,
    pub fallback_box_height: u32,
    pub fallback_box_width: u32,
    /// TrueType font for label text. Without it only boxes are drawn.
    #[builder(setter(into, strip_option))]
    pub font_path: Option<PathBuf>,
    pub unrecognized: UnrecognizedStyle,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            bbox_width: DEFAULT_BBOX_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            label_offset: DEFAULT_LABEL_OFFSET,
            fallback_box_height: DEFAULT_FALLBACK_BOX_HEIGHT,
            fallback_box_width: DEFAULT_FALLBACK_BOX_WIDTH,
            font_path: None,
            unrecognized: UnrecognizedStyle::Omit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub max_log_lines: usize,
    pub log_element_details: bool,
    pub log_coordinates: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_log_lines: DEFAULT_MAX_LOG_LINES,
            log_element_details: true,
            log_coordinates: true,
        }
    }
}

/// Settings forwarded to the external layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tesseract language codes.
    pub languages: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|code| code.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub codes: Vec<String>,
    pub names: Vec<&'static str>,
    pub primary: Option<String>,
    pub primary_name: Option<&'static str>,
}

pub fn language_display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(supported, _)| *supported == code)
        .map(|(_, name)| *name)
}

/// Splits codes into `(supported, unsupported)`, keeping input order.
pub fn validate_languages(codes: &[String]) -> (Vec<String>, Vec<String>) {
    codes
        .iter()
        .cloned()
        .partition(|code| language_display_name(code).is_some())
}

impl EngineConfig {
    /// Supported configured languages, or the defaults when none are usable.
    pub fn effective_languages(&self) -> Vec<String> {
        let (valid, invalid) = validate_languages(&self.languages);
        if !invalid.is_empty() {
            warn!("ignoring unsupported language codes: {:?}", invalid);
        }

        if valid.is_empty() {
            warn!("no supported language codes configured, using defaults");
            return EngineConfig::default().languages;
        }

        valid
    }

    pub fn language_info(&self) -> LanguageInfo {
        let codes = self.effective_languages();
        let names = codes
            .iter()
            .filter_map(|code| language_display_name(code))
            .collect::<Vec<_>>();

        LanguageInfo {
            primary: codes.first().cloned(),
            primary_name: names.first().copied(),
            codes,
            names,
        }
    }
}

/// Application configuration, read from a JSON file.
///
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Color overrides keyed by canonical label name.
    pub colors: BTreeMap<String, [u8; 3]>,
    pub visualization: VisualizationConfig,
    pub log: LogConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DoclayoutError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context(IoReadSnafu {
            path: path.to_string_lossy(),
        })?;

        Self::from_json(&content, &path.to_string_lossy())
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self, DoclayoutError> {
        let config = serde_json::from_str::<Self>(content).context(JsonSnafu {
            stage: "parse-config",
            path: origin,
        })?;
        debug!("loaded config from {origin}: {config:?}");

        Ok(config)
    }

    /// Color overrides as labels. Only canonical names are accepted as keys.
    pub fn color_overrides(&self) -> Result<HashMap<Label, [u8; 3]>, DoclayoutError> {
        self.colors
            .iter()
            .map(|(name, color)| {
                name.parse::<Label>()
                    .map(|label| (label, *color))
                    .map_err(|err| DoclayoutError::Config {
                        key: format!("colors.{name}"),
                        message: err.to_string(),
                    })
            })
            .collect()
    }

    /// Builds the label table with this configuration's colors.
    pub fn resolver(&self) -> Result<LabelResolver, DoclayoutError> {
        let overrides = self.color_overrides()?;

        LabelResolver::new(&overrides).context(LabelSnafu {
            stage: "build-table",
        })
    }
}
