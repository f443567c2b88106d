//! Configuration file management
//!
//! Loads TOML configuration files and provides card settings.
//! Default config path: ~/.config/quotecard/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_EMOJI_SCALE, DEFAULT_MAX_FONT_SIZE,
    ROUNDED_AVATAR_RADIUS,
};
use crate::emoji::EmojiCatalog;
use crate::entity::ColorSet;
use crate::font::FontSet;
use crate::generator::{Background, GeneratorOptions, QuoteGenerator};
use crate::geometry::{Grid, Size, SizeBox};
use crate::render::{AvatarShape, GradientDirection};
use crate::utils::color::{parse_hex_color, parse_hex_rgba};

/// Card generator settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Canvas settings
    pub canvas: CanvasConfig,
    /// Font settings
    pub fonts: FontConfig,
    /// Semantic color settings
    pub colors: ColorsConfig,
    /// Region grid settings
    pub grid: GridConfig,
    /// Emoji settings
    pub emoji: EmojiConfig,
    /// Layout settings
    pub layout: LayoutConfig,
    /// Avatar settings
    pub avatar: AvatarConfig,
    /// Debug settings
    pub debug: DebugConfig,
}

/// Canvas settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Background color (RRGGBB)
    pub background: String,
    /// Gradient start color (RRGGBB, empty = solid background)
    pub gradient_from: String,
    /// Gradient end color (RRGGBB, empty = solid background)
    pub gradient_to: String,
    /// Gradient direction: "l-r" | "t-b" | "lt-rb" | "rt-lb"
    pub gradient_direction: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background: "101018".to_string(),
            gradient_from: String::new(),
            gradient_to: String::new(),
            gradient_direction: "t-b".to_string(),
        }
    }
}

/// Font settings: file paths for the four faces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: String,
    pub bold: String,
    pub italic: String,
    pub mono: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: "fonts/Roboto-Regular.ttf".to_string(),
            bold: "fonts/Roboto-Bold.ttf".to_string(),
            italic: "fonts/Roboto-Italic.ttf".to_string(),
            mono: "fonts/RobotoMono-Regular.ttf".to_string(),
        }
    }
}

/// Semantic colors (RRGGBB hex strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub title: String,
    pub content: String,
    pub link: String,
    pub code: String,
    pub author_name: String,
    /// Fill behind the author row (empty = transparent)
    pub diviner: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            title: "ffffff".to_string(),
            content: "f0f0f0".to_string(),
            link: "6699ff".to_string(),
            code: "ff6666".to_string(),
            author_name: "ffffff".to_string(),
            diviner: String::new(),
        }
    }
}

/// One region box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoxConfig {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<BoxConfig> for SizeBox {
    fn from(b: BoxConfig) -> Self {
        SizeBox::new(b.x, b.y, b.width, b.height)
    }
}

/// The five region boxes of the card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub title: BoxConfig,
    pub diviner: BoxConfig,
    pub content: BoxConfig,
    pub author_image: BoxConfig,
    pub author_name: BoxConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        // Laid out for the default 1600x900 canvas
        Self {
            title: BoxConfig {
                x: 50,
                y: 15,
                width: 1500,
                height: 50,
            },
            diviner: BoxConfig {
                x: 50,
                y: 75,
                width: 1500,
                height: 100,
            },
            content: BoxConfig {
                x: 50,
                y: 175,
                width: 1500,
                height: 495,
            },
            author_image: BoxConfig {
                x: 50,
                y: 685,
                width: 200,
                height: 200,
            },
            author_name: BoxConfig {
                x: 275,
                y: 760,
                width: 1275,
                height: 50,
            },
        }
    }
}

/// Emoji settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Emoji asset directory (empty = no emoji support)
    pub dir: String,
    /// Glyph size multiplier relative to line height
    pub scale: f32,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            dir: "emoji".to_string(),
            scale: DEFAULT_EMOJI_SCALE,
        }
    }
}

/// Layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Upper bound of the font size search
    pub max_font_size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_font_size: DEFAULT_MAX_FONT_SIZE,
        }
    }
}

/// Avatar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Mask shape: "circle" | "rounded" | "square"
    pub shape: String,
    /// Corner radius for the rounded shape (pixels)
    pub corner_radius: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            shape: "circle".to_string(),
            corner_radius: ROUNDED_AVATAR_RADIUS,
        }
    }
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw the region/grid overlay on generated cards
    pub enabled: bool,
}

impl Config {
    /// Default config file path: ~/.config/quotecard/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quotecard").join("config.toml"))
    }

    /// Load configuration from the given path, or the default location.
    /// A missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    warn!("no config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            info!("config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        info!("config loaded from {:?}", path);
        Ok(config)
    }

    /// Write the built-in defaults as a TOML file.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {:?}", parent))?;
        }
        let text = toml::to_string_pretty(&Self::default()).context("failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write config file {:?}", path))?;
        info!("default config written to {:?}", path);
        Ok(())
    }

    /// Assemble a generator from this configuration.
    pub fn build_generator(&self) -> Result<QuoteGenerator> {
        let fonts = FontSet::load(
            &self.fonts.regular,
            &self.fonts.bold,
            &self.fonts.italic,
            &self.fonts.mono,
        )?;

        let catalog = if self.emoji.dir.is_empty() {
            info!("no emoji directory configured, emoji disabled");
            EmojiCatalog::empty()
        } else {
            EmojiCatalog::load(&self.emoji.dir)?
        };

        let colors = ColorSet {
            title: parse_hex_rgba(&self.colors.title),
            content: parse_hex_rgba(&self.colors.content),
            link: parse_hex_rgba(&self.colors.link),
            code: parse_hex_rgba(&self.colors.code),
            author_name: parse_hex_rgba(&self.colors.author_name),
        };

        let grid = Grid {
            title: self.grid.title.into(),
            diviner: self.grid.diviner.into(),
            content: self.grid.content.into(),
            author_image: self.grid.author_image.into(),
            author_name: self.grid.author_name.into(),
        };

        let options = GeneratorOptions {
            avatar_shape: self.avatar_shape(),
            emoji_scale: self.emoji.scale,
            max_font_size: self.layout.max_font_size,
            diviner_fill: if self.colors.diviner.is_empty() {
                None
            } else {
                Some(parse_hex_rgba(&self.colors.diviner))
            },
            debug: self.debug.enabled,
        };

        let generator = QuoteGenerator::new(
            fonts,
            colors,
            grid,
            catalog,
            Size::new(self.canvas.width, self.canvas.height),
            &self.background(),
            options,
        )?;
        Ok(generator)
    }

    /// Background from the canvas section: gradient when both endpoint
    /// colors parse, otherwise a solid fill.
    pub fn background(&self) -> Background {
        let from = parse_hex_color(&self.canvas.gradient_from);
        let to = parse_hex_color(&self.canvas.gradient_to);
        match (from, to) {
            (Some(_), Some(_)) => Background::Gradient {
                from: parse_hex_rgba(&self.canvas.gradient_from),
                to: parse_hex_rgba(&self.canvas.gradient_to),
                direction: self.gradient_direction(),
            },
            _ => Background::Solid(parse_hex_rgba(&self.canvas.background)),
        }
    }

    fn gradient_direction(&self) -> GradientDirection {
        match self.canvas.gradient_direction.as_str() {
            "l-r" => GradientDirection::LeftRight,
            "t-b" => GradientDirection::TopBottom,
            "lt-rb" => GradientDirection::DiagDown,
            "rt-lb" => GradientDirection::DiagUp,
            other => {
                warn!("unknown gradient direction '{}', using t-b", other);
                GradientDirection::TopBottom
            }
        }
    }

    fn avatar_shape(&self) -> AvatarShape {
        match self.avatar.shape.as_str() {
            "circle" => AvatarShape::Circle,
            "rounded" => AvatarShape::Rounded(self.avatar.corner_radius),
            "square" => AvatarShape::Square,
            other => {
                warn!("unknown avatar shape '{}', using circle", other);
                AvatarShape::Circle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.canvas.width, DEFAULT_CANVAS_WIDTH);
        assert_eq!(config.layout.max_font_size, DEFAULT_MAX_FONT_SIZE);
        assert_eq!(config.grid.title.width, 1500);
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [canvas]
            width = 800
            height = 600

            [avatar]
            shape = "rounded"
            corner_radius = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.avatar_shape(), AvatarShape::Rounded(12.0));
        // Untouched sections keep defaults
        assert_eq!(config.emoji.scale, DEFAULT_EMOJI_SCALE);
    }

    #[test]
    fn test_background_selection() {
        let solid: Config = toml::from_str("").unwrap();
        assert!(matches!(solid.background(), Background::Solid(_)));

        let gradient: Config = toml::from_str(
            r#"
            [canvas]
            gradient_from = "000000"
            gradient_to = "ffffff"
            gradient_direction = "l-r"
            "#,
        )
        .unwrap();
        assert!(matches!(
            gradient.background(),
            Background::Gradient {
                direction: GradientDirection::LeftRight,
                ..
            }
        ));
    }

    #[test]
    fn test_write_default_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::write_default(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.canvas.width, DEFAULT_CANVAS_WIDTH);
        assert_eq!(loaded.grid.author_image.height, 200);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/quotecard.toml"))).unwrap();
        assert_eq!(config.canvas.height, DEFAULT_CANVAS_HEIGHT);
    }
}
