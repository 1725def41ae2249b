//! Persistent list configuration.
//!
//! [`TrackListConfig`] captures everything about a list that a collaborator
//! would save between sessions: mode, geometry, columns, sort, and colors. It
//! reads and writes TOML:
//!
//! ```toml
//! selection_mode = "extended"
//! row_height = 20.0
//!
//! [[columns]]
//! type = "title"
//! width = 240.0
//!
//! [[columns]]
//! type = "rating"
//! width = 70.0
//!
//! [sort]
//! column = "title"
//! order = "descending"
//! ```
//!
//! Missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracklist_core::logging::targets;
use tracklist_core::{Color, Error, Result};

use crate::model::{
    ColumnRegistry, ColumnType, DEFAULT_COLUMN_WIDTH, SelectionMode, SortOrder, TrackItem,
};
use crate::widget::{DragSession, Palette, RatingGeometry, TrackList};

/// Serializable configuration of a [`TrackList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackListConfig {
    pub selection_mode: SelectionMode,
    pub row_height: f32,
    pub header_height: f32,
    /// Width reserved for item icons in the first column.
    pub icon_width: f32,
    pub alternate_rows: bool,
    /// Pointer travel, in pixels, before a press becomes a drag.
    pub drag_threshold: f32,
    pub rating: RatingConfig,
    pub columns: Vec<ColumnConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortConfig>,
    pub palette: PaletteConfig,
}

impl Default for TrackListConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            row_height: 20.0,
            header_height: 24.0,
            icon_width: 16.0,
            alternate_rows: true,
            drag_threshold: DragSession::DEFAULT_DRAG_THRESHOLD,
            rating: RatingConfig::default(),
            columns: Vec::new(),
            sort: None,
            palette: PaletteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub scale_max: u8,
    pub glyph_width: f32,
    pub margin: f32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingGeometry::default().into()
    }
}

impl From<RatingGeometry> for RatingConfig {
    fn from(geometry: RatingGeometry) -> Self {
        Self {
            scale_max: geometry.scale_max,
            glyph_width: geometry.glyph_width,
            margin: geometry.margin,
        }
    }
}

impl From<RatingConfig> for RatingGeometry {
    fn from(config: RatingConfig) -> Self {
        Self {
            scale_max: config.scale_max,
            glyph_width: config.glyph_width,
            margin: config.margin,
        }
    }
}

/// One installed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(rename = "type")]
    pub column: ColumnType,
    #[serde(default = "default_column_width")]
    pub width: f32,
    /// Position in the display order; unset keeps the listed order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_index: Option<usize>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl ColumnConfig {
    pub fn new(column: ColumnType, width: f32) -> Self {
        Self {
            column,
            width,
            display_index: None,
            visible: true,
        }
    }
}

fn default_column_width() -> f32 {
    DEFAULT_COLUMN_WIDTH
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub column: ColumnType,
    #[serde(default)]
    pub order: SortOrder,
}

/// Row colors as `#RRGGBB` or `#RRGGBBAA` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: String,
    pub alternate_background: String,
    pub selection_background: String,
    pub selection_text: String,
    pub active_background: String,
    pub active_text: String,
    pub text: String,
    pub shaded_text: String,
    pub focus: String,
    pub drop_indicator: String,
    pub star_set: String,
    pub star_unset: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Palette::default().into()
    }
}

impl From<Palette> for PaletteConfig {
    fn from(palette: Palette) -> Self {
        Self {
            background: palette.background.to_hex(),
            alternate_background: palette.alternate_background.to_hex(),
            selection_background: palette.selection_background.to_hex(),
            selection_text: palette.selection_text.to_hex(),
            active_background: palette.active_background.to_hex(),
            active_text: palette.active_text.to_hex(),
            text: palette.text.to_hex(),
            shaded_text: palette.shaded_text.to_hex(),
            focus: palette.focus.to_hex(),
            drop_indicator: palette.drop_indicator.to_hex(),
            star_set: palette.star_set.to_hex(),
            star_unset: palette.star_unset.to_hex(),
        }
    }
}

impl PaletteConfig {
    /// Parses every color.
    pub fn to_palette(&self) -> Result<Palette> {
        let color = |key: &str, hex: &str| {
            Color::from_hex(hex).ok_or_else(|| {
                Error::invalid_value(format!("palette.{key}"), format!("'{hex}' is not a hex color"))
            })
        };
        Ok(Palette {
            background: color("background", &self.background)?,
            alternate_background: color("alternate_background", &self.alternate_background)?,
            selection_background: color("selection_background", &self.selection_background)?,
            selection_text: color("selection_text", &self.selection_text)?,
            active_background: color("active_background", &self.active_background)?,
            active_text: color("active_text", &self.active_text)?,
            text: color("text", &self.text)?,
            shaded_text: color("shaded_text", &self.shaded_text)?,
            focus: color("focus", &self.focus)?,
            drop_indicator: color("drop_indicator", &self.drop_indicator)?,
            star_set: color("star_set", &self.star_set)?,
            star_unset: color("star_unset", &self.star_unset)?,
        })
    }
}

impl TrackListConfig {
    // =========================================================================
    // TOML
    // =========================================================================

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::parse(None, e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = toml::from_str(&text)
            .map_err(|e| Error::parse(Some(path.to_path_buf()), e.to_string()))?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::serialize(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| Error::io(path, e))?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "saved configuration");
        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks values that deserialize fine but cannot drive a list.
    pub fn validate(&self) -> Result<()> {
        if self.row_height.is_nan() || self.row_height <= 0.0 {
            return Err(Error::invalid_value("row_height", "must be positive"));
        }
        if self.header_height.is_nan() || self.header_height < 0.0 {
            return Err(Error::invalid_value("header_height", "must not be negative"));
        }
        if self.icon_width.is_nan() || self.icon_width < 0.0 {
            return Err(Error::invalid_value("icon_width", "must not be negative"));
        }
        if self.drag_threshold.is_nan() || self.drag_threshold < 0.0 {
            return Err(Error::invalid_value("drag_threshold", "must not be negative"));
        }
        if self.rating.scale_max == 0 {
            return Err(Error::invalid_value("rating.scale_max", "must be at least 1"));
        }
        if self.rating.glyph_width.is_nan() || self.rating.glyph_width <= 0.0 {
            return Err(Error::invalid_value("rating.glyph_width", "must be positive"));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.column == column.column) {
                return Err(Error::invalid_value(
                    "columns",
                    format!("column '{}' is listed twice", column.column),
                ));
            }
        }
        self.palette.to_palette()?;
        Ok(())
    }
}

impl<T: TrackItem> TrackList<T> {
    /// Builds a list from a configuration.
    ///
    /// Every configured column must be present in `registry`.
    pub fn from_config(config: &TrackListConfig, registry: ColumnRegistry<T>) -> Result<Self> {
        config.validate()?;
        let mut list = TrackList::new(registry, config.selection_mode);
        list.set_row_height(config.row_height);
        list.set_header_height(config.header_height);
        list.set_icon_width(config.icon_width);
        list.set_alternate_rows(config.alternate_rows);
        list.set_drag_threshold(config.drag_threshold);
        list.set_rating_geometry(config.rating.into());
        list.set_palette(config.palette.to_palette()?);

        for column in &config.columns {
            list.add_column(column.column, column.width)?;
        }
        let mut placed: Vec<(usize, ColumnType)> = config
            .columns
            .iter()
            .filter_map(|c| c.display_index.map(|index| (index, c.column)))
            .collect();
        placed.sort_unstable();
        for (index, column) in placed {
            list.columns.move_column(column, index);
        }
        for column in config.columns.iter().filter(|c| !c.visible) {
            list.columns.set_visible(column.column, false);
        }

        if let Some(sort) = config.sort {
            list.sort.set(sort.column, sort.order);
        }
        tracing::debug!(
            target: targets::CONFIG,
            columns = config.columns.len(),
            mode = ?config.selection_mode,
            "list built from configuration"
        );
        Ok(list)
    }

    /// Snapshots the current state for persistence.
    pub fn config(&self) -> TrackListConfig {
        TrackListConfig {
            selection_mode: self.model.selection_mode(),
            row_height: self.viewport.row_height,
            header_height: self.viewport.header_height,
            icon_width: self.icon_width,
            alternate_rows: self.alternate_rows,
            drag_threshold: self.drag.threshold(),
            rating: self.rating.into(),
            columns: self
                .columns
                .columns()
                .into_iter()
                .map(|c| ColumnConfig {
                    column: c.column_type,
                    width: c.width,
                    display_index: Some(c.display_index),
                    visible: c.visible,
                })
                .collect(),
            sort: self
                .sort
                .get()
                .map(|(column, order)| SortConfig { column, order }),
            palette: self.palette.into(),
        }
    }
}
