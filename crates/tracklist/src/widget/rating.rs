//! The inline rating cell: hit testing and hover preview.

/// Geometry of the rating glyph strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingGeometry {
    /// Number of glyphs (the highest rating).
    pub scale_max: u8,
    pub glyph_width: f32,
    /// Gap between the cell's left edge and the first glyph.
    pub margin: f32,
}

impl Default for RatingGeometry {
    fn default() -> Self {
        Self {
            scale_max: 5,
            glyph_width: 12.0,
            margin: 1.0,
        }
    }
}

impl RatingGeometry {
    /// Glyph under `px` for a strip whose cell starts at `col_x`, clamped to
    /// `0..=scale_max`.
    pub fn star_index(&self, col_x: f32, px: f32) -> u8 {
        let index = ((px - col_x - self.margin) / self.glyph_width).floor();
        index.clamp(0.0, f32::from(self.scale_max)) as u8
    }

    /// The rating a click on glyph `star_index` commits.
    pub fn committed_rating(&self, star_index: u8) -> u8 {
        star_index.saturating_add(1).min(self.scale_max)
    }

    /// Left edge of glyph `index`.
    pub fn glyph_x(&self, col_x: f32, index: u8) -> f32 {
        col_x + self.margin + f32::from(index) * self.glyph_width
    }

    /// Width of the full glyph strip.
    pub fn natural_width(&self) -> f32 {
        f32::from(self.scale_max) * self.glyph_width
    }
}

/// The row and glyph currently under the pointer in a rating column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingHover {
    current: Option<(usize, u8)>,
}

impl RatingHover {
    pub fn get(&self) -> Option<(usize, u8)> {
        self.current
    }

    /// Glyph hovered on `row`, if the hover is on that row.
    pub fn star_for_row(&self, row: usize) -> Option<u8> {
        self.current
            .and_then(|(hovered, star)| (hovered == row).then_some(star))
    }

    /// Returns whether the hover changed.
    pub fn update(&mut self, row: usize, star_index: u8) -> bool {
        let next = Some((row, star_index));
        let changed = self.current != next;
        self.current = next;
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}
