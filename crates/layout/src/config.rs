use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowLayoutConfig {
    /// Usable height of a page body, in points.
    ///
    /// Defaults to `842.0` (A4 portrait without margins).
    pub page_height: f32,
    /// Whether group headers and footers flagged for repetition are repeated
    /// at page tops and bottoms. When disabled, bands are simply stacked.
    ///
    /// Defaults to `true`.
    pub honor_repeats: bool,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            page_height: 842.0,
            honor_repeats: true,
        }
    }
}

/// Heights of the bands the row cursor emits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BandSizes {
    pub item: f32,
    pub header: f32,
    pub footer: f32,
    /// Per-level overrides, outer to inner. Missing entries use `header`/`footer`.
    pub levels: Vec<LevelSizes>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelSizes {
    pub header: Option<f32>,
    pub footer: Option<f32>,
}

impl Default for BandSizes {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

impl BandSizes {
    /// Every band has the same height.
    pub fn uniform(height: f32) -> Self {
        Self {
            item: height,
            header: height,
            footer: height,
            levels: Vec::new(),
        }
    }

    pub fn header_height(&self, level: usize) -> f32 {
        self.levels
            .get(level)
            .and_then(|l| l.header)
            .unwrap_or(self.header)
    }

    pub fn footer_height(&self, level: usize) -> f32 {
        self.levels
            .get(level)
            .and_then(|l| l.footer)
            .unwrap_or(self.footer)
    }
}
