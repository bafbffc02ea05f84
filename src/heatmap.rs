use serde::{Deserialize, Serialize};

use crate::model::DocumentTopicMatrix;

/// Nine-step blue palette, dark to light.
pub const BLUES_9: [&str; 9] = [
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef", "#deebf7",
    "#f7fbff",
];

/// Linear mapping from a value range onto a discrete color palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearColorMapper {
    palette: Vec<String>,
    low: f64,
    high: f64,
}

impl LinearColorMapper {
    pub fn new(palette: Vec<String>, low: f64, high: f64) -> Self {
        LinearColorMapper { palette, low, high }
    }

    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    #[inline]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Color for `value`. Values outside [low, high] clamp to the palette
    /// ends; a degenerate range maps everything to the first color.
    pub fn color(&self, value: f64) -> &str {
        if self.palette.is_empty() {
            return "";
        }
        if self.high <= self.low {
            return &self.palette[0];
        }
        let t = ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0);
        let bin = ((t * self.palette.len() as f64) as usize).min(self.palette.len() - 1);
        &self.palette[bin]
    }
}

/// Styling and tooling options for the interactive heatmap.
///
/// The defaults mirror the plotting front-end this figure is handed to:
/// a 1000x550 fixed-size figure, a reversed blue palette, hover/pan/zoom
/// tools and a color-bar legend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    pub palette: Vec<String>,
    pub reverse_palette: bool,
    pub tools: String,
    pub width: u32,
    pub height: u32,
    pub x_axis_location: String,
    pub toolbar_location: String,
    pub sizing_mode: String,
    pub line_color: Option<String>,
    pub grid_line_color: Option<String>,
    pub axis_line_color: Option<String>,
    pub major_tick_line_color: Option<String>,
    pub major_label_text_font_size: String,
    pub major_label_standoff: u32,
    pub major_label_orientation: f64,
    pub colorbar: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            palette: BLUES_9.iter().map(|c| c.to_string()).collect(),
            reverse_palette: true,
            tools: "hover, pan, reset, save, wheel_zoom, zoom_in, zoom_out".to_string(),
            width: 1000,
            height: 550,
            x_axis_location: "below".to_string(),
            toolbar_location: "above".to_string(),
            sizing_mode: "fixed".to_string(),
            line_color: None,
            grid_line_color: None,
            axis_line_color: None,
            major_tick_line_color: None,
            major_label_text_font_size: "9pt".to_string(),
            major_label_standoff: 0,
            major_label_orientation: std::f64::consts::PI / 3.0,
            colorbar: true,
        }
    }
}

/// One cell of the long-format heatmap data: (topic, document, value) plus
/// the color the mapper assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub topic: String,
    pub document: String,
    pub value: f64,
    pub color: String,
}

/// Color-bar legend block attached to the right of the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub mapper: LinearColorMapper,
    pub desired_num_ticks: usize,
    pub major_label_text_font_size: String,
    pub label_standoff: u32,
}

/// A renderable heatmap figure: pure data, no pixels.
///
/// Everything a front-end needs to draw the document-topic grid: categorical
/// ranges, long-format cells with precomputed colors, tool configuration,
/// axis styling, optional hover tooltips and an optional color bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapFigure {
    pub x_range: Vec<String>,
    pub y_range: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub tools: String,
    pub x_axis_location: String,
    pub toolbar_location: String,
    pub sizing_mode: String,
    pub line_color: Option<String>,
    pub grid_line_color: Option<String>,
    pub axis_line_color: Option<String>,
    pub major_tick_line_color: Option<String>,
    pub major_label_text_font_size: String,
    pub major_label_standoff: u32,
    pub major_label_orientation: f64,
    pub mapper: LinearColorMapper,
    pub cells: Vec<HeatmapCell>,
    /// Present when `hover` is among the tools.
    pub tooltips: Option<Vec<(String, String)>>,
    pub colorbar: Option<ColorBar>,
}

/// Presentation wrapper around a document-topic matrix.
///
/// # Examples
/// ```no_run
/// use topic_tools::{HeatmapConfig, PlotDocumentTopics};
/// # fn document_topics() -> topic_tools::DocumentTopicMatrix { unimplemented!() }
///
/// let plot = PlotDocumentTopics::new(document_topics());
/// let figure = plot.interactive_heatmap(&HeatmapConfig::default());
/// println!("{} cells", figure.cells.len());
/// ```
#[derive(Debug, Clone)]
pub struct PlotDocumentTopics {
    document_topics: DocumentTopicMatrix,
}

impl PlotDocumentTopics {
    pub fn new(document_topics: DocumentTopicMatrix) -> Self {
        PlotDocumentTopics { document_topics }
    }

    #[inline]
    pub fn document_topics(&self) -> &DocumentTopicMatrix {
        &self.document_topics
    }

    /// Build the interactive heatmap figure.
    ///
    /// Reshapes the matrix into long-format (topic, document, value) cells
    /// and maps the value range linearly onto the configured palette.
    pub fn interactive_heatmap(&self, config: &HeatmapConfig) -> HeatmapFigure {
        let mut palette = config.palette.clone();
        if config.reverse_palette {
            palette.reverse();
        }

        let low = self.document_topics.min_value().unwrap_or(0.0);
        let high = self.document_topics.max_value().unwrap_or(0.0);
        let mapper = LinearColorMapper::new(palette, low, high);

        let mut cells = Vec::with_capacity(
            self.document_topics.topic_count() * self.document_topics.doc_count(),
        );
        for (topic, row) in self.document_topics.rows() {
            for (document, &value) in self.document_topics.columns().iter().zip(row) {
                cells.push(HeatmapCell {
                    topic: topic.to_string(),
                    document: document.clone(),
                    value,
                    color: mapper.color(value).to_string(),
                });
            }
        }

        let tooltips = config.tools.contains("hover").then(|| {
            vec![
                ("x-Axis".to_string(), "@Documents".to_string()),
                ("y-Axis".to_string(), "@Topics".to_string()),
                ("Score".to_string(), "@Distributions".to_string()),
            ]
        });

        let colorbar = config.colorbar.then(|| ColorBar {
            mapper: mapper.clone(),
            desired_num_ticks: mapper.palette().len(),
            major_label_text_font_size: config.major_label_text_font_size.clone(),
            label_standoff: 6,
        });

        HeatmapFigure {
            x_range: self.document_topics.columns().to_vec(),
            y_range: self.document_topics.index().to_vec(),
            width: config.width,
            height: config.height,
            tools: config.tools.clone(),
            x_axis_location: config.x_axis_location.clone(),
            toolbar_location: config.toolbar_location.clone(),
            sizing_mode: config.sizing_mode.clone(),
            line_color: config.line_color.clone(),
            grid_line_color: config.grid_line_color.clone(),
            axis_line_color: config.axis_line_color.clone(),
            major_tick_line_color: config.major_tick_line_color.clone(),
            major_label_text_font_size: config.major_label_text_font_size.clone(),
            major_label_standoff: config.major_label_standoff,
            major_label_orientation: config.major_label_orientation,
            mapper,
            cells,
            tooltips,
            colorbar,
        }
    }
}
