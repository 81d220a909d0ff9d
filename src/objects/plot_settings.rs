//! Plot settings shared by layouts and named page setups

use bitflags::bitflags;

use crate::cad_object::ObjectCommon;
use crate::types::Vector2;

bitflags! {
    /// Plot layout flags (group code 70 of AcDbPlotSettings)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PlotFlags: i16 {
        const PLOT_VIEWPORT_BORDERS = 1;
        const SHOW_PLOT_STYLES = 2;
        const PLOT_CENTERED = 4;
        const PLOT_HIDDEN = 8;
        const USE_STANDARD_SCALE = 16;
        const PLOT_PLOT_STYLES = 32;
        const SCALE_LINEWEIGHTS = 64;
        const PRINT_LINEWEIGHTS = 128;
        const DRAW_VIEWPORTS_FIRST = 512;
        const MODEL_TYPE = 1024;
        const UPDATE_PAPER = 2048;
        const ZOOM_TO_PAPER_ON_UPDATE = 4096;
        const INITIALIZING = 8192;
        const PREV_PLOT_INIT = 16384;
    }
}

/// Margins the device cannot print on, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaperMargin {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

/// The AcDbPlotSettings part of a layout or page setup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    /// Page setup name (1)
    pub page_name: String,
    /// Printer or plotter configuration (2)
    pub printer_name: String,
    /// Paper size (4)
    pub paper_size: String,
    /// Plot view name (6)
    pub plot_view_name: String,
    /// Current style sheet (7)
    pub style_sheet: String,
    /// 40-43
    pub unprintable_margin: PaperMargin,
    /// 44
    pub paper_width: f64,
    /// 45
    pub paper_height: f64,
    /// 46/47
    pub plot_origin: Vector2,
    /// 48/49
    pub window_lower_left: Vector2,
    /// 140/141
    pub window_upper_right: Vector2,
    /// Real world units of the custom print scale (142)
    pub numerator_scale: f64,
    /// Drawing units of the custom print scale (143)
    pub denominator_scale: f64,
    pub flags: PlotFlags,
    /// 0 inches, 1 millimeters, 2 pixels (72)
    pub paper_units: i16,
    /// Quarter turns (73)
    pub paper_rotation: i16,
    /// What is plotted: display, extents, limits, view, window, layout (74)
    pub plot_type: i16,
    /// Standard scale type (75)
    pub standard_scale_type: i16,
    /// 76
    pub shade_plot_mode: i16,
    /// 77
    pub shade_plot_resolution: i16,
    /// 78
    pub shade_plot_dpi: i16,
    /// Scale factor of a standard scale (147)
    pub print_scale: f64,
    /// 148/149
    pub paper_image_origin: Vector2,
}

impl PlotSettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            page_name: String::new(),
            printer_name: "none_device".to_string(),
            paper_size: String::new(),
            plot_view_name: String::new(),
            style_sheet: String::new(),
            unprintable_margin: PaperMargin::default(),
            paper_width: 0.0,
            paper_height: 0.0,
            plot_origin: Vector2::ZERO,
            window_lower_left: Vector2::ZERO,
            window_upper_right: Vector2::ZERO,
            numerator_scale: 1.0,
            denominator_scale: 1.0,
            flags: PlotFlags::empty(),
            paper_units: 0,
            paper_rotation: 0,
            plot_type: 5,
            standard_scale_type: 0,
            shade_plot_mode: 0,
            shade_plot_resolution: 2,
            shade_plot_dpi: 300,
            print_scale: 1.0,
            paper_image_origin: Vector2::ZERO,
        }
    }
}

/// A named page setup (PLOTSETTINGS object, kept in `ACAD_PLOTSETTINGS`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSetup {
    pub common: ObjectCommon,
    pub settings: PlotSettings,
}

impl PageSetup {
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            common: ObjectCommon::new(),
            settings: PlotSettings {
                page_name: page_name.into(),
                ..PlotSettings::default()
            },
        }
    }
}
