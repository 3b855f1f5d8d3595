//! Page geometry used by the estimator and the print engine

/// CSS pixels per inch
pub const PX_PER_INCH: f64 = 96.0;

/// Length in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from CSS pixels
    pub fn from_px(px: f64) -> Self {
        Length(px)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * PX_PER_INCH)
    }

    /// Get the value in CSS pixels
    pub fn px(&self) -> f64 {
        self.0
    }

    /// Get the value in inches
    pub fn inches(&self) -> f64 {
        self.0 / PX_PER_INCH
    }
}

/// Constants the page estimator works with
///
/// All values are CSS pixels. The defaults describe an A4 sheet at 96 DPI
/// with the spacing used by the spec sheet templates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Height of one printed page
    pub page_height: Length,
    /// Space reserved at the top of the first page
    pub first_page_margin: Length,
    /// Gap required between the last section and the page bottom
    pub section_margin: Length,
    /// Padding added to every measured section height
    pub section_padding: Length,
}

impl PageGeometry {
    /// A4 at 96 DPI
    pub fn a4() -> Self {
        Self {
            page_height: Length::from_px(1122.0),
            first_page_margin: Length::from_px(250.0),
            section_margin: Length::from_px(130.0),
            section_padding: Length::from_px(40.0),
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Paper size handed to the print engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width: Length,
    pub height: Length,
}

impl PaperSize {
    /// Wide landscape-style sheet the templates are designed for
    pub fn spec_sheet() -> Self {
        Self {
            width: Length::from_px(1440.0),
            height: Length::from_inches(11.0),
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::spec_sheet()
    }
}
