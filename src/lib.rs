//! Spec Sheet PDF Library
//!
//! Converts HTML specification sheets into PDFs and trims the trailing
//! blank pages a headless-browser print leaves behind.
//! This library provides functionality to:
//! - Render HTML with headless Chromium and print it to PDF
//! - Estimate the last page that holds content from measured section heights
//! - Trim a PDF to its leading pages
//! - Count the physical pages of a PDF
//!
//! # Example
//!
//! ```no_run
//! use specsheet_pdf::convert::{convert_html, ConvertOptions};
//! use specsheet_pdf::render::{Renderer, RendererOptions};
//!
//! let renderer = Renderer::launch(&RendererOptions::default())
//!     .expect("Failed to launch browser");
//! let html = std::fs::read_to_string("sheet.html").unwrap();
//! let conversion = convert_html(&renderer, &html, &ConvertOptions::default())
//!     .expect("Failed to convert");
//! std::fs::write("sheet.pdf", &conversion.pdf).unwrap();
//! ```

pub mod convert;
pub mod error;
pub mod estimate;
pub mod layout;
pub mod pdf;
pub mod render;

// Re-export commonly used items
pub use error::{Error, Result};
pub use estimate::{estimate_pages, ContentGroup, PaginationPlan, Section};
pub use layout::{PageGeometry, PaperSize};
