//! HTML to trimmed PDF conversion

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::estimate::{estimate_pages, PaginationPlan};
use crate::layout::{PageGeometry, PaperSize};
use crate::pdf::{count_pages_in_memory, resolve_last_page, trim_pdf};
use crate::render::Renderer;

/// Options for converting a document
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Geometry the estimator paginates against
    pub geometry: PageGeometry,
    /// Paper size handed to the print engine
    pub paper: PaperSize,
    /// Containers whose sections are paginated
    pub group_selector: String,
    /// Decorative elements removed before measuring
    pub divider_selector: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            paper: PaperSize::default(),
            group_selector: ".frame-19".to_string(),
            divider_selector: ".divider".to_string(),
        }
    }
}

/// A converted document
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Trimmed PDF bytes
    pub pdf: Vec<u8>,
    /// Estimator result, 0 when the fallback was used
    pub estimate: u32,
    /// Pages the browser actually printed
    pub physical_pages: usize,
    /// Pages in the trimmed output
    pub pages: usize,
}

/// Trim a rendered PDF to the estimated last page
///
/// A zero estimate falls back to the physical page count, so the output
/// keeps every rendered page.
pub fn trim_to_estimate(rendered: &[u8], estimate: u32) -> Result<Conversion> {
    let physical_pages = count_pages_in_memory(rendered)?;
    if estimate == 0 {
        warn!(physical_pages, "no usable page estimate, keeping all rendered pages");
    }

    let pages = resolve_last_page(estimate, physical_pages);
    let pdf = trim_pdf(rendered, pages)?;

    Ok(Conversion {
        pdf,
        estimate,
        physical_pages,
        pages,
    })
}

/// Render one HTML document and trim its trailing pages
pub fn convert_html(renderer: &Renderer, html: &str, options: &ConvertOptions) -> Result<Conversion> {
    let page = renderer.open(html)?;

    page.normalize(&options.group_selector, &options.divider_selector)?;

    let plan = match page.measure(&options.group_selector) {
        Ok(groups) => estimate_pages(&groups, &options.geometry),
        Err(e @ (Error::Measurement(_) | Error::Json(_))) => {
            warn!("measurement failed: {}", e);
            PaginationPlan::default()
        }
        Err(e) => return Err(e),
    };

    if !plan.page_breaks.is_empty() {
        let applied = page.apply_page_breaks(&options.group_selector, &plan.page_breaks)?;
        if applied != plan.page_breaks.len() {
            warn!(
                expected = plan.page_breaks.len(),
                applied, "some page breaks could not be applied"
            );
        }
    }

    let rendered = page.print(&options.paper)?;
    drop(page);

    let conversion = trim_to_estimate(&rendered, plan.last_page)?;
    info!(
        estimate = conversion.estimate,
        physical = conversion.physical_pages,
        pages = conversion.pages,
        "converted document"
    );

    Ok(conversion)
}

/// List the `*.html` files directly inside `dir`, sorted by path
pub fn find_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::InvalidGlob(dir.display().to_string()))?;
    let pattern = format!("{}/*.html", Pattern::escape(dir_str));

    let mut paths = Vec::new();
    for entry in glob(&pattern).map_err(|e| Error::InvalidGlob(e.to_string()))? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("glob error for {}: {}", pattern, e),
        }
    }

    paths.sort();
    Ok(paths)
}

/// Convert every HTML file in `dir`, writing each PDF next to its source
///
/// Files are processed one at a time and the first error stops the run.
/// `on_written` is called after each PDF is saved.
pub fn convert_directory<F>(
    renderer: &Renderer,
    dir: &Path,
    options: &ConvertOptions,
    mut on_written: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, &Conversion),
{
    let mut written = Vec::new();

    for html_path in find_html_files(dir)? {
        let html = fs::read_to_string(&html_path)?;
        let conversion = convert_html(renderer, &html, options)?;

        let pdf_path = html_path.with_extension("pdf");
        fs::write(&pdf_path, &conversion.pdf)?;

        on_written(&pdf_path, &conversion);
        written.push(pdf_path);
    }

    Ok(written)
}
