//! Dropping trailing pages using lopdf

use std::path::PathBuf;
use lopdf::Document;
use tracing::debug;
use crate::error::{Error, Result};
use crate::pdf::metadata::page_count;

/// Options for trimming a PDF file on disk
#[derive(Debug, Clone)]
pub struct TrimOptions {
    /// Input PDF file path
    pub input_path: PathBuf,
    /// Output PDF file path
    pub output_path: PathBuf,
    /// Last page to keep (1-based, inclusive)
    pub last_page: usize,
}

/// Pick the page to trim after
///
/// A zero estimate means the layout could not be measured, so every
/// rendered page is kept. A positive estimate never exceeds what was
/// actually rendered.
pub fn resolve_last_page(estimate: u32, physical_pages: usize) -> usize {
    if estimate == 0 {
        physical_pages
    } else {
        (estimate as usize).min(physical_pages)
    }
}

/// Keep pages `1..=last_page` of a loaded document
///
/// Returns the number of pages left in the document.
pub fn trim_document(doc: &mut Document, last_page: usize) -> Result<usize> {
    if last_page == 0 {
        return Err(Error::InvalidPageCount(last_page));
    }

    let total = page_count(doc)?;
    if last_page >= total {
        return Ok(total);
    }

    let doomed: Vec<u32> = doc
        .get_pages()
        .into_keys()
        .filter(|&number| number as usize > last_page)
        .collect();

    debug!(total, last_page, removed = doomed.len(), "trimming pages");

    doc.delete_pages(&doomed);
    doc.prune_objects();

    Ok(last_page)
}

/// Keep pages `1..=last_page` of a PDF held in memory
///
/// # Example
///
/// ```no_run
/// use specsheet_pdf::pdf::trim_pdf;
///
/// let rendered = std::fs::read("sheet.pdf").unwrap();
/// let trimmed = trim_pdf(&rendered, 2).expect("Failed to trim");
/// std::fs::write("sheet-trimmed.pdf", trimmed).unwrap();
/// ```
pub fn trim_pdf(bytes: &[u8], last_page: usize) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)?;
    trim_document(&mut doc, last_page)?;

    doc.compress();
    let mut output = Vec::new();
    doc.save_to(&mut output)?;

    Ok(output)
}

/// Trim a PDF file on disk
pub fn trim_file(options: &TrimOptions) -> Result<usize> {
    if !options.input_path.exists() {
        return Err(Error::FileNotFound(options.input_path.clone()));
    }

    let mut doc = Document::load(&options.input_path)?;
    let kept = trim_document(&mut doc, options.last_page)?;

    doc.compress();
    doc.save(&options.output_path)?;

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::count_pages_in_memory;
    use crate::pdf::test_support::{blank_pdf, page_widths};

    #[test]
    fn test_resolve_last_page() {
        assert_eq!(resolve_last_page(0, 5), 5);
        assert_eq!(resolve_last_page(3, 5), 3);
        assert_eq!(resolve_last_page(9, 5), 5);
    }

    #[test]
    fn test_trim_keeps_leading_pages_in_order() {
        let trimmed = trim_pdf(&blank_pdf(5), 2).unwrap();

        assert_eq!(count_pages_in_memory(&trimmed).unwrap(), 2);
        assert_eq!(page_widths(&trimmed), vec![100, 101]);
    }

    #[test]
    fn test_trim_past_end_keeps_everything() {
        let trimmed = trim_pdf(&blank_pdf(3), 10).unwrap();

        assert_eq!(page_widths(&trimmed), vec![100, 101, 102]);
    }

    #[test]
    fn test_trim_to_zero_is_rejected() {
        assert!(matches!(
            trim_pdf(&blank_pdf(3), 0),
            Err(Error::InvalidPageCount(0))
        ));
    }

    #[test]
    fn test_trim_file_nonexistent() {
        let options = TrimOptions {
            input_path: PathBuf::from("nonexistent.pdf"),
            output_path: PathBuf::from("out.pdf"),
            last_page: 1,
        };

        assert!(matches!(trim_file(&options), Err(Error::FileNotFound(_))));
    }
}
