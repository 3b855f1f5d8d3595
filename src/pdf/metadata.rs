//! Physical page counting

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = doc.catalog()?;

    let pages_id = match catalog.get(b"Pages") {
        Ok(Object::Reference(id)) => *id,
        Ok(_) => return Err(Error::General("Pages is not a reference".to_string())),
        Err(_) => return Err(Error::General("No Pages in catalog".to_string())),
    };

    let pages_dict = doc.get_dictionary(pages_id)?;

    match pages_dict.get(b"Count") {
        Ok(Object::Integer(n)) if *n >= 0 => Ok(*n as usize),
        Ok(_) => Err(Error::General("Count is not a valid integer".to_string())),
        Err(_) => Err(Error::General("No Count in Pages".to_string())),
    }
}

/// Physical page count of a loaded document
///
/// Prefers the catalog's Count and walks the page tree when the catalog
/// is malformed.
pub fn page_count(doc: &Document) -> Result<usize> {
    let count = count_pages_from_catalog(doc).unwrap_or_else(|_| doc.get_pages().len());

    if count == 0 {
        return Err(Error::EmptyPdf);
    }

    Ok(count)
}

/// Count the pages of a PDF held in memory
pub fn count_pages_in_memory(bytes: &[u8]) -> Result<usize> {
    let doc = Document::load_mem(bytes)?;
    page_count(&doc)
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    page_count(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::blank_pdf;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_count_pages_in_memory() {
        assert_eq!(count_pages_in_memory(&blank_pdf(4)).unwrap(), 4);
    }

    #[test]
    fn test_count_rejects_garbage() {
        assert!(count_pages_in_memory(b"not a pdf").is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            count_pages_in_memory(&blank_pdf(0)),
            Err(Error::EmptyPdf)
        ));
    }
}
