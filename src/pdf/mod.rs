//! PDF manipulation module

pub mod metadata;
pub mod trim;

// Re-export commonly used items
pub use metadata::{count_pages, count_pages_in_memory, page_count};
pub use trim::{resolve_last_page, trim_document, trim_file, trim_pdf, TrimOptions};
