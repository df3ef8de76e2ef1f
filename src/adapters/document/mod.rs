//! Document adapters - PDF rendering for the four member document templates.
//!
//! - `PdfDocumentRenderer` - Implements `DocumentRenderer` on top of a
//!   small single-page PDF writer using the built-in Helvetica fonts.

mod pdf_renderer;
mod pdf_writer;

pub use pdf_renderer::PdfDocumentRenderer;
pub use pdf_writer::{Font, PdfPage};
