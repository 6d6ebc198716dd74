//! HTML parsing for the trellis editing core.
//!
//! Parses HTML (or XHTML) with html5ever into a [`trellis_dom::BaseDocument`], either as a whole
//! document or as a fragment appended below an editable root.

mod html_document;
mod html_sink;

pub use html_document::HtmlDocument;
pub use html_sink::{HtmlSink, append_html, parse_document};
