pub mod document;

pub use document::{DocumentQuery, ElementHandle, HtmlDocument, HtmlElement, Query};
