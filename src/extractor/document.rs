//! Query capability over a parsed page.
//!
//! The rule evaluator only talks to `DocumentQuery`/`ElementHandle`, so any
//! parser can back it. `HtmlDocument` is the `scraper` implementation used by
//! the analyzer.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// The fixed set of lookups the SEO rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Title,
    MetaDescription,
    H1,
    Image,
    Canonical,
    Viewport,
    JsonLd,
    Microdata,
    Anchor,
}

impl Query {
    const COUNT: usize = 9;

    /// CSS selector equivalent of this lookup.
    pub fn css(&self) -> &'static str {
        match self {
            Query::Title => "title",
            Query::MetaDescription => "meta[name='description']",
            Query::H1 => "h1",
            Query::Image => "img",
            Query::Canonical => "link[rel='canonical']",
            Query::Viewport => "meta[name='viewport']",
            Query::JsonLd => "script[type='application/ld+json']",
            Query::Microdata => "[itemscope]",
            Query::Anchor => "a[href]",
        }
    }

    fn selector(self) -> &'static Selector {
        static SELECTORS: [OnceLock<Selector>; Query::COUNT] = [const { OnceLock::new() }; Query::COUNT];
        SELECTORS[self as usize].get_or_init(|| Selector::parse(self.css()).unwrap())
    }
}

pub trait ElementHandle {
    /// Text content, trimmed.
    fn text(&self) -> String;

    fn attribute(&self, name: &str) -> Option<&str>;
}

pub trait DocumentQuery {
    type Element<'a>: ElementHandle
    where
        Self: 'a;

    fn find_all(&self, query: Query) -> Vec<Self::Element<'_>>;

    fn find_first(&self, query: Query) -> Option<Self::Element<'_>> {
        self.find_all(query).into_iter().next()
    }

    fn exists(&self, query: Query) -> bool {
        self.find_first(query).is_some()
    }
}

/// A page parsed with `scraper`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HtmlElement<'a>(ElementRef<'a>);

impl ElementHandle for HtmlElement<'_> {
    fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }
}

impl DocumentQuery for HtmlDocument {
    type Element<'a> = HtmlElement<'a>;

    fn find_all(&self, query: Query) -> Vec<HtmlElement<'_>> {
        self.html.select(query.selector()).map(HtmlElement).collect()
    }

    fn find_first(&self, query: Query) -> Option<HtmlElement<'_>> {
        self.html.select(query.selector()).next().map(HtmlElement)
    }
}
