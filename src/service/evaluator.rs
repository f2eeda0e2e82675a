//! On-page SEO rules.
//!
//! `evaluate` runs every rule against a parsed document and returns the issues
//! in rule order: title, meta description, headings, images, canonical,
//! viewport, structured data. Rules never short-circuit each other and a
//! missing element is a finding, not an error.

use url::Url;

use crate::domain::models::{Issue, IssueKind};
use crate::extractor::{DocumentQuery, ElementHandle, Query};

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const META_DESCRIPTION_MIN_CHARS: usize = 120;
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

pub fn evaluate<D: DocumentQuery>(document: &D, page_url: &Url) -> Vec<Issue> {
    let mut issues = Vec::new();

    check_title(document, &mut issues);
    check_meta_description(document, &mut issues);
    check_h1(document, &mut issues);
    check_image_alt(document, &mut issues);
    check_canonical(document, &mut issues);
    check_viewport(document, &mut issues);
    check_structured_data(document, &mut issues);

    log::debug!("[EVAL] {} on-page issues for {}", issues.len(), page_url);
    issues
}

fn check_title<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    let title = document
        .find_first(Query::Title)
        .map(|el| el.text())
        .filter(|t| !t.is_empty());

    match title {
        None => issues.push(Issue::new(
            IssueKind::MissingTitle,
            "No title tag found on this page.",
        )),
        Some(title) => {
            let len = title.chars().count();
            if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
                issues.push(Issue::new(
                    IssueKind::TitleLengthOutOfRange,
                    format!(
                        "Title tag is {} characters. Optimal length is {}-{} characters.",
                        len, TITLE_MIN_CHARS, TITLE_MAX_CHARS
                    ),
                ));
            }
        }
    }
}

fn check_meta_description<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    let meta = document.find_first(Query::MetaDescription);
    let content = meta
        .as_ref()
        .and_then(|el| el.attribute("content"))
        .filter(|c| !c.is_empty());

    match content {
        None => issues.push(Issue::new(
            IssueKind::MissingMetaDescription,
            "No meta description found on this page.",
        )),
        Some(content) => {
            // Raw attribute length, no trimming.
            let len = content.chars().count();
            if !(META_DESCRIPTION_MIN_CHARS..=META_DESCRIPTION_MAX_CHARS).contains(&len) {
                issues.push(Issue::new(
                    IssueKind::MetaDescriptionLengthOutOfRange,
                    format!(
                        "Meta description is {} characters. Optimal length is {}-{} characters.",
                        len, META_DESCRIPTION_MIN_CHARS, META_DESCRIPTION_MAX_CHARS
                    ),
                ));
            }
        }
    }
}

fn check_h1<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    let count = document.find_all(Query::H1).len();
    if count == 0 {
        issues.push(Issue::new(
            IssueKind::MissingH1,
            "No H1 tag found on this page.",
        ));
    } else if count > 1 {
        issues.push(Issue::new(
            IssueKind::MultipleH1,
            format!(
                "Found {} H1 tags. Best practice is to use only one H1 per page.",
                count
            ),
        ));
    }
}

fn check_image_alt<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    // Absent and empty alt both count as missing.
    let missing = document
        .find_all(Query::Image)
        .iter()
        .filter(|img| img.attribute("alt").map(str::is_empty).unwrap_or(true))
        .count();

    if missing > 0 {
        issues.push(Issue::new(
            IssueKind::ImagesMissingAlt,
            format!("{} images are missing alt text attributes.", missing),
        ));
    }
}

fn check_canonical<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    if !document.exists(Query::Canonical) {
        issues.push(Issue::new(
            IssueKind::MissingCanonical,
            "No canonical URL specified for this page.",
        ));
    }
}

fn check_viewport<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    if !document.exists(Query::Viewport) {
        issues.push(Issue::new(
            IssueKind::MissingViewport,
            "No viewport meta tag found, affecting mobile responsiveness.",
        ));
    }
}

fn check_structured_data<D: DocumentQuery>(document: &D, issues: &mut Vec<Issue>) {
    if !document.exists(Query::JsonLd) && !document.exists(Query::Microdata) {
        issues.push(Issue::new(
            IssueKind::MissingStructuredData,
            "No structured data (Schema.org) markup found.",
        ));
    }
}
