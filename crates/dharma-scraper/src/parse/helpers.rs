use scraper::{ElementRef, Selector};

use crate::error::ScraperError;

pub(crate) fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_owned(),
        reason: e.to_string(),
    })
}

/// All descendant text of `element`, trimmed.
pub(crate) fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Descendant text with every whitespace run collapsed to one space.
pub(crate) fn inline_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn first_inline_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .and_then(|n| non_empty(inline_text(n)))
}

pub(crate) fn first_attr(element: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    element
        .select(sel)
        .next()
        .and_then(|n| n.value().attr(attr))
        .and_then(|v| non_empty(v.trim().to_owned()))
}

/// Website and donation links from a `.donate-website-button` group,
/// classified by their visible text.
pub(crate) fn profile_links(
    element: ElementRef<'_>,
    links: &Selector,
) -> (Option<String>, Option<String>) {
    let mut website_url = None;
    let mut donation_url = None;

    for link in element.select(links) {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        let text = inline_text(link).to_lowercase();
        if text.contains("donate") {
            donation_url = Some(href.to_owned());
        } else if text.contains("website") {
            website_url = Some(href.to_owned());
        }
    }

    (website_url, donation_url)
}
