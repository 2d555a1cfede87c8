use scraper::{ElementRef, Html, Selector};

use super::helpers::{first_attr, first_inline_text, inline_text, non_empty, raw_text, selector};
use crate::error::ScraperError;
use crate::normalize::{center_subdomain, id_from_path, is_retreat_link, retreat_id_from_url};
use crate::types::ScrapedTalk;

struct TalkSelectors {
    table: Selector,
    row: Selector,
    title_link: Selector,
    teacher_link: Selector,
    time: Selector,
    description: Selector,
    audio_link: Selector,
    anchor: Selector,
}

impl TalkSelectors {
    fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            table: selector(".talklist > table")?,
            row: selector("tr")?,
            title_link: selector("a.talkteacher")?,
            teacher_link: selector(".talkteacher")?,
            time: selector("i")?,
            description: selector(".talk-description")?,
            audio_link: selector(".talkbutton a")?,
            anchor: selector("a")?,
        })
    }
}

#[derive(Default)]
struct Links {
    center: Option<String>,
    center_url: Option<String>,
    retreat: Option<String>,
    retreat_url: Option<String>,
    text: String,
}

/// Parses every talk on a talk listing page.
///
/// Each `.talklist > table` holds one talk: a title row (date, title link,
/// duration in `<i>`), a teacher row, an optional `.talk-description` row,
/// and a links row with up to two anchors. A link whose target contains
/// `/retreats/` is the retreat; the other one is the center.
///
/// Tables missing the talk id, title, teacher, duration or date are skipped
/// with a warning.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] only if a built-in selector fails to
/// compile.
pub fn parse_talks(html: &str) -> Result<Vec<ScrapedTalk>, ScraperError> {
    let document = Html::parse_document(html);
    let sel = TalkSelectors::new()?;

    Ok(document
        .select(&sel.table)
        .filter_map(|table| parse_talk_table(table, &sel))
        .collect())
}

fn parse_talk_table(table: ElementRef<'_>, sel: &TalkSelectors) -> Option<ScrapedTalk> {
    let rows: Vec<ElementRef<'_>> = table.select(&sel.row).collect();
    let title_row = rows.first().copied();
    let teacher_row = rows.get(1).copied();
    let description_row = rows
        .get(2)
        .copied()
        .filter(|row| row.select(&sel.description).next().is_some());
    let links_row = rows
        .get(if description_row.is_some() { 3 } else { 2 })
        .copied();

    let title_link = title_row.and_then(|row| row.select(&sel.title_link).next());
    let title = title_link.map(inline_text).unwrap_or_default();
    let talk_id = title_link
        .and_then(|link| link.value().attr("href"))
        .and_then(id_from_path);

    let teacher_link = teacher_row.and_then(|row| row.select(&sel.teacher_link).next());
    let teacher = teacher_link.map(inline_text).unwrap_or_default();
    let teacher_url = teacher_link
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| non_empty(href.trim().to_owned()));
    let teacher_id = teacher_url.as_deref().and_then(id_from_path);

    let time = title_row
        .and_then(|row| first_inline_text(row, &sel.time))
        .unwrap_or_default();
    let date = title_row
        .map(raw_text)
        .and_then(|text| text.split_whitespace().next().map(str::to_owned))
        .unwrap_or_default();

    let description = description_row
        .and_then(|row| row.select(&sel.description).next())
        .and_then(|el| non_empty(raw_text(el)));

    let audio_url = first_attr(table, &sel.audio_link, "href");
    let links = links_row
        .map(|row| classify_links(row, sel, audio_url.as_deref()))
        .unwrap_or_default();

    let Some(talk_id) = talk_id.filter(|_| {
        !title.is_empty() && !teacher.is_empty() && !time.is_empty() && !date.is_empty()
    }) else {
        tracing::warn!(
            talk_id = ?talk_id,
            title = %title,
            teacher = %teacher,
            time = %time,
            date = %date,
            "skipping talk row with missing required fields"
        );
        return None;
    };

    let retreat_id = links.retreat_url.as_deref().and_then(retreat_id_from_url);
    if retreat_unresolved(&links, retreat_id) {
        tracing::warn!(
            talk_id,
            title = %title,
            links_text = %links.text,
            retreat_url = ?links.retreat_url,
            "links row mentions a retreat but no retreat id could be parsed"
        );
    }

    Some(ScrapedTalk {
        talk_id,
        title,
        teacher,
        teacher_url,
        teacher_id,
        description,
        center_subdomain: links.center_url.as_deref().and_then(center_subdomain),
        center: links.center,
        center_url: links.center_url,
        retreat: links.retreat,
        retreat_url: links.retreat_url,
        retreat_id,
        date,
        time,
        audio_url,
    })
}

/// True when the links row points at a retreat we could not identify:
/// a `/retreats/` anchor without a numeric id, or a mention of a retreat
/// outside the center's own name.
fn retreat_unresolved(links: &Links, retreat_id: Option<i64>) -> bool {
    if retreat_id.is_some() {
        return false;
    }
    if links.retreat_url.is_some() {
        return true;
    }
    let rest = match links.center.as_deref() {
        Some(center) => links.text.replacen(center, "", 1),
        None => links.text.clone(),
    };
    rest.to_lowercase().contains("retreat")
}

fn classify_links(row: ElementRef<'_>, sel: &TalkSelectors, audio_url: Option<&str>) -> Links {
    let mut links = Links {
        text: inline_text(row),
        ..Links::default()
    };

    for anchor in row.select(&sel.anchor) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || Some(href) == audio_url {
            continue;
        }

        if is_retreat_link(href) {
            if links.retreat_url.is_none() {
                // The retreat name is often wrapped in <i>.
                links.retreat =
                    first_inline_text(anchor, &sel.time).or_else(|| non_empty(inline_text(anchor)));
                links.retreat_url = Some(href.to_owned());
            }
        } else if links.center_url.is_none() {
            links.center = non_empty(inline_text(anchor));
            links.center_url = Some(href.to_owned());
        }
    }

    links
}

#[cfg(test)]
#[path = "talks_test.rs"]
mod tests;
