use scraper::Html;

use super::helpers::{first_attr, first_inline_text, inline_text, non_empty, profile_links, selector};
use crate::error::ScraperError;
use crate::normalize::id_from_path;
use crate::types::ScrapedTeacher;

const TEACHER_PHOTO_PREFIX: &str = "https://media.dharmaseed.org/uploads/photos/teacher";

/// Parses a teacher detail page (`/teacher/{id}`).
///
/// The page has no machine-readable id, so the caller passes the one it
/// requested. `name` is empty if the page has no `.talkteacher b` heading.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] only if a built-in selector fails to
/// compile.
pub fn parse_teacher(html: &str, teacher_id: i64) -> Result<ScrapedTeacher, ScraperError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let name = first_inline_text(root, &selector(".talkteacher b")?).unwrap_or_default();
    let description = root
        .select(&selector("td[align=left] i")?)
        .next()
        .and_then(|el| non_empty(el.text().collect::<String>().trim().to_owned()));
    let profile_image_url = first_attr(root, &selector("td[align=center] img")?, "src");
    let (website_url, donation_url) =
        profile_links(root, &selector(".donate-website-button a")?);

    Ok(ScrapedTeacher {
        dharma_seed_id: teacher_id,
        name,
        description,
        profile_image_url,
        website_url,
        donation_url,
    })
}

/// Parses one page of the teacher list (`/teachers/`).
///
/// Entries without a name or a numeric id in their profile link are skipped.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] only if a built-in selector fails to
/// compile.
pub fn parse_teachers(html: &str) -> Result<Vec<ScrapedTeacher>, ScraperError> {
    let document = Html::parse_document(html);
    let table_sel = selector(".talklist > table")?;
    let link_sel = selector("a.talkteacher")?;
    let name_sel = selector("b")?;
    let description_sel = selector("td i")?;
    let photo_sel = selector(&format!("img[src^=\"{TEACHER_PHOTO_PREFIX}\"]"))?;
    let profile_link_sel = selector(".donate-website-button a")?;

    let mut teachers = Vec::new();
    for table in document.select(&table_sel) {
        let Some(link) = table.select(&link_sel).next() else {
            continue;
        };
        let name = link
            .select(&name_sel)
            .next()
            .map(inline_text)
            .unwrap_or_default();
        let dharma_seed_id = link.value().attr("href").and_then(id_from_path);

        let Some(dharma_seed_id) = dharma_seed_id.filter(|_| !name.is_empty()) else {
            tracing::warn!(
                name = %name,
                href = ?link.value().attr("href"),
                "skipping teacher entry without a name or id"
            );
            continue;
        };

        let description = first_inline_text(table, &description_sel);
        let profile_image_url = first_attr(table, &photo_sel, "src");
        let (website_url, donation_url) = profile_links(table, &profile_link_sel);

        teachers.push(ScrapedTeacher {
            dharma_seed_id,
            name,
            description,
            profile_image_url,
            website_url,
            donation_url,
        });
    }

    Ok(teachers)
}

#[cfg(test)]
#[path = "teachers_test.rs"]
mod tests;
