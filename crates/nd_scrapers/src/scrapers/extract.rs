use scraper::{ElementRef, Html, Selector};
use nd_core::{Error, RawArticle, Result};
use url::Url;

pub const UNTITLED: &str = "— بدون عنوان —";

/// Separator between paragraphs in the extracted body.
pub const PARAGRAPH_BREAK: &str = "<br>";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {}: {:?}", css, e)))
}

fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    clean(&element.text().collect::<String>())
}

fn meta_content(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(document
        .select(&selector(css)?)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string))
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(document
        .select(&selector(css)?)
        .map(element_text)
        .find(|text| !text.is_empty()))
}

/// Resolves the `href` of the first element matching `css` against `base`.
pub fn select_link(html: &str, css: &str, base: &Url) -> Result<Url> {
    let document = Html::parse_document(html);
    let href = document
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| Error::Scraping(format!("Selector {} matched nothing on {}", css, base)))?
        .value()
        .attr("href")
        .ok_or_else(|| Error::Scraping(format!("Top link on {} has no href", base)))?;
    base.join(href.trim())
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", href, e)))
}

pub fn extract_title(document: &Html) -> Result<String> {
    if let Some(title) = meta_content(document, "meta[property='og:title']")? {
        return Ok(clean(&title));
    }
    for css in ["h1", "title"] {
        if let Some(title) = first_text(document, css)? {
            return Ok(title);
        }
    }
    Ok(UNTITLED.to_string())
}

/// Paragraphs inside `<article>` when present, otherwise every paragraph.
pub fn extract_text(document: &Html) -> Result<String> {
    for css in ["article p", "p"] {
        let paragraphs: Vec<String> = document
            .select(&selector(css)?)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return Ok(paragraphs.join(PARAGRAPH_BREAK));
        }
    }
    Ok(String::new())
}

pub fn extract_top_image(document: &Html, page: &Url) -> Result<Option<Url>> {
    Ok(meta_content(document, "meta[property='og:image']")?.and_then(|src| page.join(&src).ok()))
}

pub fn extract_publish_date(document: &Html) -> Result<Option<String>> {
    if let Some(published) = meta_content(document, "meta[property='article:published_time']")? {
        return Ok(Some(published));
    }
    Ok(document
        .select(&selector("time[datetime]")?)
        .filter_map(|time| time.value().attr("datetime"))
        .map(str::trim)
        .find(|datetime| !datetime.is_empty())
        .map(str::to_string))
}

pub fn extract_article(html: &str, url: &Url, source: &str) -> Result<RawArticle> {
    let document = Html::parse_document(html);
    let text = extract_text(&document)?;
    if text.is_empty() {
        return Err(Error::Scraping(format!("No article text found at {}", url)));
    }

    Ok(RawArticle {
        url: url.clone(),
        title: extract_title(&document)?,
        text,
        source: source.to_string(),
        top_img: extract_top_image(&document, url)?,
        publish_dt: extract_publish_date(&document)?,
    })
}
