//! XML variant: `esearch` id lists and `efetch` article sets.
//!
//! Articles are located block by block and each field is found with its own
//! pattern, so one damaged article never hides the others.

use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::{clean_text, extract_year, is_review_type};
use crate::models::{format_author_list, Citation, CitationBuilder};

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid XML pattern"))
        }
    };
}

static_regex!(id_regex, r"<Id>\s*(\d+)\s*</Id>");
static_regex!(article_regex, r"(?s)<PubmedArticle\b[^>]*>.*?</PubmedArticle>");
static_regex!(pmid_regex, r"<PMID\b[^>]*>\s*(\d+)\s*</PMID>");
static_regex!(title_regex, r"(?s)<ArticleTitle\b[^>]*>(.*?)</ArticleTitle>");
static_regex!(journal_regex, r"(?s)<Journal>.*?<Title>(.*?)</Title>");
static_regex!(pub_date_regex, r"(?s)<PubDate>(.*?)</PubDate>");
static_regex!(year_regex, r"<Year>\s*(\d{4})\s*</Year>");
static_regex!(medline_date_regex, r"<MedlineDate>([^<]*)</MedlineDate>");
static_regex!(pub_type_regex, r"<PublicationType\b[^>]*>([^<]*)</PublicationType>");
static_regex!(author_regex, r"(?s)<Author\b[^>]*>(.*?)</Author>");
static_regex!(last_name_regex, r"<LastName>([^<]*)</LastName>");
static_regex!(initials_regex, r"<Initials>([^<]*)</Initials>");
static_regex!(collective_regex, r"(?s)<CollectiveName>(.*?)</CollectiveName>");
static_regex!(
    doi_regex,
    r#"<ArticleId\s+IdType\s*=\s*["']doi["']\s*>([^<]+)</ArticleId>"#
);
static_regex!(
    elocation_doi_regex,
    r#"<ELocationID\s+EIdType\s*=\s*["']doi["'][^>]*>([^<]+)</ELocationID>"#
);

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ESearchResult {
    IdList: Option<IdList>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct IdList {
    #[serde(rename = "Id", default)]
    ids: Vec<String>,
}

/// Identifiers from an `esearch` XML body
pub fn parse_search_ids(body: &str) -> Vec<String> {
    match from_str::<ESearchResult>(body) {
        Ok(result) => result
            .IdList
            .map(|list| list.ids.into_iter().map(|id| id.trim().to_string()).collect())
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!("esearch XML did not decode ({}), scanning text for ids", e);
            let mut ids: Vec<String> = Vec::new();
            for caps in id_regex().captures_iter(body) {
                let id = caps[1].to_string();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            ids
        }
    }
}

/// Citations from an `efetch` XML body; articles without a title are dropped
pub fn parse_articles(body: &str) -> Vec<Citation> {
    article_regex()
        .find_iter(body)
        .filter_map(|block| {
            let citation = parse_article(block.as_str());
            if citation.is_none() {
                tracing::debug!("Skipping article without a title");
            }
            citation
        })
        .collect()
}

fn parse_article(block: &str) -> Option<Citation> {
    let title = first_capture(title_regex(), block)
        .map(clean_text)
        .filter(|t| !t.is_empty())?;

    let mut builder = CitationBuilder::new(title);

    if let Some(pmid) = first_capture(pmid_regex(), block) {
        builder = builder.pmid(pmid);
    }

    if let Some(journal) = first_capture(journal_regex(), block).map(clean_text) {
        builder = builder.journal(journal);
    }

    let year = first_capture(pub_date_regex(), block).and_then(|date| {
        first_capture(year_regex(), date)
            .map(str::to_string)
            .or_else(|| first_capture(medline_date_regex(), date).and_then(extract_year))
    });

    let is_review = pub_type_regex()
        .captures_iter(block)
        .any(|caps| is_review_type(&caps[1]));

    let doi = first_capture(doi_regex(), block)
        .or_else(|| first_capture(elocation_doi_regex(), block))
        .map(|d| d.trim().to_string());

    Some(
        builder
            .authors(parse_authors(block))
            .year(year)
            .review(is_review)
            .doi(doi)
            .build(),
    )
}

fn parse_authors(block: &str) -> String {
    let names: Vec<String> = author_regex()
        .captures_iter(block)
        .filter_map(|caps| {
            let author = caps.get(1)?.as_str();
            let last = first_capture(last_name_regex(), author).map(clean_text);
            let initials = first_capture(initials_regex(), author).map(clean_text);
            match (last, initials) {
                (Some(last), Some(initials)) if !initials.is_empty() => {
                    Some(format!("{} {}", last, initials))
                }
                (Some(last), _) => Some(last),
                (None, _) => first_capture(collective_regex(), author).map(clean_text),
            }
        })
        .filter(|name| !name.is_empty())
        .collect();

    format_author_list(&names)
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
