//! Integration tests for biocite
//!
//! These tests run the full citation pipeline against a mocked
//! E-utilities service.

use biocite::config::PubmedConfig;
use biocite::models::SearchOptions;
use biocite::strategy::MockStrategy;
use biocite::utils::format_citations;
use biocite::CitationPipeline;
use mockito::{Matcher, Server};
use std::sync::Arc;

const ESEARCH_JSON: &str = r#"{
    "header": {"type": "esearch", "version": "0.3"},
    "esearchresult": {"count": "3", "retmax": "3", "retstart": "0", "idlist": ["101", "102", "103"]}
}"#;

const ESUMMARY_JSON: &str = r#"{
    "result": {
        "uids": ["101", "102", "103"],
        "101": {
            "uid": "101", "pubdate": "2001 Jan", "source": "Cell",
            "title": "An old primary study of BRCA1",
            "authors": [{"name": "Old A"}], "pubtype": ["Journal Article"]
        },
        "102": {
            "uid": "102", "pubdate": "2002 Feb", "source": "Nat Rev Cancer",
            "title": "BRCA1 and PALB2 in homologous recombination: a review",
            "authors": [{"name": "Smith J"}, {"name": "Doe A"}, {"name": "Roe B"}, {"name": "Poe C"}],
            "pubtype": ["Journal Article", "Review"]
        },
        "103": {
            "uid": "103", "pubdate": "2003", "source": "Lancet",
            "title": "Newer primary study",
            "authors": [], "pubtype": ["Journal Article"]
        }
    }
}"#;

const ESEARCH_XML: &str =
    "<eSearchResult><Count>1</Count><IdList><Id>201</Id></IdList></eSearchResult>";

const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
  <MedlineCitation>
    <PMID Version="1">201</PMID>
    <Article>
      <Journal>
        <JournalIssue><PubDate><Year>2022</Year></PubDate></JournalIssue>
        <Title>Movement Disorders</Title>
      </Journal>
      <ArticleTitle>LRRK2 kinase activity in Parkinson&apos;s disease.</ArticleTitle>
      <AuthorList><Author><LastName>Lee</LastName><Initials>K</Initials></Author></AuthorList>
      <PublicationTypeList><PublicationType>Journal Article</PublicationType></PublicationTypeList>
    </Article>
  </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

fn test_config(base_url: &str) -> Arc<PubmedConfig> {
    let mut config = PubmedConfig::default();
    config.base_url = base_url.to_string();
    config.api_key = None;
    config.max_retries = 2;
    config.delay_with_key_ms = 0;
    config.delay_without_key_ms = 0;
    config.retry.base_delay_ms = 1;
    config.retry.rate_limit_floor_ms = 5;
    config.retry.max_jitter_ms = 0;
    Arc::new(config)
}

fn retmode(mode: &str) -> Matcher {
    Matcher::UrlEncoded("retmode".into(), mode.into())
}

#[tokio::test]
async fn test_json_path_ranks_and_truncates() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            retmode("json"),
            Matcher::UrlEncoded("retmax".into(), "4".into()),
        ]))
        .with_body(ESEARCH_JSON)
        .expect(1)
        .create_async()
        .await;
    let summary = server
        .mock("GET", "/esummary.fcgi")
        .match_query(Matcher::UrlEncoded("id".into(), "101,102,103".into()))
        .with_body(ESUMMARY_JSON)
        .expect(1)
        .create_async()
        .await;
    let xml_search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(retmode("xml"))
        .expect(0)
        .create_async()
        .await;

    let pipeline = CitationPipeline::new(test_config(&server.url())).unwrap();
    let options = SearchOptions::default().max_citations(2).max_age_years(0);
    let result = pipeline
        .fetch_citations("What causes BRCA1 mutations?", &options)
        .await;

    search.assert_async().await;
    summary.assert_async().await;
    xml_search.assert_async().await;

    assert_eq!(result.query, "What causes BRCA1 mutations?");
    assert_eq!(result.extracted_entities.genes, vec!["BRCA1"]);
    assert!(result
        .optimized_query
        .contains("\"BRCA1\"[Gene/Protein Name]"));

    // Review first, then the most recent primary study
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.citations[0].pmid.as_deref(), Some("102"));
    assert!(result.citations[0].is_review);
    assert_eq!(result.citations[0].authors, "Smith J, Doe A, Roe B et al.");
    assert_eq!(result.citations[1].pmid.as_deref(), Some("103"));
    assert!(result
        .citations
        .iter()
        .all(|c| c.relevance_score.is_some()));

    assert_eq!(result.genes_in_titles, vec!["BRCA1", "PALB2"]);

    let rendered = format_citations(&result.citations);
    assert!(rendered.contains("1. BRCA1 and PALB2 in homologous recombination: a review"));
    assert!(rendered.contains("Nat Rev Cancer (2002)"));
}

#[tokio::test]
async fn test_xml_fallback_when_json_is_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(retmode("json"))
        .with_body(r#"{"esearchresult": {"idlist": []}}"#)
        .expect(1)
        .create_async()
        .await;
    let xml_search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(retmode("xml"))
        .with_body(ESEARCH_XML)
        .expect(1)
        .create_async()
        .await;
    let fetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "201".into()),
            Matcher::UrlEncoded("rettype".into(), "abstract".into()),
            retmode("xml"),
        ]))
        .with_body(EFETCH_XML)
        .expect(1)
        .create_async()
        .await;

    let pipeline = CitationPipeline::new(test_config(&server.url())).unwrap();
    let result = pipeline
        .fetch_citations("What causes Parkinson's disease?", &SearchOptions::default())
        .await;

    xml_search.assert_async().await;
    fetch.assert_async().await;

    assert_eq!(result.citations.len(), 1);
    let citation = &result.citations[0];
    assert_eq!(citation.title, "LRRK2 kinase activity in Parkinson's disease.");
    assert_eq!(citation.authors, "Lee K");
    assert_eq!(citation.journal, "Movement Disorders");
    assert_eq!(
        citation.url.as_deref(),
        Some("https://pubmed.ncbi.nlm.nih.gov/201/")
    );
    assert_eq!(result.genes_in_titles, vec!["LRRK2"]);
    assert!(result
        .optimized_query
        .contains("[Date - Publication]"));
}

#[tokio::test]
async fn test_json_failure_falls_back_to_xml() {
    let mut server = Server::new_async().await;
    let json_search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(retmode("json"))
        .with_status(500)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(retmode("xml"))
        .with_body(ESEARCH_XML)
        .create_async()
        .await;
    server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .with_body(EFETCH_XML)
        .create_async()
        .await;

    let pipeline = CitationPipeline::new(test_config(&server.url())).unwrap();
    let result = pipeline
        .fetch_citations("LRRK2 kinase", &SearchOptions::default())
        .await;

    json_search.assert_async().await;
    assert_eq!(result.citations.len(), 1);
}

#[tokio::test]
async fn test_total_failure_keeps_metadata() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(4)
        .create_async()
        .await;

    let pipeline = CitationPipeline::new(test_config(&server.url())).unwrap();
    let result = pipeline
        .fetch_citations("What causes Parkinson's disease?", &SearchOptions::default())
        .await;

    search.assert_async().await;
    assert!(result.citations.is_empty());
    assert!(result.genes_in_titles.is_empty());
    assert_eq!(
        result.extracted_entities.diseases,
        vec!["Parkinson's disease"]
    );
    assert!(result
        .optimized_query
        .contains("\"Parkinson's disease\"[MeSH Terms]"));
    assert_eq!(format_citations(&result.citations), "No relevant citations found.");
}

#[tokio::test]
async fn test_over_fetch_requests_twice_the_citations() {
    let mut server = Server::new_async().await;
    let json_search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            retmode("json"),
            Matcher::UrlEncoded("retmax".into(), "10".into()),
        ]))
        .with_body(r#"{"esearchresult": {"idlist": []}}"#)
        .expect(1)
        .create_async()
        .await;
    let xml_search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            retmode("xml"),
            Matcher::UrlEncoded("retmax".into(), "10".into()),
        ]))
        .with_body("<eSearchResult><IdList></IdList></eSearchResult>")
        .expect(1)
        .create_async()
        .await;

    let pipeline = CitationPipeline::new(test_config(&server.url())).unwrap();
    let options = SearchOptions::default().max_citations(5);
    let result = pipeline.fetch_citations("sleep and memory", &options).await;

    json_search.assert_async().await;
    xml_search.assert_async().await;
    assert!(result.citations.len() <= 5);
}

#[tokio::test]
async fn test_alternate_strategy_query_reaches_the_service() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::UrlEncoded(
            "term".into(),
            "LRRK2[Gene] AND review[Publication Type]".into(),
        ))
        .with_body(r#"{"esearchresult": {"idlist": []}}"#)
        .expect(2)
        .create_async()
        .await;

    let strategy = Arc::new(MockStrategy::new().with_query("LRRK2[Gene]"));
    let pipeline = CitationPipeline::new(test_config(&server.url()))
        .unwrap()
        .with_alternate_strategy(strategy);
    let options = SearchOptions::default()
        .prioritize_reviews(true)
        .max_age_years(0)
        .use_alternate_extraction(true);

    let result = pipeline.fetch_citations("LRRK2 in Parkinson's disease", &options).await;

    search.assert_async().await;
    assert_eq!(
        result.optimized_query,
        "LRRK2[Gene] AND review[Publication Type]"
    );
    assert_eq!(result.extracted_entities.genes, vec!["LRRK2"]);
}

#[tokio::test]
async fn test_concurrent_searches_share_one_pipeline() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_body(r#"{"esearchresult": {"idlist": []}}"#)
        .create_async()
        .await;

    let pipeline = Arc::new(CitationPipeline::new(test_config(&server.url())).unwrap());
    let options = SearchOptions::default();

    let (a, b) = tokio::join!(
        pipeline.fetch_citations("BRCA1 mutations", &options),
        pipeline.fetch_citations("TP53 mutations", &options),
    );

    assert_eq!(a.extracted_entities.genes, vec!["BRCA1"]);
    assert_eq!(b.extracted_entities.genes, vec!["TP53"]);
}
