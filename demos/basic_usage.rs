//! Basic usage example for the biocite library.
//!
//! This example demonstrates how to answer a biomedical question with
//! ranked PubMed citations.

use biocite::config::get_config;
use biocite::utils::format_citations;
use biocite::CitationPipeline;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Defaults plus BIOCITE_* / NCBI_API_KEY from the environment
    let config = Arc::new(get_config()?);
    let pipeline = CitationPipeline::new(config)?;

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What causes BRCA1 mutations?".to_string());

    // Prefer reviews from the last five years
    let options = pipeline
        .default_options()
        .max_citations(3)
        .prioritize_reviews(true)
        .max_age_years(5);

    let result = pipeline.fetch_citations(&question, &options).await;

    println!("Question: {}", result.query);
    println!("Entities: {:?}", result.extracted_entities);
    println!("PubMed query: {}\n", result.optimized_query);
    println!("{}", format_citations(&result.citations));

    if !result.genes_in_titles.is_empty() {
        println!("\nGenes mentioned in titles: {}", result.genes_in_titles.join(", "));
    }

    Ok(())
}
