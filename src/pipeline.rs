//! Search -> fetch -> classify.

use crate::classifier::classify_all;
use crate::error::Result;
use crate::keywords::CompanyKeywordSet;
use crate::pubmed::PubmedClient;
use crate::record::OutputRow;
use tracing::{debug, info};

/// Result of one run
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search returned no IDs; nothing was fetched.
    NoResults,
    /// One row per fetched record, in upstream order.
    Rows(Vec<OutputRow>),
}

/// Run the whole pipeline for `query`.
///
/// Either every record is fetched and shaped, or the first error is returned.
pub async fn run(
    client: &PubmedClient,
    query: &str,
    keywords: &CompanyKeywordSet,
) -> Result<SearchOutcome> {
    let ids = client.search(query).await?;
    if ids.is_empty() {
        info!(query = query, "No PubMed results");
        return Ok(SearchOutcome::NoResults);
    }

    debug!(count = ids.len(), ids = ?ids, "Resolved PubMed IDs, fetching records");

    let records = client.fetch(&ids).await?;
    let rows = classify_all(&records, keywords);

    let flagged = rows.iter().filter(|r| !r.company_affiliations.is_empty()).count();
    info!(total = rows.len(), flagged = flagged, "Classified records");

    Ok(SearchOutcome::Rows(rows))
}
