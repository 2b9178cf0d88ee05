//! Affiliation classifier and record shaper.
//!
//! Turns one [`RawRecord`] into one [`OutputRow`]. Pure: no I/O and no state
//! carried between records.
//!
//! For every (author, affiliation) pair whose affiliation contains a company
//! keyword, the author's name and the original affiliation string are
//! appended. Nothing is de-duplicated, so an author with two matching
//! affiliations appears twice. The corresponding email is the last email seen
//! in author order.

use crate::keywords::CompanyKeywordSet;
use crate::record::{OutputRow, RawAuthor, RawRecord, EMAIL_NOT_AVAILABLE};

/// Separator used to join author names and affiliations.
pub const LIST_SEPARATOR: &str = "; ";

/// Accumulator threaded through the fold over a record's authors.
#[derive(Debug, Default)]
struct Affiliations<'a> {
    authors: Vec<&'a str>,
    companies: Vec<&'a str>,
    email: Option<&'a str>,
}

impl<'a> Affiliations<'a> {
    fn observe(mut self, author: &'a RawAuthor, keywords: &CompanyKeywordSet) -> Self {
        for affiliation in &author.affiliations {
            if keywords.matches(affiliation) {
                self.authors.push(author.name.as_deref().unwrap_or_default());
                self.companies.push(affiliation);
            }
        }

        if let Some(email) = author.email.as_deref() {
            self.email = Some(email);
        }

        self
    }
}

/// Classify one record's authors and shape the report row.
pub fn classify(record: &RawRecord, keywords: &CompanyKeywordSet) -> OutputRow {
    let acc = record
        .authors
        .iter()
        .fold(Affiliations::default(), |acc, author| acc.observe(author, keywords));

    OutputRow {
        pubmed_id: record.pmid.clone(),
        title: record.title.clone(),
        publication_date: record.publication_date.clone(),
        non_academic_authors: acc.authors.join(LIST_SEPARATOR),
        company_affiliations: acc.companies.join(LIST_SEPARATOR),
        corresponding_email: acc.email.unwrap_or(EMAIL_NOT_AVAILABLE).to_string(),
    }
}

/// Classify every record, preserving upstream order.
pub fn classify_all(records: &[RawRecord], keywords: &CompanyKeywordSet) -> Vec<OutputRow> {
    records.iter().map(|r| classify(r, keywords)).collect()
}
