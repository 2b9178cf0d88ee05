//! Record types: parsed upstream entries and shaped report rows.

use serde::{Deserialize, Serialize};

/// Sentinel written when no author carries an email.
pub const EMAIL_NOT_AVAILABLE: &str = "N/A";

/// One bibliographic entry as returned by the record service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// PubMed ID
    pub pmid: String,
    pub title: Option<String>,
    /// Free-text date as returned upstream (e.g. "2023 Jun 15" or "2021 Jan-Feb")
    pub publication_date: Option<String>,
    pub authors: Vec<RawAuthor>,
}

impl RawRecord {
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            pmid: pmid.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_publication_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    pub fn with_author(mut self, author: RawAuthor) -> Self {
        self.authors.push(author);
        self
    }
}

/// One author of a [`RawRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthor {
    pub name: Option<String>,
    /// Affiliation strings in document order, original case preserved
    pub affiliations: Vec<String>,
    pub email: Option<String>,
}

impl RawAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// One row of the output report.
///
/// Field names map to the CSV header columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Publication Date")]
    pub publication_date: Option<String>,
    /// `"; "`-joined names of company-affiliated authors
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    /// `"; "`-joined matching affiliation strings
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    /// Last email seen in author order, or [`EMAIL_NOT_AVAILABLE`]
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl OutputRow {
    /// CSV column order for the report
    pub const HEADERS: [&'static str; 6] = [
        "PubmedID",
        "Title",
        "Publication Date",
        "Non-academic Author(s)",
        "Company Affiliation(s)",
        "Corresponding Author Email",
    ];
}
