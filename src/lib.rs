//! # get-papers-list
//!
//! Search PubMed and report papers with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! ## Modules
//!
//! - [`pubmed`] - E-utilities client (esearch + efetch)
//! - [`parser`] - efetch XML to [`record::RawRecord`]
//! - [`classifier`] - Affiliation classifier and record shaper
//! - [`keywords`] - Company keyword set
//! - [`pipeline`] - Search, fetch and classify in one call
//! - [`report`] - CSV output
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use get_papers_list::{pipeline, pubmed, CompanyKeywordSet, SearchOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = pubmed::PubmedClient::new(Default::default())?;
//!     let keywords = CompanyKeywordSet::default();
//!     if let SearchOutcome::Rows(rows) = pipeline::run(&client, "cancer immunotherapy", &keywords).await? {
//!         println!("Found {} papers", rows.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod keywords;
pub mod parser;
pub mod pipeline;
pub mod pubmed;
pub mod record;
pub mod report;

pub use error::{PapersError, Result};
pub use keywords::CompanyKeywordSet;
pub use pipeline::SearchOutcome;
pub use record::{OutputRow, RawAuthor, RawRecord};
