//! Company keyword set used to flag non-academic affiliations.
//!
//! Matching is plain case-insensitive substring containment. There is no
//! tokenization or word-boundary check, so a short keyword can match inside an
//! unrelated word (e.g. "gsk" inside a longer token). Keep it that way; output
//! compatibility depends on it.

/// Built-in pharmaceutical/biotech company names.
pub const DEFAULT_COMPANY_KEYWORDS: &[&str] = &[
    "Pfizer",
    "Novartis",
    "Roche",
    "Genentech",
    "Merck",
    "GlaxoSmithKline",
    "GSK",
    "Sanofi",
    "AstraZeneca",
    "Johnson & Johnson",
    "Janssen",
    "Bayer",
    "AbbVie",
    "Amgen",
    "Gilead",
    "Biogen",
    "Eli Lilly",
    "Bristol-Myers Squibb",
    "Boehringer Ingelheim",
    "Novo Nordisk",
    "Takeda",
    "Moderna",
    "Regeneron",
    "Vertex Pharmaceuticals",
];

/// Immutable set of company keywords, stored lower-cased.
#[derive(Debug, Clone)]
pub struct CompanyKeywordSet {
    keywords: Vec<String>,
}

impl CompanyKeywordSet {
    /// Build a set from arbitrary keywords. Empty entries are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Whether `affiliation` contains any keyword, ignoring case.
    pub fn matches(&self, affiliation: &str) -> bool {
        let haystack = affiliation.to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Lower-cased keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for CompanyKeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_COMPANY_KEYWORDS)
    }
}
