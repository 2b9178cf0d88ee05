//! PubMed efetch XML parser using quick-xml.
//!
//! Pulls just what the classifier needs out of a `PubmedArticleSet`:
//! PMID, article title, the free-text publication date and the author list
//! with affiliations. PubMed has no email element, so an author's email is the
//! first address found inside their affiliation strings.

use crate::error::{OptionExt, PapersError, Result};
use crate::record::{RawAuthor, RawRecord};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

/// Extract the first email address contained in `text`.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Parse every `PubmedArticle` and `PubmedBookArticle` in an efetch response,
/// in document order.
///
/// A record without a PMID, or a document that ends before
/// `</PubmedArticleSet>`, makes the whole document invalid.
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut closed = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PubmedArticle" => {
                records.push(parse_article(&mut reader)?);
            }
            Event::Start(e) if e.name().as_ref() == b"PubmedBookArticle" => {
                records.push(parse_book_article(&mut reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"PubmedArticleSet" => closed = true,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !closed {
        return Err(unexpected_eof("PubmedArticleSet"));
    }

    debug!(count = records.len(), "Parsed PubMed articles");
    Ok(records)
}

fn unexpected_eof(inside: &str) -> PapersError {
    PapersError::Parse(format!("unexpected end of document inside <{}>", inside))
}

fn parse_book_article(reader: &mut Reader<&[u8]>) -> Result<RawRecord> {
    let mut pmid = None;
    let mut record = RawRecord::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"BookDocument" => parse_book_document(reader, &mut pmid, &mut record)?,
                b"PubmedBookData" => skip_element(reader, b"PubmedBookData")?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubmedBookArticle" => break,
            Event::Eof => return Err(unexpected_eof("PubmedBookArticle")),
            _ => {}
        }
        buf.clear();
    }

    record.pmid = pmid
        .filter(|p: &String| !p.is_empty())
        .ok_or_parse("PubmedBookArticle is missing BookDocument/PMID")?;
    Ok(record)
}

/// Chapter `ArticleTitle` wins over the `BookTitle`; the date comes from `Book/PubDate`.
fn parse_book_document(
    reader: &mut Reader<&[u8]>,
    pmid: &mut Option<String>,
    record: &mut RawRecord,
) -> Result<()> {
    let mut article_title = None;
    let mut book_title = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" => *pmid = Some(read_text(reader)?.trim().to_string()),
                b"ArticleTitle" => article_title = non_empty(read_text(reader)?),
                b"Book" => {
                    let (title, date) = parse_book(reader)?;
                    book_title = title;
                    record.publication_date = date;
                }
                b"AuthorList" if record.authors.is_empty() => {
                    record.authors = parse_author_list(reader)?;
                }
                other => {
                    let tag = other.to_vec();
                    skip_element(reader, &tag)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"BookDocument" => break,
            Event::Eof => return Err(unexpected_eof("BookDocument")),
            _ => {}
        }
        buf.clear();
    }

    record.title = article_title.or(book_title);
    Ok(())
}

/// Returns (BookTitle, PubDate); editor lists and publisher are skipped
fn parse_book(reader: &mut Reader<&[u8]>) -> Result<(Option<String>, Option<String>)> {
    let mut title = None;
    let mut date = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"BookTitle" => title = non_empty(read_text(reader)?),
                b"PubDate" => date = parse_pub_date(reader)?,
                other => {
                    let tag = other.to_vec();
                    skip_element(reader, &tag)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"Book" => break,
            Event::Eof => return Err(unexpected_eof("Book")),
            _ => {}
        }
        buf.clear();
    }

    Ok((title, date))
}

fn parse_article(reader: &mut Reader<&[u8]>) -> Result<RawRecord> {
    let mut pmid = None;
    let mut record = RawRecord::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MedlineCitation" => parse_medline_citation(reader, &mut pmid, &mut record)?,
                b"PubmedData" => skip_element(reader, b"PubmedData")?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
            Event::Eof => return Err(unexpected_eof("PubmedArticle")),
            _ => {}
        }
        buf.clear();
    }

    record.pmid = pmid
        .filter(|p: &String| !p.is_empty())
        .ok_or_parse("PubmedArticle is missing MedlineCitation/PMID")?;
    Ok(record)
}

fn parse_medline_citation(
    reader: &mut Reader<&[u8]>,
    pmid: &mut Option<String>,
    record: &mut RawRecord,
) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" => *pmid = Some(read_text(reader)?.trim().to_string()),
                b"Article" => parse_article_element(reader, record)?,
                // Comments, MeSH lists etc. may carry their own PMIDs
                other => {
                    let tag = other.to_vec();
                    skip_element(reader, &tag)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"MedlineCitation" => break,
            Event::Eof => return Err(unexpected_eof("MedlineCitation")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article_element(reader: &mut Reader<&[u8]>, record: &mut RawRecord) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"ArticleTitle" => record.title = non_empty(read_text(reader)?),
                b"Journal" => record.publication_date = parse_journal(reader)?,
                b"AuthorList" => record.authors = parse_author_list(reader)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Article" => break,
            Event::Eof => return Err(unexpected_eof("Article")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Returns the free-text `PubDate` found under `JournalIssue`
fn parse_journal(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut date = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PubDate" => {
                date = parse_pub_date(reader)?;
            }
            Event::End(e) if e.name().as_ref() == b"Journal" => break,
            Event::Eof => return Err(unexpected_eof("Journal")),
            _ => {}
        }
        buf.clear();
    }

    Ok(date)
}

/// `MedlineDate` verbatim, otherwise "Year Month Day" from whichever parts exist
fn parse_pub_date(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut medline_date = None;
    let mut year = None;
    let mut month = None;
    let mut day = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => year = non_empty(read_text(reader)?),
                b"Month" => month = non_empty(read_text(reader)?),
                b"Day" => day = non_empty(read_text(reader)?),
                b"MedlineDate" => medline_date = non_empty(read_text(reader)?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubDate" => break,
            Event::Eof => return Err(unexpected_eof("PubDate")),
            _ => {}
        }
        buf.clear();
    }

    if medline_date.is_some() {
        return Ok(medline_date);
    }

    let parts: Vec<String> = [year, month, day].into_iter().flatten().collect();
    Ok(non_empty(parts.join(" ")))
}

fn parse_author_list(reader: &mut Reader<&[u8]>) -> Result<Vec<RawAuthor>> {
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Author" => {
                authors.push(parse_author(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => return Err(unexpected_eof("AuthorList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(authors)
}

fn parse_author(reader: &mut Reader<&[u8]>) -> Result<RawAuthor> {
    let mut last_name = None;
    let mut fore_name = None;
    let mut collective_name = None;
    let mut author = RawAuthor::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => last_name = non_empty(read_text(reader)?),
                b"ForeName" => fore_name = non_empty(read_text(reader)?),
                b"CollectiveName" => collective_name = non_empty(read_text(reader)?),
                b"AffiliationInfo" => {
                    if let Some(aff) = parse_affiliation(reader)? {
                        author.affiliations.push(aff);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => return Err(unexpected_eof("Author")),
            _ => {}
        }
        buf.clear();
    }

    let personal: Vec<String> = [fore_name, last_name].into_iter().flatten().collect();
    author.name = non_empty(personal.join(" ")).or(collective_name);
    author.email = author.affiliations.iter().find_map(|a| extract_email(a));

    Ok(author)
}

fn parse_affiliation(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut affiliation = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Affiliation" => {
                affiliation = non_empty(read_text(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"AffiliationInfo" => break,
            Event::Eof => return Err(unexpected_eof("AffiliationInfo")),
            _ => {}
        }
        buf.clear();
    }

    Ok(affiliation)
}

fn skip_element(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof(&String::from_utf8_lossy(end_tag))),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Read text content until the matching end tag, flattening inline markup
/// such as `<i>` or `<sup>`.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape().map_err(quick_xml::Error::from)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => text.push_str(&read_text(reader)?),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("text")),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
