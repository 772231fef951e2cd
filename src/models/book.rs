//! Book model representing one Open Library search entry.

use serde::{Deserialize, Serialize};

/// Default base URL of the Open Library cover service
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Cover image sizes offered by the cover service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CoverSize {
    /// Single-letter suffix used in cover URLs
    pub fn suffix(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// A single catalog entry returned by a search
///
/// Field names follow the upstream document so a search response can be
/// decoded straight into this struct. Everything except the author list is
/// optional because the catalog omits fields freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Upstream work key, e.g. `/works/OL45883W`
    #[serde(default)]
    pub key: Option<String>,

    /// Book title
    #[serde(default)]
    pub title: Option<String>,

    /// Author names in catalog order
    #[serde(default, rename = "author_name")]
    pub authors: Vec<String>,

    /// Year of first publication
    #[serde(default, rename = "first_publish_year")]
    pub publish_year: Option<i32>,

    /// Numeric cover identifier
    #[serde(default, rename = "cover_i")]
    pub cover_id: Option<i64>,

    /// Number of editions known to the catalog
    #[serde(default)]
    pub edition_count: Option<u32>,

    /// Language codes (e.g. "eng")
    #[serde(default, rename = "language")]
    pub languages: Option<Vec<String>>,

    /// E-book availability ("public", "borrowable", "no_ebook", ...)
    #[serde(default)]
    pub ebook_access: Option<String>,
}

impl Book {
    /// Create a book with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Start building a book
    pub fn builder() -> BookBuilder {
        BookBuilder::default()
    }

    /// Title if present and not blank
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Authors joined for display, or "Unknown Author"
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown Author".to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// First listed language, if any
    pub fn primary_language(&self) -> Option<&str> {
        self.languages
            .as_ref()
            .and_then(|langs| langs.first())
            .map(String::as_str)
    }

    /// Cover image URL at the default cover host
    pub fn cover_url(&self, size: CoverSize) -> Option<String> {
        self.cover_url_at(DEFAULT_COVERS_URL, size)
    }

    /// Cover image URL at a specific cover host.
    ///
    /// Returns `None` when the entry has no cover id; callers show a
    /// placeholder instead of issuing a request.
    pub fn cover_url_at(&self, covers_base: &str, size: CoverSize) -> Option<String> {
        self.cover_id.map(|id| {
            format!(
                "{}/b/id/{}-{}.jpg",
                covers_base.trim_end_matches('/'),
                id,
                size.suffix()
            )
        })
    }

    /// Key that stays the same for the same entry across renders.
    ///
    /// Uses the upstream key when present, otherwise title + cover id +
    /// position in the collection.
    pub fn stable_key(&self, position: usize) -> String {
        match &self.key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => format!(
                "{}-{}-{}",
                self.title().unwrap_or("untitled"),
                self.cover_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "nocover".to_string()),
                position
            ),
        }
    }
}

/// Builder for [`Book`]
#[derive(Debug, Default)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.book.key = Some(key.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.book.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.authors.push(author.into());
        self
    }

    pub fn publish_year(mut self, year: i32) -> Self {
        self.book.publish_year = Some(year);
        self
    }

    pub fn cover_id(mut self, id: i64) -> Self {
        self.book.cover_id = Some(id);
        self
    }

    pub fn edition_count(mut self, count: u32) -> Self {
        self.book.edition_count = Some(count);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.book
            .languages
            .get_or_insert_with(Vec::new)
            .push(language.into());
        self
    }

    pub fn ebook_access(mut self, access: impl Into<String>) -> Self {
        self.book.ebook_access = Some(access.into());
        self
    }

    pub fn build(self) -> Book {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_doc() {
        let json = r#"{
            "key": "/works/OL893415W",
            "title": "Dune",
            "author_name": ["Frank Herbert"],
            "first_publish_year": 1965,
            "cover_i": 11481354,
            "edition_count": 120,
            "language": ["eng", "spa"],
            "ebook_access": "borrowable",
            "has_fulltext": true
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.key.as_deref(), Some("/works/OL893415W"));
        assert_eq!(book.title(), Some("Dune"));
        assert_eq!(book.authors, vec!["Frank Herbert".to_string()]);
        assert_eq!(book.publish_year, Some(1965));
        assert_eq!(book.cover_id, Some(11481354));
        assert_eq!(book.edition_count, Some(120));
        assert_eq!(book.primary_language(), Some("eng"));
        assert_eq!(book.ebook_access.as_deref(), Some("borrowable"));
    }

    #[test]
    fn test_decode_sparse_doc() {
        let book: Book = serde_json::from_str(r#"{"title": "Untold"}"#).unwrap();
        assert!(book.authors.is_empty());
        assert!(book.languages.is_none());
        assert_eq!(book.author_line(), "Unknown Author");
        assert_eq!(book.cover_url(CoverSize::Medium), None);
    }

    #[test]
    fn test_blank_title_is_absent() {
        let book = Book::new("   ");
        assert_eq!(book.title(), None);
    }

    #[test]
    fn test_cover_url() {
        let book = Book::builder().title("Dune").cover_id(42).build();
        assert_eq!(
            book.cover_url(CoverSize::Medium).as_deref(),
            Some("https://covers.openlibrary.org/b/id/42-M.jpg")
        );
        assert_eq!(
            book.cover_url_at("http://localhost:9000/", CoverSize::Large)
                .as_deref(),
            Some("http://localhost:9000/b/id/42-L.jpg")
        );
    }

    #[test]
    fn test_stable_key_prefers_upstream_key() {
        let book = Book::builder().key("/works/OL1W").title("A").build();
        assert_eq!(book.stable_key(7), "/works/OL1W");
    }

    #[test]
    fn test_stable_key_fallback_is_deterministic() {
        let book = Book::builder().title("Dune").cover_id(9).build();
        assert_eq!(book.stable_key(3), "Dune-9-3");
        assert_eq!(book.stable_key(3), book.stable_key(3));
        assert_ne!(book.stable_key(3), book.stable_key(4));

        let bare = Book::default();
        assert_eq!(bare.stable_key(0), "untitled-nocover-0");
    }

    #[test]
    fn test_author_line_joins() {
        let book = Book::builder()
            .title("Good Omens")
            .author("Terry Pratchett")
            .author("Neil Gaiman")
            .build();
        assert_eq!(book.author_line(), "Terry Pratchett, Neil Gaiman");
    }
}
