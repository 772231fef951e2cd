//! Category filtering over aggregated results.

use crate::models::{Book, Category};

/// Whether a book belongs to a category.
///
/// `All` matches every book. Any other category matches when the lowercased
/// title contains one of the category keywords; books without a title never
/// match.
pub fn matches_category(book: &Book, category: Category) -> bool {
    if category.is_all() {
        return true;
    }

    let Some(title) = book.title() else {
        return false;
    };
    let title = title.to_lowercase();

    category
        .keywords()
        .iter()
        .any(|keyword| title.contains(keyword))
}

/// Books from `books` that belong to `category`, in their original order
pub fn filter_books(books: &[Book], category: Category) -> Vec<Book> {
    if category.is_all() {
        return books.to_vec();
    }

    books
        .iter()
        .filter(|book| matches_category(book, category))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::books_titled;
    use proptest::prelude::*;

    fn ten_books() -> Vec<Book> {
        books_titled(&[
            "Dune",
            "A Novel Approach",
            "Cooking at Home",
            "The Story of Art",
            "Foundation",
            "Gardening Basics",
            "Untitled Notes",
            "Bedtime Story Collection",
            "Linear Algebra",
            "Travel Guide",
        ])
    }

    #[test]
    fn test_fiction_scenario() {
        let books = ten_books();
        let filtered = filter_books(&books, Category::Fiction);

        let titles: Vec<_> = filtered.iter().filter_map(Book::title).collect();
        assert_eq!(
            titles,
            vec![
                "A Novel Approach",
                "The Story of Art",
                "Bedtime Story Collection"
            ]
        );
    }

    #[test]
    fn test_all_is_identity() {
        let books = ten_books();
        assert_eq!(filter_books(&books, Category::All), books);
    }

    #[test]
    fn test_case_insensitive_match() {
        let book = Book::new("A BRIEF HISTORY OF TIME");
        assert!(matches_category(&book, Category::History));
        assert!(!matches_category(&book, Category::Fiction));
    }

    #[test]
    fn test_missing_title_never_matches() {
        let untitled = Book::default();
        let blank = Book::new("  ");
        for category in Category::ALL.into_iter().filter(|c| !c.is_all()) {
            assert!(!matches_category(&untitled, category));
            assert!(!matches_category(&blank, category));
        }
        assert!(matches_category(&untitled, Category::All));
    }

    #[test]
    fn test_multi_word_keyword() {
        assert!(matches_category(&Book::new("The Life of Pi"), Category::Biography));
        assert!(matches_category(
            &Book::new("My First Picture Book"),
            Category::Children
        ));
    }

    fn is_subsequence(sub: &[Book], full: &[Book]) -> bool {
        let mut rest = full.iter();
        sub.iter().all(|item| rest.any(|candidate| candidate == item))
    }

    proptest! {
        #[test]
        fn prop_filtered_is_ordered_subsequence(
            titles in proptest::collection::vec(
                prop_oneof![
                    Just("novel".to_string()),
                    Just("History of Rome".to_string()),
                    Just("".to_string()),
                    "[a-zA-Z ]{0,20}",
                ],
                0..60,
            ),
            category_index in 0usize..6,
        ) {
            let books: Vec<Book> = titles
                .iter()
                .enumerate()
                .map(|(i, t)| Book::builder().title(t.clone()).cover_id(i as i64).build())
                .collect();
            let category = Category::ALL[category_index];
            let filtered = filter_books(&books, category);

            prop_assert!(filtered.len() <= books.len());
            prop_assert!(is_subsequence(&filtered, &books));
            prop_assert!(filtered.iter().all(|b| matches_category(b, category)));
        }
    }
}
