//! In-memory book store.
//!
//! The store owns the authoritative collection and the id counter. It is a
//! plain single-owner value; sharing across threads is the job of
//! [`super::service::CatalogService`], which keeps it behind one lock.

use super::models::{Book, BookFilters, BookId, CreateBookInput, UpdateBookInput};
use crate::utils::{contains_ignore_case, eq_ignore_case};

#[derive(Debug)]
pub struct BookStore {
    books: Vec<Book>,
    next_id: BookId,
}

impl BookStore {
    /// Empty store; the first book gets id 1.
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }

    /// Store holding the four reference books, ids 1 through 4.
    pub fn with_sample_books() -> Self {
        let mut store = Self::new();
        for (title, author, genre, price) in [
            ("To Kill a Mockingbird", "Harper Lee", "Fiction", 50.00),
            ("1984", "George Orwell", "Fiction", 75.00),
            ("Dune", "Frank Herbert", "Science Fiction", 40.00),
            ("Sapiens", "Yuval Noah Harari", "Non-Fiction", 65.00),
        ] {
            store.create(CreateBookInput {
                title: title.to_string(),
                author: author.to_string(),
                genre: genre.to_string(),
                price,
            });
        }
        store
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Append a new book under the next sequential id.
    pub fn create(&mut self, input: CreateBookInput) -> Book {
        let book = Book {
            id: self.next_id,
            title: input.title,
            author: input.author,
            genre: input.genre,
            price: input.price,
        };
        self.next_id += 1;
        self.books.push(book.clone());
        book
    }

    /// Snapshot of the books matching every present filter, in insertion order.
    pub fn find_all(&self, filters: Option<&BookFilters>) -> Vec<Book> {
        let everything = BookFilters::default();
        let filters = filters.unwrap_or(&everything);

        self.books
            .iter()
            .filter(|book| matches(book, filters))
            .cloned()
            .collect()
    }

    pub fn find_by_id(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Merge `changes` onto the book with `id`. `None` leaves the store untouched.
    pub fn update(&mut self, id: BookId, changes: UpdateBookInput) -> Option<&Book> {
        let book = self.books.iter_mut().find(|book| book.id == id)?;
        book.apply(changes);
        Some(&*book)
    }

    /// Remove the book with `id`; reports whether anything was removed.
    pub fn delete(&mut self, id: BookId) -> bool {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        self.books.len() < before
    }

    /// Books whose genre equals `genre` ignoring case, in insertion order.
    pub fn find_by_genre(&self, genre: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| eq_ignore_case(&book.genre, genre))
            .cloned()
            .collect()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

/// An absent or empty field matches every book.
fn matches(book: &Book, filters: &BookFilters) -> bool {
    fn text(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    text(&filters.genre).map_or(true, |genre| eq_ignore_case(&book.genre, genre))
        && text(&filters.author).map_or(true, |author| contains_ignore_case(&book.author, author))
        && text(&filters.title).map_or(true, |title| contains_ignore_case(&book.title, title))
        && filters.min_price.map_or(true, |min| book.price >= min)
        && filters.max_price.map_or(true, |max| book.price <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, author: &str, genre: &str, price: f64) -> CreateBookInput {
        CreateBookInput {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            price,
        }
    }

    fn ids(books: &[Book]) -> Vec<BookId> {
        books.iter().map(|book| book.id).collect()
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut store = BookStore::new();
        let first = store.create(input("A", "X", "Fiction", 10.0));
        let second = store.create(input("B", "Y", "Fiction", 20.0));
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.delete(second.id));
        let third = store.create(input("C", "Z", "Fiction", 30.0));
        assert_eq!(third.id, 3);

        assert!(store.delete(first.id));
        assert!(store.delete(third.id));
        assert!(store.is_empty());
        assert_eq!(store.create(input("D", "W", "Fiction", 40.0)).id, 4);
    }

    #[test]
    fn sample_catalog_continues_numbering_after_seed() {
        let mut store = BookStore::with_sample_books();
        assert_eq!(store.len(), 4);
        assert_eq!(store.find_by_id(4).unwrap().title, "Sapiens");
        assert_eq!(store.create(input("Emma", "Jane Austen", "Fiction", 12.0)).id, 5);
    }

    #[test]
    fn find_all_without_filters_returns_insertion_order() {
        let store = BookStore::with_sample_books();
        assert_eq!(ids(&store.find_all(None)), vec![1, 2, 3, 4]);
        assert_eq!(
            ids(&store.find_all(Some(&BookFilters::default()))),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn empty_text_filters_match_everything() {
        let store = BookStore::with_sample_books();
        let filters = BookFilters {
            genre: Some(String::new()),
            author: Some(String::new()),
            title: Some(String::new()),
            ..BookFilters::default()
        };
        assert_eq!(store.find_all(Some(&filters)).len(), 4);
    }

    #[test]
    fn filters_compose_with_and() {
        let mut store = BookStore::new();
        store.create(input("One", "A", "Fiction", 50.0));
        store.create(input("Two", "B", "Fiction", 75.0));
        store.create(input("Three", "C", "SciFi", 40.0));

        let filters = BookFilters {
            genre: Some("Fiction".to_string()),
            max_price: Some(60.0),
            ..BookFilters::default()
        };
        let found = store.find_all(Some(&filters));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "One");
        assert_eq!(found[0].price, 50.0);
    }

    #[test]
    fn genre_filter_is_exact_while_author_and_title_are_substrings() {
        let store = BookStore::with_sample_books();

        let by_genre = BookFilters {
            genre: Some("fiction".to_string()),
            ..BookFilters::default()
        };
        assert_eq!(ids(&store.find_all(Some(&by_genre))), vec![1, 2]);

        let by_author = BookFilters {
            author: Some("HARARI".to_string()),
            ..BookFilters::default()
        };
        assert_eq!(ids(&store.find_all(Some(&by_author))), vec![4]);

        let by_title = BookFilters {
            title: Some("mock".to_string()),
            ..BookFilters::default()
        };
        assert_eq!(ids(&store.find_all(Some(&by_title))), vec![1]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let store = BookStore::with_sample_books();
        let filters = BookFilters {
            min_price: Some(50.0),
            max_price: Some(65.0),
            ..BookFilters::default()
        };
        assert_eq!(ids(&store.find_all(Some(&filters))), vec![1, 4]);
    }

    #[test]
    fn find_all_returns_a_detached_snapshot() {
        let store = BookStore::with_sample_books();
        let mut snapshot = store.find_all(None);
        snapshot[0].price = 1.0;
        snapshot.clear();

        assert_eq!(store.len(), 4);
        assert_eq!(store.find_by_id(1).unwrap().price, 50.0);
    }

    #[test]
    fn update_merges_provided_fields_only() {
        let mut store = BookStore::with_sample_books();
        let updated = store
            .update(
                1,
                UpdateBookInput {
                    price: Some(80.0),
                    ..UpdateBookInput::default()
                },
            )
            .cloned()
            .unwrap();

        assert_eq!(updated.id, 1);
        assert_eq!(updated.title, "To Kill a Mockingbird");
        assert_eq!(updated.author, "Harper Lee");
        assert_eq!(updated.genre, "Fiction");
        assert_eq!(updated.price, 80.0);
        assert_eq!(store.find_by_id(1), Some(&updated));
    }

    #[test]
    fn update_of_missing_book_changes_nothing() {
        let mut store = BookStore::with_sample_books();
        let before = store.find_all(None);

        let changes = UpdateBookInput {
            title: Some("Ghost".to_string()),
            ..UpdateBookInput::default()
        };
        assert!(store.update(42, changes).is_none());
        assert_eq!(store.find_all(None), before);
    }

    #[test]
    fn delete_reports_whether_a_book_was_removed() {
        let mut store = BookStore::with_sample_books();
        assert!(store.delete(2));
        assert!(!store.delete(2));
        assert!(store.find_by_id(2).is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn find_by_genre_ignores_case() {
        let store = BookStore::with_sample_books();
        assert_eq!(ids(&store.find_by_genre("fiction")), vec![1, 2]);
        assert_eq!(ids(&store.find_by_genre("NON-FICTION")), vec![4]);
        assert!(store.find_by_genre("Mystery").is_empty());
    }
}
