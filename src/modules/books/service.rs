use std::sync::{Mutex, MutexGuard, PoisonError};

use super::models::{Book, BookFilters, BookId, CreateBookInput, DiscountResult, UpdateBookInput};
use super::store::BookStore;
use crate::utils::round_to_cents;

/// Catalog operations shared by every request handler.
///
/// All store access goes through a single mutex, which keeps id assignment
/// unique and makes every write visible to the next read. The lock is never
/// held across an `.await`.
#[derive(Debug)]
pub struct CatalogService {
    store: Mutex<BookStore>,
}

impl CatalogService {
    pub fn new(store: BookStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn store(&self) -> MutexGuard<'_, BookStore> {
        // Every store operation completes or leaves the store unchanged, so a
        // panic elsewhere cannot leave it inconsistent.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn book_count(&self) -> usize {
        self.store().len()
    }

    pub fn create_book(&self, input: CreateBookInput) -> Book {
        let book = self.store().create(input);
        tracing::info!(book_id = book.id, genre = %book.genre, "book created");
        book
    }

    pub fn get_all_books(&self, filters: Option<BookFilters>) -> Vec<Book> {
        let filters = filters.map(BookFilters::normalized);
        tracing::debug!(
            filtered = filters.as_ref().is_some_and(|f| !f.is_unconstrained()),
            "listing books"
        );
        self.store().find_all(filters.as_ref())
    }

    pub fn get_book_by_id(&self, id: BookId) -> Option<Book> {
        self.store().find_by_id(id).cloned()
    }

    pub fn update_book(&self, id: BookId, changes: UpdateBookInput) -> Option<Book> {
        let updated = self.store().update(id, changes).cloned();
        match &updated {
            Some(book) => tracing::info!(book_id = book.id, "book updated"),
            None => tracing::debug!(book_id = id, "update skipped, book not found"),
        }
        updated
    }

    pub fn delete_book(&self, id: BookId) -> bool {
        let removed = self.store().delete(id);
        tracing::info!(book_id = id, removed, "book delete requested");
        removed
    }

    /// Total price of every book in `genre` after a percentage discount.
    ///
    /// Returns `None` when no book has that genre. The percentage is applied
    /// as given; range checks belong to the caller.
    pub fn calculate_discounted_price_for_genre(
        &self,
        genre: &str,
        discount_percentage: f64,
    ) -> Option<DiscountResult> {
        let books = self.store().find_by_genre(genre);
        if books.is_empty() {
            tracing::debug!(genre, "no books in genre");
            return None;
        }

        let total_original_price: f64 = books.iter().map(|book| book.price).sum();
        let discount_factor = discount_percentage / 100.0;
        let total_discounted_price = round_to_cents(total_original_price * (1.0 - discount_factor));

        tracing::debug!(
            genre,
            books = books.len(),
            total_original_price,
            total_discounted_price,
            "genre discount calculated"
        );

        Some(DiscountResult {
            genre: genre.to_string(),
            discount_percentage,
            total_discounted_price,
        })
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new(BookStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_catalog() -> CatalogService {
        CatalogService::new(BookStore::with_sample_books())
    }

    #[test]
    fn discount_for_fiction_matches_worked_example() {
        let result = sample_catalog()
            .calculate_discounted_price_for_genre("Fiction", 10.0)
            .unwrap();

        assert_eq!(
            result,
            DiscountResult {
                genre: "Fiction".to_string(),
                discount_percentage: 10.0,
                total_discounted_price: 112.5,
            }
        );
    }

    #[test]
    fn zero_discount_keeps_original_total() {
        let result = sample_catalog()
            .calculate_discounted_price_for_genre("Science Fiction", 0.0)
            .unwrap();
        assert_eq!(result.total_discounted_price, 40.0);
    }

    #[test]
    fn full_discount_is_free() {
        let result = sample_catalog()
            .calculate_discounted_price_for_genre("Non-Fiction", 100.0)
            .unwrap();
        assert_eq!(result.total_discounted_price, 0.0);
    }

    #[test]
    fn unknown_genre_has_no_result() {
        assert!(sample_catalog()
            .calculate_discounted_price_for_genre("Mystery", 15.0)
            .is_none());
        assert!(CatalogService::default()
            .calculate_discounted_price_for_genre("Fiction", 15.0)
            .is_none());
    }

    #[test]
    fn genre_is_matched_loosely_but_echoed_verbatim() {
        let result = sample_catalog()
            .calculate_discounted_price_for_genre("fIcTiOn", 20.0)
            .unwrap();
        assert_eq!(result.genre, "fIcTiOn");
        assert_eq!(result.total_discounted_price, 100.0);
    }

    #[test]
    fn discounted_total_is_rounded_to_cents() {
        let catalog = CatalogService::default();
        for price in [10.0, 10.0, 13.33] {
            catalog.create_book(CreateBookInput {
                title: "Pamphlet".to_string(),
                author: "Anon".to_string(),
                genre: "Essay".to_string(),
                price,
            });
        }

        // 33.33 * 0.85 = 28.3305
        let result = catalog
            .calculate_discounted_price_for_genre("Essay", 15.0)
            .unwrap();
        assert_eq!(result.total_discounted_price, 28.33);
    }

    #[test]
    fn out_of_range_discount_is_applied_as_given() {
        let catalog = sample_catalog();

        let surcharge = catalog
            .calculate_discounted_price_for_genre("Science Fiction", -50.0)
            .unwrap();
        assert_eq!(surcharge.total_discounted_price, 60.0);

        let overshoot = catalog
            .calculate_discounted_price_for_genre("Science Fiction", 150.0)
            .unwrap();
        assert_eq!(overshoot.total_discounted_price, -20.0);
    }

    #[test]
    fn discount_reflects_updates_and_deletes() {
        let catalog = sample_catalog();
        catalog.update_book(
            2,
            UpdateBookInput {
                price: Some(25.0),
                ..UpdateBookInput::default()
            },
        );
        let result = catalog
            .calculate_discounted_price_for_genre("Fiction", 0.0)
            .unwrap();
        assert_eq!(result.total_discounted_price, 75.0);

        assert!(catalog.delete_book(1));
        assert!(catalog.delete_book(2));
        assert!(catalog
            .calculate_discounted_price_for_genre("Fiction", 0.0)
            .is_none());
    }

    #[test]
    fn crud_passes_through_to_the_store() {
        let catalog = sample_catalog();

        let created = catalog.create_book(CreateBookInput {
            title: "Neuromancer".to_string(),
            author: "William Gibson".to_string(),
            genre: "Science Fiction".to_string(),
            price: 18.5,
        });
        assert_eq!(created.id, 5);
        assert_eq!(catalog.get_book_by_id(5), Some(created.clone()));

        let renamed = catalog
            .update_book(
                5,
                UpdateBookInput {
                    title: Some("Count Zero".to_string()),
                    ..UpdateBookInput::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.title, "Count Zero");
        assert_eq!(renamed.price, 18.5);
        assert!(catalog.update_book(99, UpdateBookInput::default()).is_none());

        assert!(catalog.delete_book(5));
        assert!(!catalog.delete_book(5));
        assert!(catalog.get_book_by_id(5).is_none());
    }

    #[test]
    fn listing_normalizes_empty_filters() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get_all_books(None).len(), 4);

        let filters = BookFilters {
            genre: Some(String::new()),
            author: Some("orwell".to_string()),
            ..BookFilters::default()
        };
        let found = catalog.get_all_books(Some(filters));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "1984");
    }

    #[test]
    fn concurrent_creates_get_unique_ids() {
        let catalog = Arc::new(CatalogService::default());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|n| {
                            catalog
                                .create_book(CreateBookInput {
                                    title: format!("Book {worker}-{n}"),
                                    author: "Writer".to_string(),
                                    genre: "Fiction".to_string(),
                                    price: 1.0,
                                })
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<BookId> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&200));
        assert_eq!(catalog.book_count(), 200);
    }
}
