use serde::{Deserialize, Serialize};

/// Identifier assigned by the store; never reused.
pub type BookId = u64;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
}

impl Book {
    /// Merge the fields present in `changes` onto this record. The id is
    /// not part of [`UpdateBookInput`] and so can never change.
    pub fn apply(&mut self, changes: UpdateBookInput) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(genre) = changes.genre {
            self.genre = genre;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
    }
}

/// Fields of a new book. Callers validate non-empty text and a positive price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookInput {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Catalog query. Every field is optional and the present ones are ANDed:
/// `genre` is an exact case-insensitive match, `author` and `title` are
/// case-insensitive substrings, `min_price`/`max_price` are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl BookFilters {
    /// Drop empty text fields so that they read as absent.
    pub fn normalized(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            genre: non_empty(self.genre),
            author: non_empty(self.author),
            title: non_empty(self.title),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    /// True when no field constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        blank(&self.genre)
            && blank(&self.author)
            && blank(&self.title)
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

/// Outcome of pricing a whole genre at a percentage discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Genre exactly as the caller spelled it
    pub genre: String,
    pub discount_percentage: f64,
    /// Rounded to two decimal places
    pub total_discounted_price: f64,
}
