//! HTTP handlers for the Books module.
//!
//! Handlers own all input validation; the catalog below them assumes
//! well-formed input.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;

use super::models::{Book, BookFilters, BookId, CreateBookInput, DiscountResult, UpdateBookInput};
use super::service::CatalogService;

type Catalog = State<Arc<CatalogService>>;

/// Router for the Books module, relative to its mount point.
pub fn router(catalog: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        // Static segments win over `{id}` regardless of registration order.
        .route("/discounted-price", get(discounted_price))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(catalog)
}

/// Query string of `GET /`. Prices arrive as text so that malformed
/// numbers can be reported by name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQuery {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListBooksQuery {
    fn into_filters(self) -> AppResult<BookFilters> {
        Ok(BookFilters {
            min_price: parse_price_param("minPrice", self.min_price.as_deref())?,
            max_price: parse_price_param("maxPrice", self.max_price.as_deref())?,
            genre: self.genre,
            author: self.author,
            title: self.title,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscountQuery {
    pub genre: Option<String>,
    pub discount: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<f64>,
}

impl CreateBookPayload {
    fn validate(self) -> AppResult<CreateBookInput> {
        let mut details = Vec::new();
        let title = required_text("title", self.title, &mut details);
        let author = required_text("author", self.author, &mut details);
        let genre = required_text("genre", self.genre, &mut details);
        let price = match self.price {
            Some(price) if price > 0.0 => Some(price),
            Some(_) => {
                details.push(field_error("price", "must be greater than 0"));
                None
            }
            None => {
                details.push(field_error("price", "required"));
                None
            }
        };

        match (title, author, genre, price) {
            (Some(title), Some(author), Some(genre), Some(price)) if details.is_empty() => {
                Ok(CreateBookInput {
                    title,
                    author,
                    genre,
                    price,
                })
            }
            _ => Err(AppError::validation(
                details,
                "Invalid input. Required fields: title, author, genre, price (> 0).",
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<f64>,
}

impl UpdateBookPayload {
    fn validate(self) -> AppResult<UpdateBookInput> {
        let mut details = Vec::new();
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ] {
            if value.as_deref().is_some_and(str::is_empty) {
                details.push(field_error(field, "must not be empty"));
            }
        }
        if self.price.is_some_and(|price| price <= 0.0) {
            details.push(field_error("price", "must be greater than 0"));
        }

        if !details.is_empty() {
            return Err(AppError::validation(
                details,
                "Price must be a number greater than 0 and text fields must not be empty.",
            ));
        }

        Ok(UpdateBookInput {
            title: self.title,
            author: self.author,
            genre: self.genre,
            price: self.price,
        })
    }
}

fn field_error(field: &str, error: &str) -> serde_json::Value {
    json!({ "field": field, "error": error })
}

fn required_text(
    field: &str,
    value: Option<String>,
    details: &mut Vec<serde_json::Value>,
) -> Option<String> {
    match value {
        Some(text) if !text.is_empty() => Some(text),
        _ => {
            details.push(field_error(field, "required"));
            None
        }
    }
}

/// Empty parameters count as absent.
fn parse_price_param(name: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if !value.is_nan() => Ok(Some(value)),
            _ => Err(AppError::bad_request(format!("Invalid {name} parameter."))),
        },
    }
}

fn parse_book_id(raw: &str) -> AppResult<BookId> {
    raw.parse::<BookId>()
        .map_err(|_| AppError::bad_request("Invalid book ID."))
}

fn book_not_found(id: BookId) -> AppError {
    AppError::not_found(format!("Book with ID {id} not found."))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(catalog): Catalog,
    Query(query): Query<ListBooksQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let filters = query.into_filters()?;
    Ok(Json(catalog.get_all_books(Some(filters))))
}

async fn create_book(
    State(catalog): Catalog,
    payload: Result<Json<CreateBookPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let input = json_body(payload)?.validate()?;
    Ok((StatusCode::CREATED, Json(catalog.create_book(input))))
}

async fn get_book(State(catalog): Catalog, Path(raw_id): Path<String>) -> AppResult<Json<Book>> {
    let id = parse_book_id(&raw_id)?;
    catalog
        .get_book_by_id(id)
        .map(Json)
        .ok_or_else(|| book_not_found(id))
}

async fn update_book(
    State(catalog): Catalog,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateBookPayload>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let id = parse_book_id(&raw_id)?;
    let changes = json_body(payload)?.validate()?;
    catalog
        .update_book(id, changes)
        .map(Json)
        .ok_or_else(|| book_not_found(id))
}

async fn delete_book(State(catalog): Catalog, Path(raw_id): Path<String>) -> AppResult<StatusCode> {
    let id = parse_book_id(&raw_id)?;
    if catalog.delete_book(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(book_not_found(id))
    }
}

async fn discounted_price(
    State(catalog): Catalog,
    Query(query): Query<DiscountQuery>,
) -> AppResult<Json<DiscountResult>> {
    let genre = query
        .genre
        .filter(|genre| !genre.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing or invalid \"genre\" query parameter."))?;

    let discount_percentage = query
        .discount
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|discount| (0.0..=100.0).contains(discount))
        .ok_or_else(|| {
            AppError::bad_request(
                "Missing or invalid \"discount\" percentage (must be between 0 and 100).",
            )
        })?;

    catalog
        .calculate_discounted_price_for_genre(&genre, discount_percentage)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("No books found for genre: {genre}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_params_accept_numbers_and_blank() {
        assert_eq!(parse_price_param("minPrice", None).unwrap(), None);
        assert_eq!(parse_price_param("minPrice", Some("")).unwrap(), None);
        assert_eq!(
            parse_price_param("maxPrice", Some("59.5")).unwrap(),
            Some(59.5)
        );
    }

    #[test]
    fn price_params_reject_garbage_by_name() {
        let err = parse_price_param("maxPrice", Some("cheap")).unwrap_err();
        assert_eq!(err.to_string(), "bad request: Invalid maxPrice parameter.");
        assert!(parse_price_param("minPrice", Some("NaN")).is_err());
    }

    #[test]
    fn book_ids_must_be_non_negative_integers() {
        assert_eq!(parse_book_id("7").unwrap(), 7);
        assert!(parse_book_id("seven").is_err());
        assert!(parse_book_id("-1").is_err());
        assert!(parse_book_id("1.5").is_err());
    }

    #[test]
    fn create_payload_reports_every_bad_field() {
        let payload = CreateBookPayload {
            title: Some(String::new()),
            author: None,
            genre: Some("Fiction".to_string()),
            price: Some(0.0),
        };
        match payload.validate().unwrap_err() {
            AppError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d["field"].clone()).collect();
                assert_eq!(fields, vec![json!("title"), json!("author"), json!("price")]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn update_payload_allows_partial_changes() {
        let changes = UpdateBookPayload {
            price: Some(80.0),
            ..UpdateBookPayload::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.price, Some(80.0));
        assert_eq!(changes.title, None);

        assert!(UpdateBookPayload {
            price: Some(-3.0),
            ..UpdateBookPayload::default()
        }
        .validate()
        .is_err());
        assert!(UpdateBookPayload {
            genre: Some(String::new()),
            ..UpdateBookPayload::default()
        }
        .validate()
        .is_err());
    }
}
