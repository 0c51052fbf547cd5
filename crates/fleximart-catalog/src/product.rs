//! Product and review document types
//!
//! `Product` is the catalog document stored in the `products` collection.
//! The remaining types are row shapes produced by projections and
//! aggregation pipelines; they only ever come back from the server.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use fleximart_common::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::document::Document;
use crate::Result;

/// A customer review embedded in a product document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub user: String,
    pub rating: i32,
    pub comment: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
}

impl Review {
    /// Build a review, enforcing the 1..=5 rating scale
    pub fn new(
        user: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(CatalogError::Validation(format!(
                "Review rating must be between 1 and 5, got {}",
                rating
            )));
        }

        Ok(Self {
            user: user.into(),
            rating,
            comment: comment.into(),
            date,
        })
    }
}

/// A product document in the `products` collection
///
/// `reviews` may be absent on documents that never received one; the
/// review-analysis pipeline accounts for that with `$ifNull`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    pub specs: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

impl Document for Product {
    fn collection_name() -> &'static str {
        "products"
    }

    fn get_id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

/// Row shape of the filtered catalog search (`_id` projected out)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProductSummary {
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

/// Row shape of the review-analysis pipeline
///
/// Products without reviews produce a null average and are dropped by the
/// pipeline's `$match` stage, so `avg_rating` is always present here.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RatedProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub avg_rating: f64,
    pub review_count: i32,
}

/// Row shape of the per-category statistics pipeline
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub avg_price: f64,
    pub product_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use chrono::TimeZone;

    fn sample_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_review_rating_bounds() {
        assert!(Review::new("U001", 1, "ok", sample_date()).is_ok());
        assert!(Review::new("U001", 5, "great", sample_date()).is_ok());
        assert!(Review::new("U001", 0, "bad", sample_date()).is_err());
        assert!(Review::new("U001", 6, "too good", sample_date()).is_err());
        assert!(Review::new("U001", -3, "nope", sample_date()).is_err());
    }

    #[test]
    fn test_review_rejection_is_validation_error() {
        let err = Review::new("U001", 9, "x", sample_date()).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_product_collection_name() {
        assert_eq!(Product::collection_name(), "products");
    }

    #[test]
    fn test_product_bson_roundtrip() {
        let mut specs = HashMap::new();
        specs.insert("ram".to_string(), "8GB".to_string());
        specs.insert("storage".to_string(), "128GB".to_string());

        let product = Product {
            id: None,
            product_id: "ELEC001".to_string(),
            name: "Samsung Galaxy S21".to_string(),
            category: "Electronics".to_string(),
            price: 799.99,
            stock: 150,
            specs,
            reviews: Some(vec![
                Review::new("U001", 5, "Great!", sample_date()).unwrap()
            ]),
        };

        let bson = product.to_bson().unwrap();
        assert_eq!(bson.get_str("product_id").unwrap(), "ELEC001");
        assert_eq!(bson.get_f64("price").unwrap(), 799.99);
        assert!(!bson.contains_key("_id"));

        let recovered = Product::from_bson(bson).unwrap();
        assert_eq!(recovered, product);
    }

    #[test]
    fn test_product_without_reviews_deserializes() {
        let bson = doc! {
            "product_id": "SHOE002",
            "name": "Trail Runner",
            "category": "Footwear",
            "price": 89.5,
            "stock": 12,
            "specs": { "size": "9" }
        };

        let product = Product::from_bson(bson).unwrap();
        assert!(product.reviews.is_none());
    }

    #[test]
    fn test_product_without_reviews_serializes_without_field() {
        let product = Product {
            id: None,
            product_id: "SHOE002".to_string(),
            name: "Trail Runner".to_string(),
            category: "Footwear".to_string(),
            price: 89.5,
            stock: 12,
            specs: HashMap::new(),
            reviews: None,
        };

        let bson = product.to_bson().unwrap();
        assert!(!bson.contains_key("reviews"));
    }

    #[test]
    fn test_product_summary_from_projection_row() {
        let row = doc! { "name": "MacBook Pro 14", "price": 1999.99, "stock": 45 };
        let summary: ProductSummary = bson::from_document(row).unwrap();
        assert_eq!(summary.name, "MacBook Pro 14");
        assert_eq!(summary.stock, 45);
    }

    #[test]
    fn test_category_stats_accepts_int32_count() {
        // $sum: 1 yields int32 for small groups
        let row = doc! { "category": "Electronics", "avg_price": 1399.99, "product_count": 2_i32 };
        let stats: CategoryStats = bson::from_document(row).unwrap();
        assert_eq!(stats.product_count, 2);
    }

    #[test]
    fn test_rated_product_row() {
        let row = doc! {
            "name": "Samsung Galaxy S21",
            "category": "Electronics",
            "price": 799.99,
            "avg_rating": 4.5,
            "review_count": 2_i32
        };
        let rated: RatedProduct = bson::from_document(row).unwrap();
        assert_eq!(rated.avg_rating, 4.5);
        assert_eq!(rated.review_count, 2);
    }
}
