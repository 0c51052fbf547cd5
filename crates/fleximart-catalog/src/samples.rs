//! Canned FlexiMart sample catalog
//!
//! Seed data for the bulk-load operation: two Electronics products and one
//! Footwear product, each with specs and an initial review.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

use crate::product::{Product, Review};

/// The sample product batch used by the `seed` operation
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: None,
            product_id: "ELEC001".to_string(),
            name: "Samsung Galaxy S21".to_string(),
            category: "Electronics".to_string(),
            price: 799.99,
            stock: 150,
            specs: specs(&[("ram", "8GB"), ("storage", "128GB")]),
            reviews: Some(vec![Review {
                user: "U001".to_string(),
                rating: 5,
                comment: "Great!".to_string(),
                date: seed_date(2024, 1, 15),
            }]),
        },
        Product {
            id: None,
            product_id: "ELEC002".to_string(),
            name: "MacBook Pro 14".to_string(),
            category: "Electronics".to_string(),
            price: 1999.99,
            stock: 45,
            specs: specs(&[
                ("ram", "16GB"),
                ("storage", "512GB SSD"),
                ("processor", "Apple M2"),
            ]),
            reviews: Some(vec![Review {
                user: "U003".to_string(),
                rating: 5,
                comment: "Excellent performance".to_string(),
                date: seed_date(2024, 2, 1),
            }]),
        },
        Product {
            id: None,
            product_id: "SHOE001".to_string(),
            name: "Nike Air Max 270".to_string(),
            category: "Footwear".to_string(),
            price: 150.00,
            stock: 300,
            specs: specs(&[("size", "10"), ("color", "Black/White")]),
            reviews: Some(vec![Review {
                user: "U010".to_string(),
                rating: 4,
                comment: "Comfortable".to_string(),
                date: seed_date(2024, 1, 18),
            }]),
        },
    ]
}

// Seed dates are literal calendar days; midnight UTC like the source data.
fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn specs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
