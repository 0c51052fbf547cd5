//! Catalog operations over the `products` collection
//!
//! `ProductStore` binds a database handle to the products collection and
//! exposes the catalog operations: bulk load, filtered search, review
//! analysis, review append and category statistics.

use bson::{doc, oid::ObjectId, Document as BsonDocument};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::{debug, info};

use crate::connection::Connection;
use crate::document::Document;
use crate::pipeline::Pipeline;
use crate::product::{CategoryStats, Product, ProductSummary, RatedProduct, Review};
use crate::query::QueryBuilder;
use crate::validation::ValidatedCollectionName;
use crate::Result;

/// Data-access handle for the product catalog
pub struct ProductStore {
    db: Database,
    collection_name: ValidatedCollectionName,
}

impl ProductStore {
    /// Create a store bound to the connection's default database
    pub fn new(connection: &Connection) -> Result<Self> {
        let collection_name = ValidatedCollectionName::new(Product::collection_name())?;

        Ok(Self {
            db: connection.database().clone(),
            collection_name,
        })
    }

    /// Declare the unique index on `product_id`
    ///
    /// Idempotent on the server side; safe to call at every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "product_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let result = Product::collection(&self.db).create_index(index).await?;
        debug!(index = %result.index_name, "ensured unique index on product_id");

        Ok(())
    }

    /// Bulk-load products in a single insert batch
    ///
    /// Returns the server-assigned ObjectIds in batch order. A duplicate
    /// `product_id` in the batch surfaces as `CatalogError::Conflict`.
    pub async fn load_products(&self, products: &[Product]) -> Result<Vec<ObjectId>> {
        let ids = Product::insert_many(&self.db, products).await?;
        info!(count = ids.len(), "loaded products");

        Ok(ids)
    }

    /// Products in a category priced strictly under `max_price`
    ///
    /// Returns name/price/stock rows; `_id` is projected out server-side.
    pub async fn find_by_category_under(
        &self,
        category: &str,
        max_price: f64,
    ) -> Result<Vec<ProductSummary>> {
        let filter = catalog_search_filter(category, max_price);
        debug!(?filter, "catalog search");

        let rows = QueryBuilder::new(self.collection_name.clone())
            .filter(filter)
            .projection(catalog_search_projection())
            .to_list(&self.db)
            .await?;

        let summaries = rows
            .into_iter()
            .map(|row| Ok(bson::from_document(row)?))
            .collect::<Result<Vec<_>>>()?;
        info!(
            category,
            max_price,
            count = summaries.len(),
            "catalog search done"
        );

        Ok(summaries)
    }

    /// Products whose average review rating is at least `min_avg_rating`
    ///
    /// Products without reviews average to null and are dropped by the
    /// `$match` stage; their review count would be 0 via `$ifNull`.
    pub async fn top_rated(&self, min_avg_rating: f64) -> Result<Vec<RatedProduct>> {
        let rows = Pipeline::new(self.collection_name.clone())
            .project(rating_projection())
            .match_stage(min_rating_filter(min_avg_rating))
            .sort(doc! { "avg_rating": -1 })
            .run(&self.db)
            .await?;

        let rated = rows
            .into_iter()
            .map(|row| Ok(bson::from_document(row)?))
            .collect::<Result<Vec<_>>>()?;
        info!(min_avg_rating, count = rated.len(), "review analysis done");

        Ok(rated)
    }

    /// Append a review to the product with the given `product_id`
    ///
    /// Returns false when no product matched; an unknown id is not an
    /// error. The rating scale is re-checked before the request is issued.
    pub async fn add_review(&self, product_id: &str, review: &Review) -> Result<bool> {
        // Re-validate in case the review was built without `Review::new`
        Review::new(
            review.user.as_str(),
            review.rating,
            review.comment.as_str(),
            review.date,
        )?;

        let update = doc! { "$push": { "reviews": bson::to_bson(review)? } };
        let modified =
            Product::update_one(&self.db, doc! { "product_id": product_id }, update).await?;
        info!(product_id, modified, "review append done");

        Ok(modified)
    }

    /// Average price and product count per category
    ///
    /// Averages are rounded to 2 decimals server-side; rows are sorted by
    /// average price descending.
    pub async fn category_stats(&self) -> Result<Vec<CategoryStats>> {
        let rows = Pipeline::new(self.collection_name.clone())
            .group(category_group())
            .project(category_projection())
            .sort(doc! { "avg_price": -1 })
            .run(&self.db)
            .await?;

        let stats = rows
            .into_iter()
            .map(|row| Ok(bson::from_document(row)?))
            .collect::<Result<Vec<_>>>()?;
        info!(categories = stats.len(), "category statistics done");

        Ok(stats)
    }

    /// Fetch one product by its catalog id
    pub async fn find_product(&self, product_id: &str) -> Result<Option<Product>> {
        Product::find_one(&self.db, doc! { "product_id": product_id }).await
    }

    /// Total number of products in the catalog
    pub async fn count_products(&self) -> Result<u64> {
        Product::count(&self.db, doc! {}).await
    }
}

fn catalog_search_filter(category: &str, max_price: f64) -> BsonDocument {
    doc! {
        "category": category,
        "price": { "$lt": max_price }
    }
}

fn catalog_search_projection() -> BsonDocument {
    doc! { "_id": 0, "name": 1, "price": 1, "stock": 1 }
}

fn rating_projection() -> BsonDocument {
    doc! {
        "name": 1,
        "category": 1,
        "price": 1,
        "avg_rating": { "$avg": "$reviews.rating" },
        "review_count": { "$size": { "$ifNull": ["$reviews", []] } }
    }
}

fn min_rating_filter(min_avg_rating: f64) -> BsonDocument {
    doc! { "avg_rating": { "$gte": min_avg_rating } }
}

fn category_group() -> BsonDocument {
    doc! {
        "_id": "$category",
        "avg_price": { "$avg": "$price" },
        "product_count": { "$sum": 1 }
    }
}

fn category_projection() -> BsonDocument {
    doc! {
        "_id": 0,
        "category": "$_id",
        "avg_price": { "$round": ["$avg_price", 2] },
        "product_count": 1
    }
}
