//! Aggregation pipeline builder
//!
//! Thin builder over the server-side aggregation framework: stages are
//! accumulated as BSON documents in order and executed with `aggregate`.

use bson::{doc, Bson, Document as BsonDocument};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::validation::ValidatedCollectionName;
use crate::Result;

/// Ordered sequence of aggregation stages for one collection
pub struct Pipeline {
    collection_name: ValidatedCollectionName,
    stages: Vec<BsonDocument>,
}

impl Pipeline {
    /// Create an empty pipeline for a collection
    pub fn new(collection_name: ValidatedCollectionName) -> Self {
        Self {
            collection_name,
            stages: Vec::new(),
        }
    }

    /// Append a `$project` stage
    pub fn project(mut self, spec: BsonDocument) -> Self {
        self.stages.push(doc! { "$project": spec });
        self
    }

    /// Append a `$match` stage
    pub fn match_stage(mut self, filter: BsonDocument) -> Self {
        self.stages.push(doc! { "$match": filter });
        self
    }

    /// Append a `$group` stage
    pub fn group(mut self, spec: BsonDocument) -> Self {
        self.stages.push(doc! { "$group": spec });
        self
    }

    /// Append a `$sort` stage
    pub fn sort(mut self, spec: BsonDocument) -> Self {
        self.stages.push(doc! { "$sort": spec });
        self
    }

    /// Append an arbitrary stage document
    pub fn stage(mut self, stage: BsonDocument) -> Self {
        self.stages.push(stage);
        self
    }

    /// Get the collection name
    pub fn collection_name(&self) -> &str {
        self.collection_name.as_str()
    }

    /// Borrow the accumulated stages
    pub fn stages(&self) -> &[BsonDocument] {
        &self.stages
    }

    /// Execute the pipeline and collect all result rows
    pub async fn run(self, db: &Database) -> Result<Vec<BsonDocument>> {
        for stage in &self.stages {
            crate::validation::validate_filter(&Bson::Document(stage.clone()))?;
        }

        let collection: Collection<BsonDocument> =
            db.collection(self.collection_name.as_str());

        let cursor = collection.aggregate(self.stages).await?;

        let rows: Vec<BsonDocument> = cursor.try_collect().await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> ValidatedCollectionName {
        ValidatedCollectionName::new("products").unwrap()
    }

    #[test]
    fn test_empty_pipeline() {
        let p = Pipeline::new(products());
        assert_eq!(p.collection_name(), "products");
        assert!(p.stages().is_empty());
    }

    #[test]
    fn test_stage_order_preserved() {
        let p = Pipeline::new(products())
            .project(doc! { "name": 1 })
            .match_stage(doc! { "price": { "$gte": 100.0 } })
            .sort(doc! { "price": -1 });

        let stages = p.stages();
        assert_eq!(stages.len(), 3);
        assert!(stages[0].contains_key("$project"));
        assert!(stages[1].contains_key("$match"));
        assert!(stages[2].contains_key("$sort"));
    }

    #[test]
    fn test_group_stage_shape() {
        let p = Pipeline::new(products()).group(doc! {
            "_id": "$category",
            "avg_price": { "$avg": "$price" },
            "product_count": { "$sum": 1 }
        });

        let stage = &p.stages()[0];
        let group = stage.get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$category");
        assert!(group.contains_key("avg_price"));
        assert!(group.contains_key("product_count"));
    }

    #[test]
    fn test_custom_stage() {
        let p = Pipeline::new(products()).stage(doc! { "$limit": 5 });
        assert!(p.stages()[0].contains_key("$limit"));
    }

    #[test]
    fn test_run_rejects_javascript_accumulator() {
        use fleximart_common::CatalogError;

        tokio_test::block_on(async {
            let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
                .await
                .unwrap();
            let db = client.database("fleximart_test");

            let err = Pipeline::new(products())
                .group(doc! {
                    "_id": "$category",
                    "total": { "$accumulator": { "init": "function() {}" } }
                })
                .run(&db)
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        });
    }
}
