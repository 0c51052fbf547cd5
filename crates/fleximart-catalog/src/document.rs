//! Document trait for typed collection access
//!
//! Implementing types bind a serde-serializable struct to a named
//! collection and get typed CRUD operations with automatic BSON
//! conversion. Catalog documents are created and mutated but never
//! deleted, so no delete operations are exposed here.

use async_trait::async_trait;
use bson::{oid::ObjectId, Document as BsonDocument};
use fleximart_common::CatalogError;
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{de::DeserializeOwned, Serialize};

use crate::Result;

#[async_trait]
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Get the collection name for this document type
    fn collection_name() -> &'static str;

    /// Get the document's ObjectId (if it has one)
    fn get_id(&self) -> Option<ObjectId> {
        None
    }

    /// Set the document's ObjectId
    fn set_id(&mut self, _id: ObjectId) {}

    /// Convert document to BSON
    fn to_bson(&self) -> Result<BsonDocument> {
        Ok(bson::to_document(self)?)
    }

    /// Create document from BSON
    fn from_bson(doc: BsonDocument) -> Result<Self> {
        Ok(bson::from_document(doc)?)
    }

    /// Get the untyped collection for this document type
    fn collection(db: &Database) -> Collection<BsonDocument> {
        db.collection(Self::collection_name())
    }

    /// Insert this document, returning the server-assigned ObjectId
    async fn insert_one(&mut self, db: &Database) -> Result<ObjectId> {
        let collection = Self::collection(db);
        let bson_doc = self.to_bson()?;

        let result = collection.insert_one(bson_doc).await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| CatalogError::Database("Invalid inserted ID".to_string()))?;

        self.set_id(id);

        Ok(id)
    }

    /// Insert a batch of documents, returning ObjectIds in batch order
    async fn insert_many(db: &Database, docs: &[Self]) -> Result<Vec<ObjectId>> {
        if docs.is_empty() {
            return Err(CatalogError::Query(
                "Cannot insert an empty batch".to_string(),
            ));
        }

        let collection = Self::collection(db);
        let bson_docs = docs
            .iter()
            .map(|d| d.to_bson())
            .collect::<Result<Vec<_>>>()?;

        let result = collection.insert_many(bson_docs).await?;

        // inserted_ids is keyed by batch index; restore batch order
        let mut indexed: Vec<(usize, ObjectId)> = result
            .inserted_ids
            .iter()
            .filter_map(|(idx, v)| v.as_object_id().map(|oid| (*idx, oid)))
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);

        Ok(indexed.into_iter().map(|(_, oid)| oid).collect())
    }

    /// Find a single document matching the filter
    async fn find_one(db: &Database, filter: BsonDocument) -> Result<Option<Self>> {
        let collection = Self::collection(db);

        let result = collection.find_one(filter).await?;

        match result {
            Some(doc) => Ok(Some(Self::from_bson(doc)?)),
            None => Ok(None),
        }
    }

    /// Find all documents matching the filter
    async fn find(db: &Database, filter: BsonDocument) -> Result<Vec<Self>> {
        let collection = Self::collection(db);

        let cursor = collection.find(filter).await?;

        let docs: Vec<BsonDocument> = cursor.try_collect().await?;

        docs.into_iter().map(Self::from_bson).collect()
    }

    /// Update a single document matching the filter
    ///
    /// The update document must carry its own operators (`$set`, `$push`,
    /// ...). Returns true if a document was modified.
    async fn update_one(db: &Database, filter: BsonDocument, update: BsonDocument) -> Result<bool> {
        let collection = Self::collection(db);

        let result = collection.update_one(filter, update).await?;

        Ok(result.modified_count > 0)
    }

    /// Count documents matching the filter
    async fn count(db: &Database, filter: BsonDocument) -> Result<u64> {
        let collection = Self::collection(db);

        Ok(collection.count_documents(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestDoc {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        name: String,
        value: i32,
    }

    impl Document for TestDoc {
        fn collection_name() -> &'static str {
            "test_docs"
        }

        fn get_id(&self) -> Option<ObjectId> {
            self.id
        }

        fn set_id(&mut self, id: ObjectId) {
            self.id = Some(id);
        }
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(TestDoc::collection_name(), "test_docs");
    }

    #[test]
    fn test_to_bson() {
        let doc = TestDoc {
            id: None,
            name: "test".to_string(),
            value: 42,
        };

        let bson = doc.to_bson().unwrap();
        assert_eq!(bson.get_str("name").unwrap(), "test");
        assert_eq!(bson.get_i32("value").unwrap(), 42);
        assert!(!bson.contains_key("_id"));
    }

    #[test]
    fn test_from_bson() {
        let bson = doc! {
            "name": "test",
            "value": 42
        };

        let doc = TestDoc::from_bson(bson).unwrap();
        assert_eq!(doc.name, "test");
        assert_eq!(doc.value, 42);
    }

    #[test]
    fn test_insert_many_rejects_empty_batch() {
        use fleximart_common::CatalogError;

        tokio_test::block_on(async {
            let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
                .await
                .unwrap();
            let db = client.database("fleximart_test");

            let err = TestDoc::insert_many(&db, &[]).await.unwrap_err();
            assert!(matches!(err, CatalogError::Query(_)));
        });
    }

    #[test]
    fn test_roundtrip() {
        let original = TestDoc {
            id: Some(ObjectId::new()),
            name: "roundtrip".to_string(),
            value: 100,
        };

        let bson = original.to_bson().unwrap();
        let recovered = TestDoc::from_bson(bson).unwrap();

        assert_eq!(original, recovered);
    }
}
