//! Query builder for find operations

use bson::{Bson, Document as BsonDocument};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use crate::validation::{validate_filter, ValidatedCollectionName};
use crate::Result;

/// Builder for find operations with projection, sorting and pagination
pub struct QueryBuilder {
    collection_name: ValidatedCollectionName,
    filter: BsonDocument,
    projection: Option<BsonDocument>,
    sort: Option<BsonDocument>,
    skip: Option<u64>,
    limit: Option<i64>,
}

impl QueryBuilder {
    /// Create a new query builder for a collection
    pub fn new(collection_name: ValidatedCollectionName) -> Self {
        Self {
            collection_name,
            filter: BsonDocument::new(),
            projection: None,
            sort: None,
            skip: None,
            limit: None,
        }
    }

    /// Set the filter document
    pub fn filter(mut self, filter: BsonDocument) -> Self {
        self.filter = filter;
        self
    }

    /// Set the fields to include/exclude in returned rows
    pub fn projection(mut self, projection: BsonDocument) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the sort order
    pub fn sort(mut self, sort: BsonDocument) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the number of documents to skip
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of documents to return
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Get the collection name
    pub fn collection_name(&self) -> &str {
        self.collection_name.as_str()
    }

    /// Get the filter document
    pub fn get_filter(&self) -> &BsonDocument {
        &self.filter
    }

    /// Get the projection document
    pub fn get_projection(&self) -> Option<&BsonDocument> {
        self.projection.as_ref()
    }

    /// Get the sort document
    pub fn get_sort(&self) -> Option<&BsonDocument> {
        self.sort.as_ref()
    }

    /// Get the skip value
    pub fn get_skip(&self) -> Option<u64> {
        self.skip
    }

    /// Get the limit value
    pub fn get_limit(&self) -> Option<i64> {
        self.limit
    }

    /// Execute the query and return all matching rows
    ///
    /// The filter is validated for forbidden operators before dispatch.
    pub async fn to_list(self, db: &Database) -> Result<Vec<BsonDocument>> {
        validate_filter(&Bson::Document(self.filter.clone()))?;

        let collection: Collection<BsonDocument> = db.collection(self.collection_name.as_str());

        let mut options = FindOptions::default();
        options.projection = self.projection;
        options.sort = self.sort;
        options.skip = self.skip;
        options.limit = self.limit;

        let cursor = collection.find(self.filter).with_options(options).await?;

        let results: Vec<BsonDocument> = cursor.try_collect().await?;

        Ok(results)
    }
}
