use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Retrieve<T> {
    type Key;
    async fn retrieve(&self, key: Self::Key) -> Result<T>;
}

#[async_trait]
pub trait Insert<T> {
    async fn insert(&self, item: T) -> Result<T>;
}

/// All-or-nothing creation of a series of records.
///
/// Implementations run the whole batch inside one store transaction.
/// Rows after the first that carry a recurrence group id get their
/// parent_transaction_id set to the first row's assigned id.
#[async_trait]
pub trait InsertBatch<T> {
    async fn insert_batch(&self, items: Vec<T>) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Update<T> {
    async fn update(&self, item: T) -> Result<T>;
}

#[async_trait]
pub trait Delete<T> {
    async fn delete(&self, item: T) -> Result<()>;
}

#[async_trait]
pub trait DeleteGroup<T> {
    type Group;
    async fn delete_group(&self, group: Self::Group) -> Result<()>;
}

#[async_trait]
pub trait UpdateGroup<T> {
    type Group;
    type Patch;
    async fn update_group(&self, group: Self::Group, patch: &Self::Patch) -> Result<Vec<T>>;
}
