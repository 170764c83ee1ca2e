//! Record store for the catalog and leads.
//!
//! Handlers only see [`RecordStore`]; the server wires in
//! [`postgres::PostgresStore`], tests use [`memory::InMemoryStore`].
//! Every mutation is durable when the call returns and no call spans
//! more than one record kind.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    Case, CaseInput, Lead, LeadUpdate, NewLead, Product, ProductInput, Solution, SolutionInput,
};

pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, AppError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    /// `NotFound` when no product has this slug.
    async fn get_product_by_slug(&self, slug: &str) -> StoreResult<Product>;
    /// Inserts when `id` is absent, otherwise replaces the whole row.
    /// `Conflict` when the slug belongs to another row, `NotFound` for an unknown `id`.
    async fn upsert_product(&self, product: ProductInput) -> StoreResult<Product>;
    /// Deleting an unknown id is a no-op.
    async fn delete_product(&self, id: i64) -> StoreResult<()>;

    async fn list_solutions(&self) -> StoreResult<Vec<Solution>>;
    async fn get_solution_by_slug(&self, slug: &str) -> StoreResult<Solution>;
    async fn upsert_solution(&self, solution: SolutionInput) -> StoreResult<Solution>;
    async fn delete_solution(&self, id: i64) -> StoreResult<()>;

    async fn list_cases(&self) -> StoreResult<Vec<Case>>;
    async fn get_case_by_slug(&self, slug: &str) -> StoreResult<Case>;
    async fn upsert_case(&self, case: CaseInput) -> StoreResult<Case>;
    async fn delete_case(&self, id: i64) -> StoreResult<()>;

    /// Most recent first (descending id).
    async fn list_leads(&self) -> StoreResult<Vec<Lead>>;
    /// Always inserts a new row; id and creation time are assigned here.
    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead>;
    /// Applies only the supplied fields. Returns `false` when no lead has this id.
    async fn patch_lead(&self, id: i64, update: &LeadUpdate) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

pub(crate) fn slug_conflict(kind: &str, slug: &str) -> AppError {
    AppError::Conflict(format!("{} with slug '{}' already exists", kind, slug))
}

pub(crate) fn unknown_id(kind: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", kind, id))
}
