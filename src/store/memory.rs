//! In-memory record store.
//!
//! Used by the HTTP tests and for running the API without Postgres. Not
//! durable. Each record kind lives in its own `RwLock`ed table and mirrors
//! the Postgres backend: sequential ids starting at 1, unique slugs,
//! leads listed newest first.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{slug_conflict, unknown_id, RecordStore, StoreResult};
use crate::errors::AppError;
use crate::models::{
    Case, CaseInput, Lead, LeadUpdate, NewLead, Product, ProductInput, Solution, SolutionInput,
};

/// Rows of one kind keyed by id, plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Slug-keyed upsert shared by the three catalog tables.
fn upsert_catalog<T>(
    table: &mut Table<T>,
    kind: &str,
    id: Option<i64>,
    slug: &str,
    slug_of: impl Fn(&T) -> &str,
    build: impl FnOnce(i64) -> T,
) -> StoreResult<T>
where
    T: Clone,
{
    if let Some(id) = id {
        if !table.rows.contains_key(&id) {
            return Err(unknown_id(kind, id));
        }
    }
    let taken = table
        .rows
        .iter()
        .any(|(row_id, row)| Some(*row_id) != id && slug_of(row) == slug);
    if taken {
        return Err(slug_conflict(kind, slug));
    }

    let id = match id {
        Some(id) => id,
        None => table.allocate_id(),
    };
    let record = build(id);
    table.rows.insert(id, record.clone());
    Ok(record)
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<Table<Product>>,
    solutions: RwLock<Table<Solution>>,
    cases: RwLock<Table<Case>>,
    leads: RwLock<Table<Lead>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let table = self.products.read().await;
        let mut items: Vec<Product> = table.rows.values().cloned().collect();
        items.sort_by_key(|p| (p.sort_order, p.id));
        Ok(items)
    }

    async fn get_product_by_slug(&self, slug: &str) -> StoreResult<Product> {
        let table = self.products.read().await;
        table
            .rows
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn upsert_product(&self, product: ProductInput) -> StoreResult<Product> {
        let mut table = self.products.write().await;
        let id = product.id;
        let slug = product.slug.clone();
        upsert_catalog(
            &mut *table,
            "Product",
            id,
            &slug,
            |p| p.slug.as_str(),
            |id| product.into_record(id),
        )
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        self.products.write().await.rows.remove(&id);
        Ok(())
    }

    async fn list_solutions(&self) -> StoreResult<Vec<Solution>> {
        let table = self.solutions.read().await;
        let mut items: Vec<Solution> = table.rows.values().cloned().collect();
        items.sort_by_key(|s| (s.featured_order, s.id));
        Ok(items)
    }

    async fn get_solution_by_slug(&self, slug: &str) -> StoreResult<Solution> {
        let table = self.solutions.read().await;
        table
            .rows
            .values()
            .find(|s| s.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Solution not found".to_string()))
    }

    async fn upsert_solution(&self, solution: SolutionInput) -> StoreResult<Solution> {
        let mut table = self.solutions.write().await;
        let id = solution.id;
        let slug = solution.slug.clone();
        upsert_catalog(
            &mut *table,
            "Solution",
            id,
            &slug,
            |s| s.slug.as_str(),
            |id| solution.into_record(id),
        )
    }

    async fn delete_solution(&self, id: i64) -> StoreResult<()> {
        self.solutions.write().await.rows.remove(&id);
        Ok(())
    }

    async fn list_cases(&self) -> StoreResult<Vec<Case>> {
        let table = self.cases.read().await;
        let mut items: Vec<Case> = table.rows.values().cloned().collect();
        items.sort_by_key(|c| (c.featured_order, c.id));
        Ok(items)
    }

    async fn get_case_by_slug(&self, slug: &str) -> StoreResult<Case> {
        let table = self.cases.read().await;
        table
            .rows
            .values()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Case not found".to_string()))
    }

    async fn upsert_case(&self, case: CaseInput) -> StoreResult<Case> {
        let mut table = self.cases.write().await;
        let id = case.id;
        let slug = case.slug.clone();
        upsert_catalog(
            &mut *table,
            "Case",
            id,
            &slug,
            |c| c.slug.as_str(),
            |id| case.into_record(id),
        )
    }

    async fn delete_case(&self, id: i64) -> StoreResult<()> {
        self.cases.write().await.rows.remove(&id);
        Ok(())
    }

    async fn list_leads(&self) -> StoreResult<Vec<Lead>> {
        let table = self.leads.read().await;
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead> {
        let mut table = self.leads.write().await;
        let id = table.allocate_id();
        let record = lead.into_record(id, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn patch_lead(&self, id: i64, update: &LeadUpdate) -> StoreResult<bool> {
        let mut table = self.leads.write().await;
        match table.rows.get_mut(&id) {
            Some(lead) => {
                update.apply_to(lead);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(slug: &str, id: Option<i64>) -> ProductInput {
        serde_json::from_value(json!({ "id": id, "slug": slug, "name": slug })).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_assigns_then_replaces() {
        let store = InMemoryStore::new();
        let created = store.upsert_product(product("p1", None)).await.unwrap();
        assert_eq!(created.id, 1);

        let mut replacement = product("p1-renamed", Some(created.id));
        replacement.brightness = 5000;
        let replaced = store.upsert_product(replacement).await.unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.brightness, 5000);
        assert_eq!(store.list_products().await.unwrap().len(), 1);
        assert!(store.get_product_by_slug("p1").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let store = InMemoryStore::new();
        let first = store.upsert_product(product("p1", None)).await.unwrap();
        let second = store.upsert_product(product("p2", None)).await.unwrap();

        let err = store.upsert_product(product("p1", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = store
            .upsert_product(product("p1", Some(second.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let kept = store.get_product_by_slug("p1").await.unwrap();
        assert_eq!(kept.id, first.id);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.upsert_product(product("p1", Some(42))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_leads_listed_newest_first_and_patch_reports_missing() {
        let store = InMemoryStore::new();
        for name in ["a", "b", "c"] {
            let lead: NewLead =
                serde_json::from_value(json!({ "name": name, "phone": "1" })).unwrap();
            store.create_lead(lead).await.unwrap();
        }
        let ids: Vec<i64> = store.list_leads().await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let update = LeadUpdate {
            status: Some("done".to_string()),
            manager_note: None,
        };
        assert!(store.patch_lead(2, &update).await.unwrap());
        assert!(!store.patch_lead(99, &update).await.unwrap());
    }
}
