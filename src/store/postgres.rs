//! Postgres-backed record store.
//!
//! Slug uniqueness is enforced by the `UNIQUE` constraints on the catalog
//! tables; a violation (SQLSTATE 23505) is reported as `Conflict`. Ids come
//! from `BIGSERIAL` sequences and lead timestamps from `DEFAULT now()`, so
//! concurrent writers are serialized by Postgres, not by this code.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;

use super::{slug_conflict, unknown_id, RecordStore, StoreResult};
use crate::errors::{AppError, ResultExt};
use crate::models::{
    Case, CaseInput, Lead, LeadUpdate, NewLead, Product, ProductInput, Solution, SolutionInput,
};

const PRODUCT_COLUMNS: &str = "id, slug, name, screen_type, purpose, pixel_pitch, brightness, \
     refresh_rate, ip_rating, viewing_distance_min, viewing_distance_max, price_from, \
     short_description, full_description, images, warranty, lead_time, is_featured, sort_order";

const SOLUTION_COLUMNS: &str = "id, slug, name, screen_type, width, height, area, pixel_pitch, \
     brightness, included, price_from, warranty, lead_time, images, is_featured, featured_order";

const CASE_COLUMNS: &str = "id, slug, title, city, industry, task, solution, specs, duration, \
     result, images, video_url, testimonial, is_featured, featured_order";

const LEAD_COLUMNS: &str = "id, created_at, name, phone, city, message, page_url, source, \
     product_id, solution_id, status, manager_note";

type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    // ============ Products ============

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY sort_order, id",
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("listing products")
    }

    async fn get_product_by_slug(&self, slug: &str) -> StoreResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE slug = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading product '{}'", slug))?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn upsert_product(&self, product: ProductInput) -> StoreResult<Product> {
        let stored = match product.id {
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO products (slug, name, screen_type, purpose, pixel_pitch, brightness,
                        refresh_rate, ip_rating, viewing_distance_min, viewing_distance_max,
                        price_from, short_description, full_description, images, warranty,
                        lead_time, is_featured, sort_order)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                        $16, $17, $18)
                    RETURNING {}
                    "#,
                    PRODUCT_COLUMNS
                );
                bind_product(sqlx::query_as::<_, Product>(&sql), &product)
                    .fetch_one(&self.pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE products
                    SET slug = $1, name = $2, screen_type = $3, purpose = $4, pixel_pitch = $5,
                        brightness = $6, refresh_rate = $7, ip_rating = $8,
                        viewing_distance_min = $9, viewing_distance_max = $10, price_from = $11,
                        short_description = $12, full_description = $13, images = $14,
                        warranty = $15, lead_time = $16, is_featured = $17, sort_order = $18
                    WHERE id = $19
                    RETURNING {}
                    "#,
                    PRODUCT_COLUMNS
                );
                bind_product(sqlx::query_as::<_, Product>(&sql), &product)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(|e| write_error(e, "Product", &product.slug))?;

        let stored = stored.ok_or_else(|| unknown_id("Product", product.id.unwrap_or_default()))?;
        tracing::debug!("Stored product id={} slug={}", stored.id, stored.slug);
        Ok(stored)
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("deleting product {}", id))?;
        tracing::debug!("Deleted product id={} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    // ============ Solutions ============

    async fn list_solutions(&self) -> StoreResult<Vec<Solution>> {
        let sql = format!(
            "SELECT {} FROM solutions ORDER BY featured_order, id",
            SOLUTION_COLUMNS
        );
        sqlx::query_as::<_, Solution>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("listing solutions")
    }

    async fn get_solution_by_slug(&self, slug: &str) -> StoreResult<Solution> {
        let sql = format!("SELECT {} FROM solutions WHERE slug = $1", SOLUTION_COLUMNS);
        sqlx::query_as::<_, Solution>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading solution '{}'", slug))?
            .ok_or_else(|| AppError::NotFound("Solution not found".to_string()))
    }

    async fn upsert_solution(&self, solution: SolutionInput) -> StoreResult<Solution> {
        let stored = match solution.id {
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO solutions (slug, name, screen_type, width, height, area,
                        pixel_pitch, brightness, included, price_from, warranty, lead_time,
                        images, is_featured, featured_order)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                    RETURNING {}
                    "#,
                    SOLUTION_COLUMNS
                );
                bind_solution(sqlx::query_as::<_, Solution>(&sql), &solution)
                    .fetch_one(&self.pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE solutions
                    SET slug = $1, name = $2, screen_type = $3, width = $4, height = $5,
                        area = $6, pixel_pitch = $7, brightness = $8, included = $9,
                        price_from = $10, warranty = $11, lead_time = $12, images = $13,
                        is_featured = $14, featured_order = $15
                    WHERE id = $16
                    RETURNING {}
                    "#,
                    SOLUTION_COLUMNS
                );
                bind_solution(sqlx::query_as::<_, Solution>(&sql), &solution)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(|e| write_error(e, "Solution", &solution.slug))?;

        let stored =
            stored.ok_or_else(|| unknown_id("Solution", solution.id.unwrap_or_default()))?;
        tracing::debug!("Stored solution id={} slug={}", stored.id, stored.slug);
        Ok(stored)
    }

    async fn delete_solution(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM solutions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("deleting solution {}", id))?;
        tracing::debug!("Deleted solution id={} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    // ============ Cases ============

    async fn list_cases(&self) -> StoreResult<Vec<Case>> {
        let sql = format!(
            "SELECT {} FROM cases ORDER BY featured_order, id",
            CASE_COLUMNS
        );
        sqlx::query_as::<_, Case>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("listing cases")
    }

    async fn get_case_by_slug(&self, slug: &str) -> StoreResult<Case> {
        let sql = format!("SELECT {} FROM cases WHERE slug = $1", CASE_COLUMNS);
        sqlx::query_as::<_, Case>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading case '{}'", slug))?
            .ok_or_else(|| AppError::NotFound("Case not found".to_string()))
    }

    async fn upsert_case(&self, case: CaseInput) -> StoreResult<Case> {
        let stored = match case.id {
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO cases (slug, title, city, industry, task, solution, specs,
                        duration, result, images, video_url, testimonial, is_featured,
                        featured_order)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                    RETURNING {}
                    "#,
                    CASE_COLUMNS
                );
                bind_case(sqlx::query_as::<_, Case>(&sql), &case)
                    .fetch_one(&self.pool)
                    .await
                    .map(Some)
            }
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE cases
                    SET slug = $1, title = $2, city = $3, industry = $4, task = $5,
                        solution = $6, specs = $7, duration = $8, result = $9, images = $10,
                        video_url = $11, testimonial = $12, is_featured = $13,
                        featured_order = $14
                    WHERE id = $15
                    RETURNING {}
                    "#,
                    CASE_COLUMNS
                );
                bind_case(sqlx::query_as::<_, Case>(&sql), &case)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(|e| write_error(e, "Case", &case.slug))?;

        let stored = stored.ok_or_else(|| unknown_id("Case", case.id.unwrap_or_default()))?;
        tracing::debug!("Stored case id={} slug={}", stored.id, stored.slug);
        Ok(stored)
    }

    async fn delete_case(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM cases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("deleting case {}", id))?;
        tracing::debug!("Deleted case id={} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    // ============ Leads ============

    async fn list_leads(&self) -> StoreResult<Vec<Lead>> {
        let sql = format!("SELECT {} FROM leads ORDER BY id DESC", LEAD_COLUMNS);
        sqlx::query_as::<_, Lead>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("listing leads")
    }

    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead> {
        let sql = format!(
            r#"
            INSERT INTO leads (name, phone, city, message, page_url, source, product_id,
                solution_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(&lead.name)
            .bind(&lead.phone)
            .bind(&lead.city)
            .bind(&lead.message)
            .bind(&lead.page_url)
            .bind(&lead.source)
            .bind(lead.product_id.as_deref())
            .bind(lead.solution_id.as_deref())
            .bind(lead.status())
            .fetch_one(&self.pool)
            .await
            .context("inserting lead")
    }

    async fn patch_lead(&self, id: i64, update: &LeadUpdate) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET status = COALESCE($2, status),
                manager_note = COALESCE($3, manager_note)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.status.as_deref())
        .bind(update.manager_note.as_deref())
        .execute(&self.pool)
        .await
        .with_context(|| format!("updating lead {}", id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("store health check")?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn bind_product<'q>(
    query: PgQueryAs<'q, Product>,
    p: &'q ProductInput,
) -> PgQueryAs<'q, Product> {
    query
        .bind(&p.slug)
        .bind(&p.name)
        .bind(&p.screen_type)
        .bind(&p.purpose)
        .bind(&p.pixel_pitch)
        .bind(p.brightness)
        .bind(p.refresh_rate)
        .bind(&p.ip_rating)
        .bind(p.viewing_distance_min)
        .bind(p.viewing_distance_max)
        .bind(p.price_from)
        .bind(&p.short_description)
        .bind(&p.full_description)
        .bind(&p.images)
        .bind(p.warranty)
        .bind(p.lead_time)
        .bind(p.is_featured)
        .bind(p.sort_order)
}

fn bind_solution<'q>(
    query: PgQueryAs<'q, Solution>,
    s: &'q SolutionInput,
) -> PgQueryAs<'q, Solution> {
    query
        .bind(&s.slug)
        .bind(&s.name)
        .bind(&s.screen_type)
        .bind(s.width)
        .bind(s.height)
        .bind(s.area)
        .bind(&s.pixel_pitch)
        .bind(s.brightness)
        .bind(&s.included)
        .bind(s.price_from)
        .bind(s.warranty)
        .bind(s.lead_time)
        .bind(&s.images)
        .bind(s.is_featured)
        .bind(s.featured_order)
}

fn bind_case<'q>(query: PgQueryAs<'q, Case>, c: &'q CaseInput) -> PgQueryAs<'q, Case> {
    query
        .bind(&c.slug)
        .bind(&c.title)
        .bind(&c.city)
        .bind(&c.industry)
        .bind(&c.task)
        .bind(&c.solution)
        .bind(&c.specs)
        .bind(c.duration)
        .bind(&c.result)
        .bind(&c.images)
        .bind(c.video_url.as_deref())
        .bind(c.testimonial.as_deref())
        .bind(c.is_featured)
        .bind(c.featured_order)
}

fn write_error(err: sqlx::Error, kind: &str, slug: &str) -> AppError {
    if is_unique_violation(&err) {
        return slug_conflict(kind, slug);
    }
    AppError::WithContext {
        source: Box::new(err.into()),
        context: format!("writing {} '{}'", kind.to_lowercase(), slug),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}
