//! Backend PostgreSQL del almacén de documentos
//!
//! Cada colección es una tabla `(id TEXT PRIMARY KEY, doc JSONB NOT NULL)`.
//! Los filtros se traducen a expresiones JSONB con `QueryBuilder`; los
//! nombres de campo siempre viajan como parámetros.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use super::record_store::{
    document_id, Collection, Condition, Document, Filter, RecordStore, StoreError, StoreResult,
    Update,
};

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    builder.push(" WHERE TRUE");
    for condition in filter.conditions() {
        builder.push(" AND ");
        match condition {
            Condition::Eq(field, value) => {
                builder
                    .push("doc -> ")
                    .push_bind(*field)
                    .push(" = ")
                    .push_bind(Json(value.clone()));
            }
            Condition::In(field, values) => {
                builder
                    .push("doc ->> ")
                    .push_bind(*field)
                    .push(" = ANY(")
                    .push_bind(values.clone())
                    .push(")");
            }
            Condition::Lt(field, bound) => push_range(builder, field, "<", bound),
            Condition::Lte(field, bound) => push_range(builder, field, "<=", bound),
            Condition::Gte(field, bound) => push_range(builder, field, ">=", bound),
        }
    }
}

fn push_range(builder: &mut QueryBuilder<'_, Postgres>, field: &'static str, op: &str, bound: &Value) {
    match bound {
        Value::Number(n) => {
            builder
                .push("(doc ->> ")
                .push_bind(field)
                .push(")::float8 ")
                .push(op)
                .push(" ")
                .push_bind(n.as_f64().unwrap_or_default());
        }
        other => {
            // fechas ISO: el orden de bytes coincide con el cronológico
            let text = other
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| other.to_string());
            builder
                .push("(doc ->> ")
                .push_bind(field)
                .push(") COLLATE \"C\" ")
                .push(op)
                .push(" ")
                .push_bind(text);
        }
    }
}

/// `UPDATE` de un documento: incrementos con `jsonb_set` anidados y después
/// la fusión de `set`, todo en una sola sentencia.
fn update_query(collection: Collection, id: &str, update: Update) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET doc = ", collection.as_str()));

    for _ in &update.inc {
        builder.push("jsonb_set(");
    }
    builder.push("doc");
    for (field, by) in &update.inc {
        builder
            .push(", ARRAY[")
            .push_bind(*field)
            .push("]::text[], to_jsonb(COALESCE((doc ->> ")
            .push_bind(*field)
            .push(")::bigint, 0) + ")
            .push_bind(*by)
            .push("))");
    }
    builder
        .push(" || ")
        .push_bind(Json(Value::Object(update.set)))
        .push(" WHERE id = ")
        .push_bind(id.to_string());
    builder
}

fn map_insert_error(collection: Collection, id: &str, error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate {
            collection: collection.as_str(),
            key: db.constraint().unwrap_or(id).to_string(),
        },
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()> {
        let id = document_id(&document)?.to_string();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.as_str());

        sqlx::query(&sql)
            .bind(&id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(collection, &id, e))?;

        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter, 1).await?.into_iter().next())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let mut builder = QueryBuilder::new(format!("SELECT doc FROM {}", collection.as_str()));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY doc ->> 'created_at' COLLATE \"C\", id")
            .push(" LIMIT ")
            .push_bind(limit as i64);

        let rows = builder
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", collection.as_str()));
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        update: Update,
    ) -> StoreResult<bool> {
        let mut builder = update_query(collection, id, update);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
