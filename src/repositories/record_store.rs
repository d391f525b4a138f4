//! Abstracción del almacén de documentos
//!
//! Este módulo define el contrato común de persistencia sobre las cuatro
//! colecciones del sistema. Los documentos son objetos JSON con un campo
//! `id` de tipo string; los backends concretos viven en `postgres_store`
//! y `memory_store`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use thiserror::Error;

/// Tamaño máximo de página para cualquier lectura de varios documentos
pub const MAX_PAGE_SIZE: usize = 1000;

/// Documento almacenado
pub type Document = Value;

/// Errores de la capa de persistencia
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate key in {collection}: {key}")]
    Duplicate { collection: &'static str, key: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Colecciones del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Drivers,
    TrainingModules,
    TrainingProgress,
    Certifications,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Drivers,
        Collection::TrainingModules,
        Collection::TrainingProgress,
        Collection::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Drivers => "drivers",
            Collection::TrainingModules => "training_modules",
            Collection::TrainingProgress => "training_progress",
            Collection::Certifications => "certifications",
        }
    }

    /// Claves compuestas que deben ser únicas dentro de la colección
    pub fn unique_key(&self) -> Option<&'static [&'static str]> {
        match self {
            Collection::TrainingProgress => Some(&["driver_id", "module_id"]),
            _ => None,
        }
    }
}

/// Condición sobre un campo de primer nivel del documento
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Value),
    In(&'static str, Vec<String>),
    Lt(&'static str, Value),
    Lte(&'static str, Value),
    Gte(&'static str, Value),
}

/// Filtro conjuntivo (todas las condiciones deben cumplirse)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    /// Agrega la igualdad solo si hay valor
    pub fn eq_opt(self, field: &'static str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn one_of(mut self, field: &'static str, values: Vec<String>) -> Self {
        self.conditions.push(Condition::In(field, values));
        self
    }

    pub fn lt(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Lt(field, value.into()));
        self
    }

    pub fn lte(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Lte(field, value.into()));
        self
    }

    pub fn gte(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Gte(field, value.into()));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evalúa el filtro en memoria contra un documento
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq(field, expected) => document.get(*field) == Some(expected),
            Condition::In(field, values) => document
                .get(*field)
                .and_then(Value::as_str)
                .map_or(false, |actual| values.iter().any(|v| v == actual)),
            Condition::Lt(field, bound) => {
                compare(document.get(*field), bound) == Some(Ordering::Less)
            }
            Condition::Lte(field, bound) => matches!(
                compare(document.get(*field), bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::Gte(field, bound) => matches!(
                compare(document.get(*field), bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        })
    }
}

/// Compara valores del mismo tipo; tipos distintos o campos ausentes no son comparables
fn compare(actual: Option<&Value>, bound: &Value) -> Option<Ordering> {
    match (actual?, bound) {
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

/// Operación de actualización sobre un único documento
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub set: Map<String, Value>,
    pub inc: Vec<(&'static str, i64)>,
}

impl Update {
    pub fn set(fields: Map<String, Value>) -> Self {
        Self {
            set: fields,
            inc: Vec::new(),
        }
    }

    pub fn with_inc(mut self, field: &'static str, by: i64) -> Self {
        self.inc.push((field, by));
        self
    }

    /// Aplica la actualización sobre un documento en memoria
    pub fn apply_to(&self, document: &mut Document) -> StoreResult<()> {
        let object = document
            .as_object_mut()
            .ok_or_else(|| StoreError::MalformedDocument("document is not an object".to_string()))?;

        for (field, by) in &self.inc {
            let current = object.get(*field).and_then(Value::as_i64).unwrap_or(0);
            object.insert((*field).to_string(), Value::from(current + by));
        }
        for (field, value) in &self.set {
            object.insert(field.clone(), value.clone());
        }
        Ok(())
    }
}

/// Contrato del almacén de documentos
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserta un documento nuevo; falla con `Duplicate` si choca con el id o una clave única
    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()>;

    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> StoreResult<Option<Document>>;

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Devuelve `true` si algún documento coincidió con el id
    async fn update_one(&self, collection: Collection, id: &str, update: Update)
        -> StoreResult<bool>;

    /// Libera las conexiones del backend
    async fn close(&self);
}

/// Extrae el id de un documento
pub fn document_id(document: &Document) -> StoreResult<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::MalformedDocument("document has no string id".to_string()))
}

/// Clave única compuesta de un documento, si la colección la define.
/// Se compara valor a valor; un campo ausente cuenta como `null`.
pub fn unique_key_of(collection: Collection, document: &Document) -> Option<Vec<Value>> {
    collection.unique_key().map(|fields| {
        fields
            .iter()
            .map(|field| document.get(*field).cloned().unwrap_or(Value::Null))
            .collect()
    })
}

pub fn encode<T: Serialize>(entity: &T) -> StoreResult<Document> {
    Ok(serde_json::to_value(entity)?)
}

pub fn decode<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(document)?)
}

pub fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> StoreResult<Vec<T>> {
    documents.into_iter().map(decode).collect()
}
