//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del proceso. Todas las variables tienen
//! un valor por defecto salvo `DATABASE_URL`, que solo se exige con el
//! backend de Postgres.

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Backend del almacén de documentos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND desconocido: {}", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_name: Option<String>,
    pub db_max_connections: u32,
    /// `["*"]` acepta cualquier origen
    pub cors_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            store_backend: StoreBackend::Postgres,
            database_url: None,
            db_name: None,
            db_max_connections: 10,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PORT inválido: {}", value))?,
            None => defaults.port,
        };

        let db_max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", value))?,
            None => defaults.db_max_connections,
        };

        let store_backend = match non_empty("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.store_backend,
        };

        let database_url = non_empty("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let cors_origins = match non_empty("CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            store_backend,
            database_url,
            db_name: non_empty("DB_NAME"),
            db_max_connections,
            cors_origins,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}
