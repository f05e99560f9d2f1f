// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        memory::{InMemoryDatabase, InMemorySupplierStore},
        PgNotificationRepository, PgProductRepository, PgSupplierRepository, SupplierStore,
    },
    services::{InventoryService, NotificationService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage: Storage,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `env` para poder ser testado sem mexer no ambiente do processo.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match lookup("INVENTORY_STORAGE").as_deref() {
            None | Some("postgres") => Storage::Postgres,
            Some("memory") => Storage::Memory,
            Some(other) => anyhow::bail!("INVENTORY_STORAGE inválido: {other} (use postgres ou memory)"),
        };

        let database_url = lookup("DATABASE_URL");
        if storage == Storage::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida");
        }

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS deve ser um número")?,
            None => 5,
        };
        let acquire_timeout_secs = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => v.parse().context("DATABASE_ACQUIRE_TIMEOUT_SECS deve ser um número")?,
            None => 3,
        };

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            storage,
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub inventory_service: InventoryService,
    pub notification_service: NotificationService,
    pub supplier_repo: Arc<dyn SupplierStore>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        match (config.storage, config.database_url.as_deref()) {
            (Storage::Postgres, Some(database_url)) => {
                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Ok(Self::postgres(db_pool))
            }
            (Storage::Postgres, None) => anyhow::bail!("DATABASE_URL deve ser definida"),
            (Storage::Memory, _) => {
                tracing::warn!("⚠️ Usando armazenamento em memória: os dados somem ao reiniciar");
                Ok(Self::in_memory(InMemorySupplierStore::new()))
            }
        }
    }

    // --- Monta o gráfico de dependências ---
    pub fn postgres(db_pool: PgPool) -> Self {
        let notification_service = NotificationService::new(Arc::new(
            PgNotificationRepository::new(db_pool.clone()),
        ));
        let supplier_repo: Arc<dyn SupplierStore> =
            Arc::new(PgSupplierRepository::new(db_pool.clone()));
        let inventory_service = InventoryService::new(
            Arc::new(PgProductRepository::new(db_pool)),
            supplier_repo.clone(),
            Arc::new(notification_service.clone()),
        );

        Self {
            inventory_service,
            notification_service,
            supplier_repo,
        }
    }

    pub fn in_memory(suppliers: InMemorySupplierStore) -> Self {
        let database = InMemoryDatabase::new();
        let notification_service = NotificationService::new(Arc::new(database.notifications()));
        let supplier_repo: Arc<dyn SupplierStore> = Arc::new(suppliers);
        let inventory_service = InventoryService::new(
            Arc::new(database.products()),
            supplier_repo.clone(),
            Arc::new(notification_service.clone()),
        );

        Self {
            inventory_service,
            notification_service,
            supplier_repo,
        }
    }
}
