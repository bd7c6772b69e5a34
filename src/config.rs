// src/config.rs

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::{env, time::Duration};

use crate::{
    db::{EstablishmentRepository, ProductRepository, UserRepository},
    services::{
        auth::AuthService, credentials::TokenService, establishment_service::EstablishmentService,
        product_service::ProductService, user_service::UserService,
    },
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configuração lida do ambiente (ou do .env)
// Sem Debug: carrega a senha do banco e o segredo do token.
#[derive(Clone)]
pub struct Config {
    pub db: PgConnectOptions,
    pub secret_key: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de consulta.
    /// `DATABASE_URL` tem prioridade sobre as variáveis `DB_*` separadas.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} deve ser definida"))
        };

        let db = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL inválida")?,
            None => {
                let port = required("DB_PORT")?
                    .trim()
                    .parse::<u16>()
                    .context("DB_PORT deve ser uma porta válida")?;

                PgConnectOptions::new()
                    .host(&required("DB_HOST")?)
                    .port(port)
                    .username(&required("DB_USER")?)
                    .password(&required("DB_PASSWORD")?)
                    .database(&required("DB_NAME")?)
            }
        };

        let secret_key = required("SECRET_KEY")?;

        let server_addr = lookup("SERVER_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS deve ser um número")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(v) => v.trim().parse::<u32>().context("BCRYPT_COST deve ser um número")?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            db,
            secret_key,
            server_addr,
            db_max_connections,
            bcrypt_cost,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_service: TokenService,
    pub user_repo: UserRepository,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub product_service: ProductService,
    pub establishment_service: EstablishmentService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(config.db.clone())
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: &Config) -> anyhow::Result<Self> {
        let token_service = TokenService::new(&config.secret_key)?;

        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let establishment_repo = EstablishmentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            token_service.clone(),
            db_pool.clone(),
            config.bcrypt_cost,
        );
        let user_service = UserService::new(user_repo.clone(), db_pool.clone());
        let product_service = ProductService::new(product_repo, db_pool.clone());
        let establishment_service = EstablishmentService::new(establishment_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            token_service,
            user_repo,
            auth_service,
            user_service,
            product_service,
            establishment_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn database_url_wins_and_defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://app:s3cr3t@db:5433/estoque"),
            ("DB_HOST", "ignorado"),
            ("SECRET_KEY", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.db.get_host(), "db");
        assert_eq!(config.db.get_port(), 5433);
        assert_eq!(config.db.get_database(), Some("estoque"));
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
        assert_eq!(config.db_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn split_db_variables_are_composed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5432"),
            ("DB_USER", "postgres"),
            ("DB_PASSWORD", "p@ss/word"),
            ("DB_NAME", "inventory"),
            ("SECRET_KEY", "segredo"),
            ("SERVER_ADDR", "127.0.0.1:3000"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.db.get_host(), "localhost");
        assert_eq!(config.db.get_username(), "postgres");
        assert_eq!(config.db.get_database(), Some("inventory"));
        assert_eq!(config.server_addr, "127.0.0.1:3000");
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://app:x@localhost/estoque",
        )]));
        let Err(e) = result else {
            panic!("SECRET_KEY ausente deveria falhar");
        };
        assert!(e.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "porta"),
            ("DB_USER", "postgres"),
            ("DB_PASSWORD", "x"),
            ("DB_NAME", "inventory"),
            ("SECRET_KEY", "segredo"),
        ]));
        assert!(result.is_err());
    }
}
