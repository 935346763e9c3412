use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{RoleTable, SessionContext};
use crate::config::DatabaseConfig;
use crate::database::error::GatewayError;
use crate::database::gateway::PgGateway;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const GRANTS_SQL: &str = include_str!("../../sql/grants.sql");

/// Matches the development token lifetime.
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

struct SessionEntry {
    context: SessionContext,
    options: PgConnectOptions,
    pool: PgPool,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn belongs_to(&self, ctx: &SessionContext) -> bool {
        self.context.identity == ctx.identity
    }
}

/// Owns one connection pool per client session, opened with that client's
/// own database account, plus a lazily created operator pool for schema work.
pub struct DatabaseManager {
    base: PgConnectOptions,
    settings: DatabaseConfig,
    session_ttl: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    admin: RwLock<Option<PgPool>>,
}

impl DatabaseManager {
    pub fn new(base: PgConnectOptions, settings: DatabaseConfig) -> Self {
        Self {
            base,
            settings,
            session_ttl: DEFAULT_SESSION_TTL,
            sessions: RwLock::new(HashMap::new()),
            admin: RwLock::new(None),
        }
    }

    pub fn from_url(url: &str, settings: DatabaseConfig) -> Result<Self, GatewayError> {
        let base: PgConnectOptions = url.parse()?;
        Ok(Self::new(base, settings))
    }

    /// Uses `DATABASE_URL`; its credentials become the operator account.
    pub fn from_env(settings: DatabaseConfig) -> Result<Self, GatewayError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| GatewayError::Connectivity("DATABASE_URL is not set".to_string()))?;
        Self::from_url(&url, settings)
    }

    /// Pin every connection to one schema (isolated test schemas).
    pub fn with_search_path(mut self, schema: &str) -> Self {
        self.base = self.base.options([("search_path", schema)]);
        self
    }

    /// Session pools are closed once this long has passed since login; set
    /// it to the token lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn settings(&self) -> &DatabaseConfig {
        &self.settings
    }

    fn pool_options(&self, max_connections: u32) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(self.settings.connection_timeout))
    }

    async fn connect(&self, options: &PgConnectOptions, max_connections: u32) -> Result<PgPool, GatewayError> {
        let pool = self
            .pool_options(max_connections)
            .connect_with(options.clone())
            .await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(pool)
    }

    /// Authenticates `(identity, secret)` by opening a pool as that database
    /// account, then resolves the role from `roles`.
    pub async fn open_session(
        &self,
        identity: &str,
        secret: &str,
        roles: &RoleTable,
    ) -> Result<SessionContext, GatewayError> {
        if !Self::is_valid_identity(identity) {
            return Err(GatewayError::Validation(format!("invalid account name: {}", identity)));
        }

        let options = self.base.clone().username(identity).password(secret);
        let pool = self
            .connect(&options, self.settings.session_max_connections)
            .await?;

        let context = SessionContext::new(identity, roles.resolve(identity));
        self.register(context.clone(), options, pool).await;

        info!(
            "Opened session {} for {} as {}",
            context.session_id, context.identity, context.role
        );
        Ok(context)
    }

    async fn register(&self, context: SessionContext, options: PgConnectOptions, pool: PgPool) {
        let expires_at = Instant::now() + self.session_ttl;
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            context.session_id,
            SessionEntry {
                context,
                options,
                pool,
                expires_at,
            },
        );
    }

    /// Gateway bound to the session's own pool. An expired session is closed
    /// here and reported like a missing one.
    pub async fn gateway(&self, ctx: &SessionContext) -> Result<PgGateway, GatewayError> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&ctx.session_id) {
                Some(entry) if entry.belongs_to(ctx) && !entry.is_expired(Instant::now()) => {
                    return Ok(PgGateway::new(
                        entry.pool.clone(),
                        entry.context.identity.clone(),
                        self.settings.clone(),
                    ))
                }
                Some(entry) if entry.belongs_to(ctx) => {}
                _ => return Err(no_session()),
            }
        }

        self.close_session(ctx).await;
        Err(no_session())
    }

    pub async fn health_check(&self, ctx: &SessionContext) -> Result<(), GatewayError> {
        self.gateway(ctx).await?.ping().await
    }

    /// Replaces the session pool with a fresh one using the stored credentials.
    /// No lock is held while connecting.
    pub async fn reconnect(&self, ctx: &SessionContext) -> Result<(), GatewayError> {
        let options = {
            let sessions = self.sessions.read().await;
            match sessions.get(&ctx.session_id) {
                Some(entry) if entry.belongs_to(ctx) && !entry.is_expired(Instant::now()) => {
                    entry.options.clone()
                }
                _ => return Err(no_session()),
            }
        };

        let pool = self
            .connect(&options, self.settings.session_max_connections)
            .await?;

        let old = {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&ctx.session_id) {
                Some(entry) if entry.belongs_to(ctx) => {
                    entry.expires_at = Instant::now() + self.session_ttl;
                    Some(std::mem::replace(&mut entry.pool, pool))
                }
                // Logged out while connecting
                _ => {
                    pool.close().await;
                    None
                }
            }
        };

        match old {
            Some(old) => {
                old.close().await;
                info!("Reconnected session {} for {}", ctx.session_id, ctx.identity);
                Ok(())
            }
            None => Err(no_session()),
        }
    }

    /// Closes every session whose lifetime has passed; returns how many.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<SessionEntry> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for entry in &expired {
            entry.pool.close().await;
            warn!(
                "Closed expired session {} for {}",
                entry.context.session_id, entry.context.identity
            );
        }
        expired.len()
    }

    /// Returns false when the session was already gone.
    pub async fn close_session(&self, ctx: &SessionContext) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&ctx.session_id)
        };
        match removed {
            Some(entry) => {
                entry.pool.close().await;
                info!("Closed session {} for {}", ctx.session_id, ctx.identity);
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Close and remove all pools (e.g., on shutdown)
    pub async fn close_all(&self) {
        let mut sessions = self.sessions.write().await;
        for (id, entry) in sessions.drain() {
            entry.pool.close().await;
            info!("Closed session pool: {}", id);
        }
        if let Some(pool) = self.admin.write().await.take() {
            pool.close().await;
            info!("Closed operator pool");
        }
    }

    /// Operator pool using the `DATABASE_URL` credentials.
    pub async fn admin_pool(&self) -> Result<PgPool, GatewayError> {
        {
            let admin = self.admin.read().await;
            if let Some(pool) = admin.as_ref() {
                return Ok(pool.clone());
            }
        }

        let mut admin = self.admin.write().await;
        if let Some(pool) = admin.as_ref() {
            return Ok(pool.clone());
        }
        let pool = self.connect(&self.base, 2).await?;
        *admin = Some(pool.clone());

        info!("Created operator database pool");
        Ok(pool)
    }

    /// Pings the operator pool to ensure connectivity
    pub async fn admin_health_check(&self) -> Result<(), GatewayError> {
        let pool = self.admin_pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Gateway over the operator pool, for CLI and maintenance tasks.
    pub async fn admin_gateway(&self) -> Result<PgGateway, GatewayError> {
        Ok(PgGateway::new(self.admin_pool().await?, "operator", self.settings.clone()))
    }

    /// Applies schema and routine migrations.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        let pool = self.admin_pool().await?;
        MIGRATOR.run(&pool).await?;
        info!("Schema migrations applied");
        Ok(())
    }

    /// Creates the group roles and grants privileges on the schema.
    pub async fn apply_grants(&self) -> Result<(), GatewayError> {
        let pool = self.admin_pool().await?;
        pool.execute(GRANTS_SQL).await?;
        info!("Account grants applied");
        Ok(())
    }

    /// Account names are plain PostgreSQL role names: 1-63 chars of
    /// [a-zA-Z0-9_], not starting with a digit.
    fn is_valid_identity(identity: &str) -> bool {
        !identity.is_empty()
            && identity.len() <= 63
            && !identity.starts_with(|c: char| c.is_ascii_digit())
            && identity.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

fn no_session() -> GatewayError {
    GatewayError::Connectivity("no active database session; log in again".to_string())
}
