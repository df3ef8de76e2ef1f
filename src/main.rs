//! Union Portal server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use union_portal::adapters::auth::{Argon2PasswordHasher, JwtSessionService};
use union_portal::adapters::captcha::{InMemoryChallengeStore, RedisChallengeStore};
use union_portal::adapters::document::PdfDocumentRenderer;
use union_portal::adapters::email::{Notifier, ResendEmailSender};
use union_portal::adapters::http::{build_router, AppState, PortalSettings};
use union_portal::adapters::postgres::{
    PostgresDocumentRepository, PostgresEventRepository, PostgresInvoiceRepository,
    PostgresMembershipFeeRepository, PostgresSubmissionRepository, PostgresSuggestionRepository,
    PostgresTransactionRepository, PostgresUnmatchedPaymentRepository, PostgresUserRepository,
};
use union_portal::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, RedisRateLimiter};
use union_portal::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use union_portal::application::handlers::auth::{
    BootstrapAdminCommand, BootstrapAdminHandler, BootstrapAdminResult,
};
use union_portal::config::{AppConfig, ServerConfig};
use union_portal::ports::{ChallengeStore, RateLimiter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load_validated()?;
    init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        "Starting union portal"
    );

    // Database
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // Captcha store and rate limiter: shared through Redis when configured
    let limits = RateLimitConfig::from_limits(&config.limits);
    let max_attempts = config.limits.captcha_max_attempts;
    let (captcha, rate_limiter): (Arc<dyn ChallengeStore>, Arc<dyn RateLimiter>) =
        match &config.redis {
            Some(redis) => {
                let conn = redis.client()?.get_multiplexed_tokio_connection().await?;
                tracing::info!("Using Redis for captcha challenges and rate limits");
                (
                    Arc::new(RedisChallengeStore::new(
                        conn.clone(),
                        redis.key_prefix.clone(),
                        max_attempts,
                    )),
                    Arc::new(
                        RedisRateLimiter::new(conn, limits).with_key_prefix(redis.key_prefix.clone()),
                    ),
                )
            }
            None => {
                tracing::warn!("Redis not configured; captcha and rate limits are process-local");
                (
                    Arc::new(InMemoryChallengeStore::new(max_attempts)),
                    Arc::new(InMemoryRateLimiter::new(limits)),
                )
            }
        };

    // External services
    let stripe = StripeConfig::new(
        config.payment.stripe_api_key.expose_secret(),
        config.payment.stripe_webhook_secret.expose_secret(),
    )
    .with_base_url(&config.payment.api_base);
    if config.payment.is_test_mode() {
        tracing::warn!("Stripe is in test mode");
    }
    let email_sender = Arc::new(ResendEmailSender::new(&config.email));
    let notifier = Notifier::new(email_sender, config.email.admin_notification_email.clone());

    let sessions = Arc::new(JwtSessionService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs(),
    ));

    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        documents: Arc::new(PostgresDocumentRepository::new(pool.clone())),
        events: Arc::new(PostgresEventRepository::new(pool.clone())),
        suggestions: Arc::new(PostgresSuggestionRepository::new(pool.clone())),
        submissions: Arc::new(PostgresSubmissionRepository::new(pool.clone())),
        unmatched_payments: Arc::new(PostgresUnmatchedPaymentRepository::new(pool.clone())),
        transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        fees: Arc::new(PostgresMembershipFeeRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()?),
        tokens: sessions.clone(),
        sessions,
        renderer: Arc::new(PdfDocumentRenderer::default()),
        payments: Arc::new(StripePaymentAdapter::new(stripe)),
        captcha,
        rate_limiter,
        notifier,
        settings: Arc::new(PortalSettings::from_config(&config)),
    };

    bootstrap_admin(&state, &config).await?;

    let app = build_router(state);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON lines outside development; `RUST_LOG` overrides the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_development() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    }
}

async fn bootstrap_admin(
    state: &AppState,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = BootstrapAdminHandler::new(state.users.clone(), state.hasher.clone())
        .handle(BootstrapAdminCommand {
            email: config.auth.admin_email.clone(),
            password: config.auth.admin_password.clone(),
            name: config.auth.admin_name.clone(),
        })
        .await?;

    match result {
        BootstrapAdminResult::Created => {
            tracing::info!(email = %config.auth.admin_email, "Admin account created")
        }
        BootstrapAdminResult::AlreadyPresent { is_admin: false } => tracing::warn!(
            email = %config.auth.admin_email,
            "Configured admin email belongs to a non-admin account"
        ),
        BootstrapAdminResult::AlreadyPresent { is_admin: true } => {}
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
