use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{anyhow, Context};
use crypto_core::jwt;
use db_pool::{create_pool, DbConfig};
use posts_service::openapi::ApiDoc;
use posts_service::{db, handlers, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Posts Service
///
/// # Routes
///
/// - `/posts/*` - List, create, read, replace, delete posts
/// - `/vote/` - Add or remove a vote
/// - `/users/{id}` - Public user view
/// - `/health`, `/health/live` - Health checks
/// - `/swagger-ui/`, `/api/openapi.json` - API documentation
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.app.json_logs);

    tracing::info!("Starting posts-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    jwt::initialize_jwt_secret(&config.auth.jwt_secret)
        .context("Failed to initialize JWT validation")?;

    let db_cfg = DbConfig::from_env("posts-service").map_err(|e| anyhow!(e))?;
    db_cfg.log_config();
    let db_pool = create_pool(db_cfg)
        .await
        .context("Failed to create database pool")?;

    if config.app.run_migrations {
        db_pool::migrate(&db_pool, &db::MIGRATOR)
            .await
            .context("Failed to run database migrations")?;
    }

    let bind_address = config.bind_address();
    let workers = config.app.workers;
    tracing::info!("Starting HTTP server at {}", bind_address);

    let config_data = web::Data::new(config);
    let pool_data = web::Data::new(db_pool);
    let openapi_doc = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .wrap(build_cors(&config_data.cors.allowed_origins))
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .workers(workers)
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    tracing::info!("Posts-service shutting down");

    Ok(())
}
