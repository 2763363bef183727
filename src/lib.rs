use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod directory;
pub mod state;
pub mod transfer;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::directory::routes::get_all_accounts,
        crate::directory::routes::create_account,
        crate::directory::routes::get_account,
        crate::directory::routes::update_account,
        crate::directory::routes::delete_account,
        crate::directory::routes::upload_letterhead,
        crate::directory::routes::delete_letterhead,
        crate::directory::routes::get_suppliers,
        crate::directory::routes::create_supplier,
        crate::transfer::routes::create_transfer_order,
        crate::transfer::routes::get_currencies
    ),
    components(
        schemas(
            directory::model::AccountSummary,
            directory::model::Beneficiary,
            directory::model::CreateAccountRequest,
            directory::model::UpdateAccountRequest,
            directory::model::UploadLetterheadRequest,
            directory::model::CreateSupplierRequest,
            transfer::TransferOrderInput,
            transfer::routes::CurrencyInfo,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Directory", description = "Payer accounts and suppliers."),
        (name = "Transfer Orders", description = "Transfer order PDF generation.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Every `/api` route.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(directory::routes::config)
        .configure(transfer::routes::config);
}

pub async fn run() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app_state = web::Data::new(AppState::new(&config));

    let prometheus = PrometheusMetricsBuilder::new("ordre_virement_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    if let Some(dir) = &config.export_dir {
        log::info!("Generated orders will be spooled to {}", dir.display());
    }
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .service(web::scope("/api").configure(api_config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server stopped with an error")
}
