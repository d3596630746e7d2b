use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod client;
pub mod config;
pub mod generate;

use crate::config::ServerConfig;
use crate::generate::convert::{DocumentConverter, LibreOfficeConverter};

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "rowIndex", skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            row_index: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Shared per-process state. Only the PDF converter capability lives here;
/// all request data is scoped to a single call.
#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<dyn DocumentConverter>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            converter: Arc::new(LibreOfficeConverter),
        }
    }

    pub fn with_converter(converter: Arc<dyn DocumentConverter>) -> Self {
        Self { converter }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("Not found."))
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(crate::generate::handlers::generate),
        components(schemas(ErrorBody, generate::handlers::GenerateRequest)),
        tags(
            (name = "Generate Service", description = "Mail-merge document generation endpoint.")
        )
    )]
    struct ApiDoc;

    let config = ServerConfig::from_env();
    let app_state = web::Data::new(AppState::new());
    let public_dir = config.public_dir.clone();

    if public_dir.is_dir() {
        log::info!("Serving static assets from {}", public_dir.display());
    } else {
        log::info!(
            "Static asset directory {} does not exist, skipping static serving",
            public_dir.display()
        );
    }
    log::info!("Starting server at http://0.0.0.0:{}", config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let mut app = App::new()
            .wrap(cors)
            .app_data(app_state.clone())
            .service(
                web::scope("/api")
                    .configure(generate::handlers::config)
                    .default_service(web::route().to(not_found)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            );

        if public_dir.is_dir() {
            let index = public_dir.join("index.html");
            app = app.service(
                Files::new("/", &public_dir)
                    .index_file("index.html")
                    // Catch-all for client-side routing: any unmatched
                    // non-/api path gets the SPA entry page.
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let index = index.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(&index).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            );
        }

        app.default_service(web::route().to(not_found))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
