use actix_files::NamedFile;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Deserialize, Debug)]
struct ImagesQuery {
    date: Option<String>,
}

async fn index(app_config: web::Data<AppConfig>) -> Result<NamedFile, AppError> {
    let path = PathBuf::from(&app_config.static_directory).join("index.html");
    NamedFile::open_async(&path).await.map_err(|e| {
        log::error!("Error serving {:?}: {}", path, e);
        AppError::Io(e)
    })
}

async fn get_images(
    catalog: web::Data<Arc<dyn Catalog>>,
    query: web::Query<ImagesQuery>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for images with query: {:?}", query);
    let images = catalog.images(query.into_inner().date).await?;
    Ok(HttpResponse::Ok().json(images))
}

async fn get_dates(catalog: web::Data<Arc<dyn Catalog>>) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for dates");
    Ok(HttpResponse::Ok().json(catalog.dates().await?))
}

/// Registers the API, image and static routes on an app.
pub fn configure(config: &AppConfig, catalog: Arc<dyn Catalog>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    let config_data = web::Data::new(config.clone());
    let catalog_data = web::Data::new(catalog);
    let images_dir = config.source_directory.clone();
    let static_dir = config.static_directory.clone();

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(config_data.clone())
            .app_data(catalog_data.clone())
            .service(web::resource("/api/images").route(web::get().to(get_images)))
            .service(web::resource("/api/dates").route(web::get().to(get_dates)));

        // Files falls back to the working directory when its root is missing.
        for (mount, dir) in [("/images", &images_dir), ("/static", &static_dir)] {
            if Path::new(dir).is_dir() {
                cfg.service(actix_files::Files::new(mount, dir));
            } else {
                log::warn!("Not serving {}: {} is not a directory", mount, dir);
            }
        }

        cfg.default_service(web::to(index));
    }
}

pub async fn start_web_server(config: Arc<AppConfig>, catalog: Arc<dyn Catalog>) -> std::io::Result<()> {
    let port = config.web_port;
    let routes = configure(&config, catalog);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving images from {}", config.source_directory);

    HttpServer::new(move || App::new().configure(routes.clone()))
        .bind(format!("0.0.0.0:{}", port))?
        .run()
        .await
}
