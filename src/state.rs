use crate::{
    clients::{CatalogClient, ImageClient},
    config::AppConfig,
    db::{DbPool, OrmConn, raw_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub catalog: CatalogClient,
    pub images: ImageClient,
}

impl AppState {
    pub fn new(orm: OrmConn, config: &AppConfig) -> anyhow::Result<Self> {
        let catalog = CatalogClient::new(config.catalog_api_url.clone(), config.upstream_timeout)?;
        let images = ImageClient::new(
            config.image_upload_url.clone(),
            config.image_upload_preset.clone(),
            config.upstream_timeout,
        )?;
        Ok(Self {
            pool: raw_pool(&orm),
            orm,
            catalog,
            images,
        })
    }
}
