//! The two backend calls the diagnosis workflow depends on.

use async_trait::async_trait;
use cropsage_api::{ApiError, CropSageClient};
use cropsage_core::{Coordinates, DiagnosisResult, StoreRecord};

#[async_trait]
pub trait DiagnosisBackend: Send + Sync {
    async fn classify(&self, query: &str) -> Result<DiagnosisResult, ApiError>;

    async fn nearby_stores(
        &self,
        coords: Coordinates,
        radius: f64,
    ) -> Result<Vec<StoreRecord>, ApiError>;
}

#[async_trait]
impl DiagnosisBackend for CropSageClient {
    async fn classify(&self, query: &str) -> Result<DiagnosisResult, ApiError> {
        CropSageClient::classify(self, query).await
    }

    async fn nearby_stores(
        &self,
        coords: Coordinates,
        radius: f64,
    ) -> Result<Vec<StoreRecord>, ApiError> {
        CropSageClient::nearby_stores(self, coords, radius).await
    }
}
