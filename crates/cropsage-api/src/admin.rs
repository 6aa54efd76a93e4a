//! Token-authenticated CRUD on problems and stores.
//!
//! [`AdminSession`] keeps the most recently fetched lists and refetches both
//! after every successful write. There is no merge logic: the lists always
//! reflect the backend as of the last refetch.

use cropsage_core::{Problem, StoreRecord};
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::CropSageClient;
use crate::error::ApiError;
use crate::types::AdminToken;

const PROBLEMS: &str = "problems/";
const STORES: &str = "stores/";

impl CropSageClient {
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] for a rejected token; otherwise as
    /// [`CropSageClient::classify`].
    pub async fn list_problems(&self, token: &AdminToken) -> Result<Vec<Problem>, ApiError> {
        self.list(token, PROBLEMS).await
    }

    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the record.
    pub async fn create_problem(
        &self,
        token: &AdminToken,
        problem: &Problem,
    ) -> Result<Problem, ApiError> {
        self.create(token, PROBLEMS, problem).await
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no problem has `id`.
    pub async fn update_problem(
        &self,
        token: &AdminToken,
        id: i64,
        problem: &Problem,
    ) -> Result<Problem, ApiError> {
        self.update(token, PROBLEMS, id, problem).await
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no problem has `id`.
    pub async fn delete_problem(&self, token: &AdminToken, id: i64) -> Result<(), ApiError> {
        self.delete(token, PROBLEMS, id).await
    }

    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] for a rejected token.
    pub async fn list_stores(&self, token: &AdminToken) -> Result<Vec<StoreRecord>, ApiError> {
        self.list(token, STORES).await
    }

    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the record.
    pub async fn create_store(
        &self,
        token: &AdminToken,
        store: &StoreRecord,
    ) -> Result<StoreRecord, ApiError> {
        self.create(token, STORES, store).await
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no store has `id`.
    pub async fn update_store(
        &self,
        token: &AdminToken,
        id: i64,
        store: &StoreRecord,
    ) -> Result<StoreRecord, ApiError> {
        self.update(token, STORES, id, store).await
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no store has `id`.
    pub async fn delete_store(&self, token: &AdminToken, id: i64) -> Result<(), ApiError> {
        self.delete(token, STORES, id).await
    }

    fn authorized(request: RequestBuilder, token: &AdminToken) -> RequestBuilder {
        request.header(AUTHORIZATION, token.header_value())
    }

    async fn list<T: DeserializeOwned>(
        &self,
        token: &AdminToken,
        collection: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(collection)?;
        let request = Self::authorized(self.http().get(url.clone()), token);
        Self::send_json(request, &url, collection).await
    }

    async fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        token: &AdminToken,
        collection: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(collection)?;
        let request = Self::authorized(self.http().post(url.clone()).json(body), token);
        let created = Self::send_json(request, &url, collection).await?;
        tracing::info!(collection, "record created");
        Ok(created)
    }

    async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        token: &AdminToken,
        collection: &str,
        id: i64,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&format!("{collection}{id}/"))?;
        let request = Self::authorized(self.http().put(url.clone()).json(body), token);
        let updated = Self::send_json(request, &url, collection).await?;
        tracing::info!(collection, id, "record updated");
        Ok(updated)
    }

    async fn delete(&self, token: &AdminToken, collection: &str, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{collection}{id}/"))?;
        let request = Self::authorized(self.http().delete(url.clone()), token);
        Self::send_empty(request, &url).await?;
        tracing::info!(collection, id, "record deleted");
        Ok(())
    }
}

/// A logged-in admin view of the backend's problems and stores.
#[derive(Debug)]
pub struct AdminSession {
    client: CropSageClient,
    token: AdminToken,
    problems: Vec<Problem>,
    stores: Vec<StoreRecord>,
}

impl AdminSession {
    /// Opens a session with an existing token and fetches both lists.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] if the token has been revoked, or any error
    /// from the initial fetch.
    pub async fn open(client: CropSageClient, token: AdminToken) -> Result<Self, ApiError> {
        let mut session = Self {
            client,
            token,
            problems: Vec::new(),
            stores: Vec::new(),
        };
        session.refresh().await?;
        Ok(session)
    }

    /// Logs in with credentials, then opens the session.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] on a refused login, otherwise as
    /// [`AdminSession::open`].
    pub async fn login(
        client: CropSageClient,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let token = client.admin_login(username, password).await?;
        Self::open(client, token).await
    }

    #[must_use]
    pub fn token(&self) -> &AdminToken {
        &self.token
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[must_use]
    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    /// Replaces both lists with the backend's current contents.
    ///
    /// # Errors
    ///
    /// Any error from either list call; on error the previous lists are kept.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let problems = self.client.list_problems(&self.token).await?;
        let stores = self.client.list_stores(&self.token).await?;
        self.problems = problems;
        self.stores = stores;
        Ok(())
    }

    /// Creates the problem when it has no `id`, updates it otherwise, then
    /// refetches.
    ///
    /// # Errors
    ///
    /// Any error from the write or the refetch.
    pub async fn save_problem(&mut self, problem: &Problem) -> Result<Problem, ApiError> {
        let saved = match problem.id {
            Some(id) => self.client.update_problem(&self.token, id, problem).await?,
            None => self.client.create_problem(&self.token, problem).await?,
        };
        self.refresh().await?;
        Ok(saved)
    }

    /// # Errors
    ///
    /// Any error from the delete or the refetch.
    pub async fn delete_problem(&mut self, id: i64) -> Result<(), ApiError> {
        self.client.delete_problem(&self.token, id).await?;
        self.refresh().await
    }

    /// Creates the store when it has no `id`, updates it otherwise, then
    /// refetches.
    ///
    /// # Errors
    ///
    /// Any error from the write or the refetch.
    pub async fn save_store(&mut self, store: &StoreRecord) -> Result<StoreRecord, ApiError> {
        let saved = match store.id {
            Some(id) => self.client.update_store(&self.token, id, store).await?,
            None => self.client.create_store(&self.token, store).await?,
        };
        self.refresh().await?;
        Ok(saved)
    }

    /// # Errors
    ///
    /// Any error from the delete or the refetch.
    pub async fn delete_store(&mut self, id: i64) -> Result<(), ApiError> {
        self.client.delete_store(&self.token, id).await?;
        self.refresh().await
    }
}
