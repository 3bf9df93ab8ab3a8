// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`DocumentBackend`] implementation over the remote document client.

use async_trait::async_trait;

use campusfix_config::RemoteConfig;
use campusfix_core::order::OrderDocument;
use campusfix_core::traits::DocumentBackend;
use campusfix_core::types::HealthStatus;
use campusfix_core::CampusfixError;

use crate::client::RemoteDocClient;

/// Remote persistence backend.
pub struct RemoteStore {
    client: RemoteDocClient,
}

impl RemoteStore {
    pub fn new(client: RemoteDocClient) -> Self {
        Self { client }
    }

    /// Build the remote backend from configuration.
    ///
    /// Returns `Ok(None)` when the remote is disabled or not fully
    /// configured; the shop then runs local-only.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>, CampusfixError> {
        if !config.is_active() {
            return Ok(None);
        }
        let (Some(bin_id), Some(api_key)) = (&config.bin_id, &config.api_key) else {
            return Ok(None);
        };
        let client = RemoteDocClient::new(
            config.base_url.clone(),
            bin_id.clone(),
            api_key,
            config.timeout_secs,
        )?;
        Ok(Some(Self::new(client)))
    }
}

#[async_trait]
impl DocumentBackend for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self) -> Result<OrderDocument, CampusfixError> {
        self.client.fetch_document().await
    }

    async fn replace(&self, document: &OrderDocument) -> Result<(), CampusfixError> {
        self.client.replace_document(document).await
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusfixError> {
        match self.client.fetch_document().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) if e.is_recoverable() => Ok(HealthStatus::Unhealthy(e.to_string())),
            Err(e) => Err(e),
        }
    }
}
