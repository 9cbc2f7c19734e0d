// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Daemon reload capability.
//!
//! The orchestrator talks to the running daemons only through the
//! [`DaemonReloader`] trait, so tests can observe reload decisions without a
//! service manager. The production implementation shells out to the system
//! service manager and treats a non-zero exit as an operational fault that
//! propagates to the caller.
//!
//! No timeout is applied: a hanging service manager blocks the run, which is
//! acceptable for an infrequent administrative batch job.

use crate::constants::{DNS_SERVICE, SIGNING_SERVICE};
use crate::dns_errors::ReloadError;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

/// Restart capability for the daemons whose configuration nsdy generates.
#[async_trait]
pub trait DaemonReloader {
    /// Restart the DNS daemon so it picks up new zone data.
    ///
    /// # Errors
    ///
    /// Returns an error if the restart command cannot run or exits non-zero.
    async fn reload_dns_daemon(&self) -> Result<(), ReloadError>;

    /// Restart the DKIM signing daemon so it picks up new signing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the restart command cannot run or exits non-zero.
    async fn reload_signing_daemon(&self) -> Result<(), ReloadError>;
}

/// [`DaemonReloader`] that invokes `service <name> restart`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceReloader;

impl ServiceReloader {
    async fn restart(service: &str) -> Result<(), ReloadError> {
        info!(service = %service, "restarting service");
        let status = Command::new("service")
            .arg(service)
            .arg("restart")
            .status()
            .await
            .map_err(|source| ReloadError::Spawn {
                service: service.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(ReloadError::CommandFailed {
                service: service.to_string(),
                status,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DaemonReloader for ServiceReloader {
    async fn reload_dns_daemon(&self) -> Result<(), ReloadError> {
        Self::restart(DNS_SERVICE).await
    }

    async fn reload_signing_daemon(&self) -> Result<(), ReloadError> {
        Self::restart(SIGNING_SERVICE).await
    }
}
