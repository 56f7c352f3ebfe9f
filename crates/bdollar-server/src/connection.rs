//! Simulated connection handshake and service status.
//!
//! Authentication here is cosmetic: any non-empty credential is accepted and
//! nothing is checked against the token store.

use std::sync::Arc;

use bdollar_common::{ConnectResponse, ServiceHealth, StatusResponse};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::fault::FaultInjector;

pub const SERVICE_NAME: &str = "Binary Dollar";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Identity reported for every authenticated caller.
pub const DEMO_USER: &str = "Demo User";

/// Connect and status operations.
pub struct ConnectionService {
    faults: Arc<dyn FaultInjector>,
}

impl ConnectionService {
    pub fn new(faults: Arc<dyn FaultInjector>) -> Self {
        Self { faults }
    }

    /// Simulates a handshake.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no credential was presented; the
    ///   fault injector is not consulted.
    /// - [`ApiError::Transient`] when the injector reports a failure.
    #[instrument(skip(self))]
    pub async fn connect(&self, has_credential: bool) -> Result<ConnectResponse, ApiError> {
        if !has_credential {
            return Err(ApiError::Unauthorized("API token required".to_string()));
        }

        self.faults
            .inject()
            .await
            .map_err(|fault| ApiError::Transient {
                message: format!("Failed to connect to {SERVICE_NAME}"),
                error: fault.to_string(),
            })?;

        debug!("Handshake succeeded");

        Ok(ConnectResponse {
            success: true,
            message: format!("Connected to {SERVICE_NAME} server successfully"),
            timestamp: Utc::now(),
            server_status: "online".to_string(),
            authenticated_as: DEMO_USER.to_string(),
        })
    }

    /// Reports static service health. Never fails.
    pub fn status(&self, has_credential: bool) -> StatusResponse {
        let user = has_credential.then(|| DEMO_USER.to_string());

        StatusResponse {
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            status: "operational".to_string(),
            uptime: "99.9%".to_string(),
            last_check: Utc::now(),
            authenticated: user.is_some(),
            user,
            services: ServiceHealth::all_online(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::fault::{FixedFaultInjector, RandomFaultInjector};
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_without_credential_skips_injector() {
        let injector = Arc::new(FixedFaultInjector::healthy());
        let service = ConnectionService::new(Arc::clone(&injector) as Arc<dyn FaultInjector>);

        let err = service.connect(false).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "API token required"));
        assert_eq!(injector.calls(), 0);
    }

    #[tokio::test]
    async fn test_connect_success() {
        let service = ConnectionService::new(Arc::new(FixedFaultInjector::healthy()));
        let response = service.connect(true).await.unwrap();

        assert!(response.success);
        assert_eq!(response.server_status, "online");
        assert_eq!(response.authenticated_as, DEMO_USER);
        assert_eq!(
            response.message,
            "Connected to Binary Dollar server successfully"
        );
    }

    #[tokio::test]
    async fn test_connect_injected_failure() {
        let service = ConnectionService::new(Arc::new(FixedFaultInjector::failing()));
        let err = service.connect(true).await.unwrap_err();

        match err {
            ApiError::Transient { message, error } => {
                assert_eq!(message, "Failed to connect to Binary Dollar");
                assert_eq!(error, "Connection failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_success_rate_over_many_trials() {
        let service = ConnectionService::new(Arc::new(RandomFaultInjector::with_seed(
            Duration::ZERO,
            0.1,
            2024,
        )));

        let mut successes = 0;
        for _ in 0..5_000 {
            if service.connect(true).await.is_ok() {
                successes += 1;
            }
        }

        assert!(
            (4_350..=4_650).contains(&successes),
            "unexpected success count {successes}"
        );
    }

    #[test]
    fn test_status_reflects_credential_presence() {
        let service = ConnectionService::new(Arc::new(FixedFaultInjector::healthy()));

        let anonymous = service.status(false);
        assert!(!anonymous.authenticated);
        assert_eq!(anonymous.user, None);
        assert_eq!(anonymous.service, "Binary Dollar");
        assert_eq!(anonymous.version, "1.0.0");
        assert_eq!(anonymous.status, "operational");

        let authed = service.status(true);
        assert!(authed.authenticated);
        assert_eq!(authed.user.as_deref(), Some(DEMO_USER));
    }
}
