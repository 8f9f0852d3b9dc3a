//! Readiness probes over the registered [`HealthCheck`](blog_core::HealthCheck)s

use tracing::warn;

use crate::dto::{HealthResponse, ReadinessResponse};

use super::context::ServiceContext;

pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn liveness(&self) -> HealthResponse {
        HealthResponse::healthy()
    }

    /// Run every probe; the service is ready only if all of them pass
    pub async fn readiness(&self) -> ReadinessResponse {
        let mut results = Vec::with_capacity(self.ctx.health_checks().len());

        for check in self.ctx.health_checks() {
            let healthy = match check.check().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(check = check.name(), error = %e, "Health check failed");
                    false
                }
            };
            results.push((check.name(), healthy));
        }

        ReadinessResponse::from_checks(results)
    }
}
