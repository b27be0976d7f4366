//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can it serve traffic? Failure → pulled from the load balancer. |

use tracing::warn;

use crate::context::AppContext;
use crate::{Request, Response, Status};

/// Liveness probe.
///
/// Always `200 OK` with body `"ok"`. If the process can respond to HTTP at
/// all, it is alive; this handler touches no dependencies.
pub async fn liveness(_req: Request, _ctx: AppContext) -> Response {
    Response::text("ok")
}

/// Readiness probe.
///
/// `200 OK` with body `"ready"` when the recipe store answers a ping,
/// `503 Service Unavailable` otherwise.
pub async fn readiness(_req: Request, ctx: AppContext) -> Response {
    match ctx.recipes().ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::builder().status(Status::ServiceUnavailable).text("unavailable")
        }
    }
}
