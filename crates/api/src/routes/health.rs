//! Liveness endpoint.

/// GET /healthz: always `ok`, regardless of store health.
pub async fn check() -> &'static str {
    "ok"
}
