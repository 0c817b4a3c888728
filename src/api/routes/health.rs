//! Health check endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET / — basic liveness info.
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_returns_ok() {
        let Json(body) = root().await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }
}
