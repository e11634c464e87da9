//! API key authentication and the permission gate.
//!
//! Keys are read from `Authorization: Key <key>`, `Authorization: Bearer <key>`
//! or the `api_key` query parameter. The resolved [`Principal`] is stored in
//! the request extensions for downstream handlers.

use axum::{
    extract::{Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use super::error::AppError;
use super::state::AppState;
use crate::config::AuthSettings;

/// Permission required to read query statistics.
pub const LIST_QUERIES: &str = "list_queries";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    permissions: Permissions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Permissions {
    All,
    Granted(HashSet<String>),
}

impl Principal {
    /// Caller used when authentication is disabled.
    pub fn anonymous() -> Self {
        Self {
            name: "anonymous".to_string(),
            permissions: Permissions::All,
        }
    }

    pub fn with_permissions(
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            permissions: Permissions::Granted(permissions.into_iter().map(Into::into).collect()),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        match &self.permissions {
            Permissions::All => true,
            Permissions::Granted(granted) => granted.contains(permission),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiKeyParam {
    api_key: Option<String>,
}

/// Pull the API key out of a request, header first.
pub fn extract_api_key(request: &Request) -> Option<String> {
    if let Some(value) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        let value = value.trim();
        let key = value
            .strip_prefix("Key ")
            .or_else(|| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|k| !k.is_empty());
        if let Some(key) = key {
            return Some(key.to_string());
        }
    }

    Query::<ApiKeyParam>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(param)| param.api_key)
        .filter(|k| !k.is_empty())
}

/// Map an API key to a principal.
pub fn authenticate(auth: &AuthSettings, api_key: Option<&str>) -> Result<Principal, AppError> {
    if !auth.is_enabled() {
        return Ok(Principal::anonymous());
    }

    let key = api_key.ok_or_else(|| AppError::Unauthorized("API key required".to_string()))?;
    let settings = auth
        .find_key(key)
        .ok_or_else(|| AppError::Unauthorized("Invalid API key".to_string()))?;

    Ok(Principal::with_permissions(
        settings.name.clone(),
        settings.permissions.iter().cloned(),
    ))
}

/// Reject the request unless the caller holds `permission`.
pub async fn require_permission(
    state: &AppState,
    permission: &str,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(&request);
    let principal = authenticate(&state.auth, api_key.as_deref())?;

    if !principal.has_permission(permission) {
        debug!("{} denied: missing {}", principal.name, permission);
        return Err(AppError::Forbidden(format!(
            "Missing permission: {}",
            permission
        )));
    }

    debug!("{} granted {}", principal.name, permission);
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Middleware gating routes on [`LIST_QUERIES`].
pub async fn require_list_queries(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permission(&state, LIST_QUERIES, request, next).await
}
