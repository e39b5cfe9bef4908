//! Page-number pagination for admin listings

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
}

/// 1-based page number; absent or below 1 means the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery(pub i64);

impl Default for PageQuery {
    fn default() -> Self {
        Self(1)
    }
}

impl From<PageParams> for PageQuery {
    fn from(params: PageParams) -> Self {
        Self(params.page.unwrap_or(1).max(1))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(params.into())
    }
}
