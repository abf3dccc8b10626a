//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Number of records before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let params = self.clamped();
        u64::from(params.page.saturating_sub(1)).saturating_mul(u64::from(params.per_page))
    }

    /// Maximum number of records on one page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.clamped().per_page)
    }

    /// Builds the metadata for this page given the total record count.
    #[must_use]
    pub fn meta(&self, total: u64) -> PaginationMeta {
        let params = self.clamped();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        PaginationMeta {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages: total.div_ceil(params.per_page),
        }
    }
}
