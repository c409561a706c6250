use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published service listing in the marketplace catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListing {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub provider_id: Uuid,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Filters accepted by `GET /api/services/`.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilters {
    pub category: Option<String>,
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ServiceFilters {
    /// Render as query parameters, omitting unset fields.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(q) = &self.query {
            query.push(("q", q.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}

/// `GET /api/services/` response: a catalog page with freshness metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub services: Vec<ServiceListing>,
    pub sync_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub expires_after: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_to_query_omits_unset() {
        let filters = ServiceFilters {
            category: Some("plumbing".to_string()),
            limit: Some(20),
            ..ServiceFilters::default()
        };
        let query = filters.to_query();
        assert_eq!(query.len(), 2);
        assert_eq!(query[0], ("category", "plumbing".to_string()));
        assert_eq!(query[1], ("limit", "20".to_string()));
    }

    #[test]
    fn empty_filters_produce_no_params() {
        assert!(ServiceFilters::default().to_query().is_empty());
    }
}
