//! API Endpoints
//!
//! The fixed set of GET routes the dashboard reads from, relative to the
//! API base (e.g. `http://localhost:5002/api`).

use std::fmt;

/// One aggregate view exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    DatasetInfo,
    FilterOptions,
    Overview,
    LosDistribution,
    Severity,
    SeveritySenior,
    Demographics,
    Payment,
    Admission,
    Disposition,
    TopDrgs,
    Outliers,
}

impl Endpoint {
    /// Path relative to the API base, without a leading slash
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::DatasetInfo => "dataset-info",
            Endpoint::FilterOptions => "filters/options",
            Endpoint::Overview => "data/overview",
            Endpoint::LosDistribution => "data/los-distribution",
            Endpoint::Severity => "data/severity",
            Endpoint::SeveritySenior => "data/severity-senior",
            Endpoint::Demographics => "data/demographics",
            Endpoint::Payment => "data/payment",
            Endpoint::Admission => "data/admission",
            Endpoint::Disposition => "data/disposition",
            Endpoint::TopDrgs => "data/top-drgs",
            Endpoint::Outliers => "data/outliers",
        }
    }

    /// Whether the endpoint honours the filter query parameters
    pub fn accepts_filters(&self) -> bool {
        !matches!(self, Endpoint::DatasetInfo | Endpoint::FilterOptions)
    }

    /// Build the full URL for this endpoint
    pub fn url(&self, base: &str, query: &str) -> String {
        let base = base.trim_end_matches('/');
        if query.is_empty() || !self.accepts_filters() {
            format!("{}/{}", base, self.path())
        } else {
            format!("{}/{}?{}", base, self.path(), query)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_query() {
        let url = Endpoint::Overview.url("http://localhost:5002/api/", "severity=3");
        assert_eq!(url, "http://localhost:5002/api/data/overview?severity=3");
    }

    #[test]
    fn test_url_without_query() {
        let url = Endpoint::Outliers.url("http://localhost:5002/api", "");
        assert_eq!(url, "http://localhost:5002/api/data/outliers");
    }

    #[test]
    fn test_metadata_endpoints_ignore_filters() {
        let url = Endpoint::FilterOptions.url("/api", "severity=3");
        assert_eq!(url, "/api/filters/options");
        assert_eq!(Endpoint::TopDrgs.to_string(), "/data/top-drgs");
    }
}
