//! Tab Fetch Plans
//!
//! Which endpoints each tab needs, fetched concurrently and bundled into one
//! validated [`TabData`] value. A tab's data exists only when every one of
//! its requests succeeded.

use futures_util::future::{join, join3};
use serde::Serialize;

use super::tabs::Tab;
use crate::api::{
    AdmissionBreakdown, ApiClient, Demographics, Disposition, Endpoint, LosDistribution,
    OutlierSummary, Overview, PaymentBreakdown, SeverityBreakdown, SeveritySeniorBreakdown,
    Timer, TopDrgs, Transport,
};
use crate::error::FetchError;

/// Validated payloads for one tab
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum TabData {
    Overview {
        overview: Overview,
        distribution: LosDistribution,
    },
    Severity {
        severity: SeverityBreakdown,
        senior: SeveritySeniorBreakdown,
    },
    Demographics(Demographics),
    Payment {
        payment: PaymentBreakdown,
        admission: AdmissionBreakdown,
        disposition: Disposition,
    },
    Trends(TopDrgs),
    Outliers(OutlierSummary),
}

impl TabData {
    pub fn tab(&self) -> Tab {
        match self {
            TabData::Overview { .. } => Tab::Overview,
            TabData::Severity { .. } => Tab::Severity,
            TabData::Demographics(_) => Tab::Demographics,
            TabData::Payment { .. } => Tab::Payment,
            TabData::Trends(_) => Tab::Trends,
            TabData::Outliers(_) => Tab::Outliers,
        }
    }
}

/// Endpoints backing a tab, in dispatch order
pub fn endpoints_for(tab: Tab) -> &'static [Endpoint] {
    match tab {
        Tab::Overview => &[Endpoint::Overview, Endpoint::LosDistribution],
        Tab::Severity => &[Endpoint::Severity, Endpoint::SeveritySenior],
        Tab::Demographics => &[Endpoint::Demographics],
        Tab::Payment => &[Endpoint::Payment, Endpoint::Admission, Endpoint::Disposition],
        Tab::Trends => &[Endpoint::TopDrgs],
        Tab::Outliers => &[Endpoint::Outliers],
    }
}

/// Fetch every endpoint of `tab` concurrently.
///
/// All requests are driven to completion even when one fails; the first
/// failure in dispatch order is returned.
pub async fn fetch_tab<T, C>(
    client: &ApiClient<T, C>,
    tab: Tab,
    query: &str,
) -> Result<TabData, FetchError>
where
    T: Transport,
    C: Timer,
{
    match tab {
        Tab::Overview => {
            let (overview, distribution) = join(
                client.fetch::<Overview>(Endpoint::Overview, query),
                client.fetch::<LosDistribution>(Endpoint::LosDistribution, query),
            )
            .await;
            Ok(TabData::Overview {
                overview: overview?,
                distribution: distribution?,
            })
        }
        Tab::Severity => {
            let (severity, senior) = join(
                client.fetch::<SeverityBreakdown>(Endpoint::Severity, query),
                client.fetch::<SeveritySeniorBreakdown>(Endpoint::SeveritySenior, query),
            )
            .await;
            Ok(TabData::Severity {
                severity: severity?,
                senior: senior?,
            })
        }
        Tab::Demographics => {
            let demographics = client
                .fetch::<Demographics>(Endpoint::Demographics, query)
                .await?;
            Ok(TabData::Demographics(demographics))
        }
        Tab::Payment => {
            let (payment, admission, disposition) = join3(
                client.fetch::<PaymentBreakdown>(Endpoint::Payment, query),
                client.fetch::<AdmissionBreakdown>(Endpoint::Admission, query),
                client.fetch::<Disposition>(Endpoint::Disposition, query),
            )
            .await;
            Ok(TabData::Payment {
                payment: payment?,
                admission: admission?,
                disposition: disposition?,
            })
        }
        Tab::Trends => {
            let drgs = client.fetch::<TopDrgs>(Endpoint::TopDrgs, query).await?;
            Ok(TabData::Trends(drgs))
        }
        Tab::Outliers => {
            let outliers = client
                .fetch::<OutlierSummary>(Endpoint::Outliers, query)
                .await?;
            Ok(TabData::Outliers(outliers))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, MockTransport, TestTimer};

    #[tokio::test]
    async fn test_payment_tab_fetches_three_endpoints() {
        let transport = fixtures::full_api();
        let api = ApiClient::new(transport, TestTimer, "http://test/api");

        let data = fetch_tab(&api, Tab::Payment, "severity=2").await.unwrap();
        assert_eq!(data.tab(), Tab::Payment);

        let requests = api_requests(&api);
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|url| url.ends_with("?severity=2")));
    }

    #[tokio::test]
    async fn test_partial_failure_yields_no_data() {
        let transport = MockTransport::new()
            .respond(Endpoint::Overview, 200, fixtures::OVERVIEW)
            .respond(Endpoint::LosDistribution, 500, "boom");
        let api = ApiClient::new(transport, TestTimer, "http://test/api");

        let err = fetch_tab(&api, Tab::Overview, "").await.unwrap_err();
        assert_eq!(err.endpoint(), Endpoint::LosDistribution);
    }

    #[tokio::test]
    async fn test_every_tab_fetches_its_plan() {
        for tab in Tab::ALL {
            let api = ApiClient::new(fixtures::full_api(), TestTimer, "http://test/api");
            let data = fetch_tab(&api, tab, "").await.unwrap();
            assert_eq!(data.tab(), tab);
            assert_eq!(api_requests(&api).len(), endpoints_for(tab).len());
        }
    }

    fn api_requests(api: &ApiClient<MockTransport, TestTimer>) -> Vec<String> {
        api.transport().requests()
    }
}
