//! Provider discovery
//!
//! Optional `service`, `state` and `district` filters are combined into one
//! conjunctive predicate. A filter that is absent or blank is left out of
//! the query entirely, so no filters at all lists every provider.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

const DISCOVERY_SELECT: &str = r#"
SELECT sp.id, sp.name, sp.state, sp.district, sp.phone_number,
       COALESCE(
           (SELECT array_agg(s.name ORDER BY s.created_at, s.id)
            FROM services s
            WHERE s.service_provider_id = sp.id),
           ARRAY[]::text[]
       ) AS services,
       (SELECT i.url
        FROM images i
        WHERE i.service_provider_id = sp.id
        ORDER BY i.created_at DESC, i.id DESC
        LIMIT 1) AS image_url
FROM service_providers sp"#;

// Placeholder figures shown on every provider card until reviews, pricing
// and enquiry tracking exist.
const PLACEHOLDER_RATING: f64 = 4.5;
const PLACEHOLDER_PRICE_PER_HOUR: i64 = 1000;
const PLACEHOLDER_RESPONSE_TIME: &str = "1 hour";
const PLACEHOLDER_RECENT_ENQUIRIES: i64 = 10;

/// Discovery query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryFilter {
    pub service: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

impl DiscoveryFilter {
    fn service(&self) -> Option<&str> {
        non_blank(&self.service)
    }

    fn state(&self) -> Option<&str> {
        non_blank(&self.state)
    }

    fn district(&self) -> Option<&str> {
        non_blank(&self.district)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Build the discovery query for a filter
pub fn build_discovery_query(filter: &DiscoveryFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(DISCOVERY_SELECT);
    let mut has_predicate = false;

    if let Some(state) = filter.state() {
        push_connector(&mut query, &mut has_predicate);
        query.push("sp.state = ").push_bind(state);
    }

    if let Some(district) = filter.district() {
        push_connector(&mut query, &mut has_predicate);
        query.push("sp.district = ").push_bind(district);
    }

    if let Some(service) = filter.service() {
        push_connector(&mut query, &mut has_predicate);
        query
            .push("EXISTS (SELECT 1 FROM services s WHERE s.service_provider_id = sp.id AND s.name = ")
            .push_bind(service)
            .push(")");
    }

    query.push(" ORDER BY sp.created_at, sp.id");
    query
}

fn push_connector(query: &mut QueryBuilder<'_, Postgres>, has_predicate: &mut bool) {
    query.push(if *has_predicate { " AND " } else { " WHERE " });
    *has_predicate = true;
}

/// Row returned by the discovery query
#[derive(Debug, Clone, FromRow)]
pub struct ProviderRow {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub district: String,
    pub phone_number: String,
    pub services: Vec<String>,
    pub image_url: Option<String>,
}

/// Provider card returned by discovery
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub district: String,
    pub services: Vec<String>,
    pub phone_number: String,
    pub image_url: Option<String>,
    pub rating: f64,
    pub price_per_hour: i64,
    pub response_time: &'static str,
    pub recent_enquiries: i64,
}

impl From<ProviderRow> for ProviderSummary {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            state: row.state,
            district: row.district,
            services: row.services,
            phone_number: row.phone_number,
            image_url: row.image_url,
            rating: PLACEHOLDER_RATING,
            price_per_hour: PLACEHOLDER_PRICE_PER_HOUR,
            response_time: PLACEHOLDER_RESPONSE_TIME,
            recent_enquiries: PLACEHOLDER_RECENT_ENQUIRIES,
        }
    }
}
