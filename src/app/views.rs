//! Table layouts for each screen's data.

use crate::app::screens::feed_providers::ProviderRow;
use crate::app::screens::status_board::BoardRow;
use crate::app::screens::validation_report::ReportSummaryRow;
use crate::core::bulk::{BulkOutcome, BulkReport};
use crate::core::cache_keys::CacheKeyGroup;
use crate::core::stop_place_table::StopPlaceRow;
use crate::domain::model::{FeedProvider, SubscriptionStatus};
use crate::utils::output::{opt, Table};

pub fn provider_table(rows: &[ProviderRow]) -> Table {
    let mut table = Table::new(&["SYSTEM", "OPERATOR", "CODESPACE", "VERSION", "ENABLED", "STATUS"]);
    for row in rows {
        let p = &row.provider;
        table.push_row(vec![
            p.system_id.clone(),
            opt(p.operator_name.as_deref()),
            opt(p.codespace.as_deref()),
            opt(p.version.as_deref()),
            p.enabled.to_string(),
            row.subscription_status.to_string(),
        ]);
    }
    table
}

pub fn provider_detail_table(provider: &FeedProvider) -> Table {
    let mut table = Table::new(&["FIELD", "VALUE"]);
    let mut field = |name: &str, value: String| table.push_row(vec![name.to_string(), value]);
    field("systemId", provider.system_id.clone());
    field("operatorId", opt(provider.operator_id.as_deref()));
    field("operatorName", opt(provider.operator_name.as_deref()));
    field("codespace", opt(provider.codespace.as_deref()));
    field("url", opt(provider.url.as_deref()));
    field("language", opt(provider.language.as_deref()));
    field("version", opt(provider.version.as_deref()));
    field("enabled", provider.enabled.to_string());
    field("aggregate", provider.aggregate.to_string());
    field(
        "authentication",
        provider
            .authentication
            .as_ref()
            .map(|a| format!("{:?}", a.scheme))
            .unwrap_or_else(|| "-".to_string()),
    );
    field(
        "excludeFeeds",
        provider
            .exclude_feeds
            .as_ref()
            .map(|f| f.join(", "))
            .unwrap_or_else(|| "-".to_string()),
    );
    table
}

pub fn subscription_table<'a, I>(statuses: I) -> Table
where
    I: IntoIterator<Item = (&'a String, &'a SubscriptionStatus)>,
{
    let mut table = Table::new(&["SYSTEM", "STATUS"]);
    let mut rows: Vec<_> = statuses.into_iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for (id, status) in rows {
        table.push_row(vec![id.clone(), status.to_string()]);
    }
    table
}

pub fn bulk_table(report: &BulkReport) -> Table {
    let mut table = Table::new(&["SYSTEM", "OUTCOME", "MESSAGE"]);
    for item in &report.items {
        let (outcome, message) = match &item.outcome {
            BulkOutcome::Succeeded => ("succeeded", String::new()),
            BulkOutcome::Failed(message) => ("failed", message.clone()),
            BulkOutcome::Missing => ("missing", "no result returned".to_string()),
        };
        table.push_row(vec![item.system_id.clone(), outcome.to_string(), message]);
    }
    for id in &report.unexpected {
        table.push_row(vec![
            id.clone(),
            "unexpected".to_string(),
            "not requested".to_string(),
        ]);
    }
    table
}

pub fn cache_table(groups: &[CacheKeyGroup]) -> Table {
    let mut table = Table::new(&["TYPE", "KEY"]);
    for group in groups {
        for key in &group.keys {
            table.push_row(vec![group.name.clone(), key.clone()]);
        }
    }
    table
}

pub fn list_table(header: &str, values: &[String]) -> Table {
    let mut table = Table::new(&[header]);
    for value in values {
        table.push_row(vec![value.clone()]);
    }
    table
}

pub fn board_table(rows: &[BoardRow]) -> Table {
    let mut table = Table::new(&["SYSTEM", "OPERATOR", "VERSION", "STATUS", "VALIDATION", "ERRORS"]);
    for row in rows {
        table.push_row(vec![
            row.provider.system_id.clone(),
            opt(row.provider.operator_name.as_deref()),
            opt(row.provider.version.as_deref()),
            row.provider.subscription_status.to_string(),
            row.validation.label().to_string(),
            row.errors_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

pub fn report_summary_table(rows: &[ReportSummaryRow]) -> Table {
    let mut table = Table::new(&["SYSTEM", "VERSION", "CHECKED", "ERRORS"]);
    for row in rows {
        table.push_row(vec![
            row.system_id.clone(),
            opt(row.version.as_deref()),
            row.checked_at.clone(),
            row.errors_count.to_string(),
        ]);
    }
    table
}

pub fn stop_place_table(rows: &[StopPlaceRow]) -> Table {
    let mut table = Table::new(&["SYSTEM", "STATION", "NAME", "CAPACITY"]);
    for row in rows {
        table.push_row(vec![
            row.system_id.clone(),
            row.station_id.clone(),
            row.name.clone(),
            row.capacity
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}
