use super::net_worth_model::{ActivityFeedItem, ActivityItemType};
use crate::transactions::Transaction;
use crate::valuations::ValuationPoint;

/// Merges valuations and transactions into one feed, newest first.
pub fn build_activity_feed(
    valuations: &[ValuationPoint],
    transactions: &[Transaction],
    limit: usize,
) -> Vec<ActivityFeedItem> {
    let valuation_items = valuations.iter().map(|v| ActivityFeedItem {
        item_type: ActivityItemType::Valuation,
        id: v.id.clone(),
        name: v.name.clone(),
        value: v.value,
        date: v.date,
        label: v.kind.as_str().to_string(),
    });

    let transaction_items = transactions.iter().map(|t| ActivityFeedItem {
        item_type: ActivityItemType::Transaction,
        id: t.id.clone(),
        name: t.description.clone(),
        value: t.amount,
        date: t.date,
        label: if t.is_income() { "income" } else { "expense" }.to_string(),
    });

    let mut items: Vec<ActivityFeedItem> = valuation_items.chain(transaction_items).collect();
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(limit);
    items
}
