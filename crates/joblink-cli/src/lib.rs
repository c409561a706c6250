use std::collections::HashMap;

use joblink_core::models::Collection;

/// Render pending-queue counts in a fixed collection order.
pub fn format_pending_summary(counts: &HashMap<Collection, usize>) -> String {
    Collection::ALL
        .iter()
        .map(|collection| {
            format!(
                "{}: {}",
                collection,
                counts.get(collection).copied().unwrap_or(0)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_all_collections_in_order() {
        let mut counts = HashMap::new();
        counts.insert(Collection::Bids, 2);
        counts.insert(Collection::Messages, 1);
        assert_eq!(
            format_pending_summary(&counts),
            "bids: 2, bookings: 0, messages: 1"
        );
    }

    #[test]
    fn empty_counts_render_zeros() {
        assert_eq!(
            format_pending_summary(&HashMap::new()),
            "bids: 0, bookings: 0, messages: 0"
        );
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
