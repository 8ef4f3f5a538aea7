//! Product analytics events
//!
//! Events go out as structured tracing records on the `analytics` target so a
//! collector can ship them. Nothing waits on them.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsEvent {
    SubscriptionViewed,
    BillingPortalOpened,
}

impl AnalyticsEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEvent::SubscriptionViewed => "subscription_viewed",
            AnalyticsEvent::BillingPortalOpened => "billing_portal_opened",
        }
    }
}

impl std::fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn track(event: AnalyticsEvent, user_id: Option<&str>, properties: Value) {
    tracing::info!(
        target: "analytics",
        event = %event,
        user_id = user_id.unwrap_or("anonymous"),
        properties = %properties,
        "analytics event"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(
            AnalyticsEvent::SubscriptionViewed.to_string(),
            "subscription_viewed"
        );
        assert_eq!(
            AnalyticsEvent::BillingPortalOpened.as_str(),
            "billing_portal_opened"
        );
    }

    #[test]
    fn test_track_without_subscriber_is_harmless() {
        track(
            AnalyticsEvent::SubscriptionViewed,
            None,
            serde_json::json!({ "subscriptions": 0 }),
        );
    }
}
