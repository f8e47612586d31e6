// Identifier generation for dashboards, containers and components
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Kind prefixes used in generated ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Dashboard,
    Container,
    Component,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Dashboard => "dashboard",
            IdKind::Container => "container",
            IdKind::Component => "component",
        }
    }
}

/// Builds `<kind>-<unix-millis>-<seq>`. The sequence is process-wide, so two
/// ids created within the same millisecond still differ.
pub fn generate_id(kind: IdKind) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", kind.prefix(), millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_prefix() {
        assert!(generate_id(IdKind::Dashboard).starts_with("dashboard-"));
        assert!(generate_id(IdKind::Container).starts_with("container-"));
        assert!(generate_id(IdKind::Component).starts_with("component-"));
    }

    #[test]
    fn test_rapid_ids_do_not_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id(IdKind::Component)).collect();
        assert_eq!(ids.len(), 1000);
    }
}
