use crate::priority::calculator::Priority;

/// The tier actually shown: a manual override always beats the calculated tier.
pub fn resolve_display_priority(calculated: Priority, manual_override: Option<Priority>) -> Priority {
    manual_override.unwrap_or(calculated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        assert_eq!(
            resolve_display_priority(Priority::Green, Some(Priority::Red)),
            Priority::Red
        );
    }

    #[test]
    fn test_override_can_lower_tier() {
        assert_eq!(
            resolve_display_priority(Priority::Red, Some(Priority::Green)),
            Priority::Green
        );
    }

    #[test]
    fn test_no_override_keeps_calculated() {
        assert_eq!(resolve_display_priority(Priority::Red, None), Priority::Red);
    }
}
