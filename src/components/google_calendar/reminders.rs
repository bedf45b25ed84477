use super::models::RawReminders;

/// Popup lead time used when an event has no explicit popup override
pub const DEFAULT_REMINDER_MINUTES: u32 = 10;

/// Resolve the effective popup-reminder lead time for an event.
///
/// "Use calendar default" beats any override list that may also be present.
/// Otherwise the first override with method `popup` wins, in list order as
/// supplied by the provider. No popup override means the default.
pub fn resolve_reminder(reminders: Option<&RawReminders>, default_minutes: u32) -> u32 {
    let Some(block) = reminders else {
        return default_minutes;
    };

    if block.use_default {
        return default_minutes;
    }

    block
        .overrides
        .iter()
        .find(|o| o.method == "popup")
        .map(|o| o.minutes)
        .unwrap_or(default_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::RawReminderOverride;

    fn block(use_default: bool, overrides: Vec<(&str, u32)>) -> RawReminders {
        RawReminders {
            use_default,
            overrides: overrides
                .into_iter()
                .map(|(method, minutes)| RawReminderOverride {
                    method: method.to_string(),
                    minutes,
                })
                .collect(),
        }
    }

    #[test]
    fn test_absent_block_uses_default() {
        assert_eq!(resolve_reminder(None, 10), 10);
    }

    #[test]
    fn test_use_default_beats_overrides() {
        let b = block(true, vec![("popup", 45), ("email", 5)]);
        assert_eq!(resolve_reminder(Some(&b), 10), 10);
    }

    #[test]
    fn test_first_popup_override_wins() {
        let b = block(false, vec![("email", 5), ("popup", 25), ("popup", 45)]);
        assert_eq!(resolve_reminder(Some(&b), 10), 25);
    }

    #[test]
    fn test_no_popup_override_falls_back() {
        let b = block(false, vec![("email", 5)]);
        assert_eq!(resolve_reminder(Some(&b), 10), 10);

        let empty = block(false, vec![]);
        assert_eq!(resolve_reminder(Some(&empty), 10), 10);
    }
}
