//! User-facing text.
//!
//! [`Message`] enumerates everything shopclock prints; `display.rs` holds
//! the wording and `macros.rs` the printing macros.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;

pub fn success(msg: Message) -> String {
    format!("✅ {}", msg)
}

pub fn warning(msg: Message) -> String {
    format!("⚠️  {}", msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_applied() {
        assert_eq!(success(Message::ConfigSaved), "✅ Configuration saved successfully");
        assert_eq!(
            warning(Message::StaleEntryWarning(21)),
            "⚠️  This entry has been open for 21 hours. If you forgot to clock out, use 'shopclock correct'."
        );
    }

    #[test]
    fn sweep_summary_reads_naturally() {
        let text = Message::SweepCompleted {
            processed: 3,
            flagged: 1,
            approaching: 2,
        }
        .to_string();
        assert_eq!(text, "Processed 3 open entries, flagged 1, 2 approaching the cap");
    }
}
