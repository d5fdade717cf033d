use serde::{Deserialize, Serialize};

/// Player preferences, independent of any one puzzle session.
///
/// Persisted through the storage port on every change; the stored shape is
/// `{"autoCheck": bool}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// When enabled, advancement after a keystroke skips to the next
    /// empty-or-incorrect cell instead of the next empty cell.
    pub auto_check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_off() {
        assert!(!Preferences::default().auto_check);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&Preferences { auto_check: true }).unwrap();
        assert_eq!(json, "{\"autoCheck\":true}");
    }
}
