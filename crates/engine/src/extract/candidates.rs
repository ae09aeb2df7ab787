//! First-writer-wins label/value substrate the rule table reads from.

/// Label → first-seen value pairs, in document order. Labels are stored
/// lower-cased; a label is inserted at most once, so the scan order of the
/// harvesting passes (tables, then definition lists, then free text) is
/// the priority order.
#[derive(Debug, Default)]
pub struct CandidatePairs {
    entries: Vec<(String, String)>,
}

impl CandidatePairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the label was already seen. Blank labels, blank
    /// values, and the "-" placeholder are dropped at the door.
    pub fn insert_first(&mut self, label: &str, value: &str) {
        let label = label.trim().to_lowercase();
        let value = value.trim();
        if label.is_empty() || value.is_empty() || value == "-" {
            return;
        }
        if self.entries.iter().any(|(l, _)| *l == label) {
            return;
        }
        self.entries.push((label, value.to_string()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins() {
        let mut pairs = CandidatePairs::new();
        pairs.insert_first("Gewicht", "12 kg");
        pairs.insert_first("gewicht ", "999 kg");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.iter().next(), Some(("gewicht", "12 kg")));
    }

    #[test]
    fn placeholders_dropped() {
        let mut pairs = CandidatePairs::new();
        pairs.insert_first("werkstoff", "-");
        pairs.insert_first("werkstoff", "  ");
        pairs.insert_first("", "S355");
        assert!(pairs.is_empty());
        pairs.insert_first("werkstoff", "S355");
        assert_eq!(pairs.len(), 1);
    }
}
