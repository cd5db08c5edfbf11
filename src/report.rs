use std::collections::BTreeMap;

use crate::error::{ItemError, ItemErrorKind};

/// Outcome of one batch run over a directory
#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: usize,
    pub failures: Vec<(String, ItemError)>,
}

impl RunReport {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: ItemError) {
        self.failures.push((name.into(), error));
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<ItemErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for (_, error) in &self.failures {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Print the end-of-run summary; `noun` names the processed items ("files", "images")
    pub fn print_summary(&self, noun: &str) {
        println!("\n📊 Summary:");
        println!("  ✅ Processed {}: {}", noun, self.processed);
        if self.failures.is_empty() {
            return;
        }
        println!("  ❌ Failed {}: {}", noun, self.failed());
        for (kind, count) in self.counts_by_kind() {
            println!("     - {}: {}", kind, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_failures_per_kind() {
        let mut report = RunReport::default();
        report.record_success();
        report.record_failure("a", ItemError::new(ItemErrorKind::DecodeFailed, "bad"));
        report.record_failure("b", ItemError::new(ItemErrorKind::DecodeFailed, "worse"));
        report.record_failure("c", ItemError::new(ItemErrorKind::AlreadyExists, "taken"));

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed(), 3);

        let counts = report.counts_by_kind();
        assert_eq!(counts[&ItemErrorKind::DecodeFailed], 2);
        assert_eq!(counts[&ItemErrorKind::AlreadyExists], 1);
        assert!(!counts.contains_key(&ItemErrorKind::Io));
    }
}
