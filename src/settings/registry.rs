//! Setting registry
//!
//! Holds every loaded bank and a flattened copy of all settings sorted by NRPN
//! number. Built once, read-only afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

use super::setting::Setting;

/// A named, ordered group of settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bank {
    name: String,
    settings: Vec<Setting>,
}

impl Bank {
    pub fn new(name: impl Into<String>, settings: Vec<Setting>) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// In-memory collection of banks, indexed by NRPN number
#[derive(Debug, Clone, Default)]
pub struct Registry {
    banks: BTreeMap<String, Bank>,
    /// All settings across all banks, stably sorted by number
    sorted: Vec<Setting>,
}

impl Registry {
    /// Build a registry from loaded banks
    ///
    /// Settings sharing a number keep their relative order: banks are taken in
    /// name order, settings in bank order, then stably sorted by number. A later
    /// bank with the same name replaces an earlier one.
    pub fn new(banks: impl IntoIterator<Item = Bank>) -> Self {
        let banks: BTreeMap<String, Bank> = banks
            .into_iter()
            .map(|bank| (bank.name.clone(), bank))
            .collect();

        let mut sorted: Vec<Setting> = banks
            .values()
            .flat_map(|bank| bank.settings.iter().cloned())
            .collect();
        sorted.sort_by_key(Setting::number);

        Self { banks, sorted }
    }

    /// Every setting whose number is `number`, in sorted order
    ///
    /// Binary search for the first candidate, then scan forward while the
    /// number still matches. Duplicates are contiguous since `sorted` is ordered.
    pub fn lookup_by_number(&self, number: u16) -> Vec<Setting> {
        let start = self.sorted.partition_point(|s| s.number() < number);
        self.sorted[start..]
            .iter()
            .take_while(|s| s.number() == number)
            .cloned()
            .collect()
    }

    /// Get a bank by name
    pub fn lookup_bank(&self, name: &str) -> Option<&Bank> {
        self.banks.get(name)
    }

    /// All settings sorted by number
    pub fn all_settings(&self) -> &[Setting] {
        &self.sorted
    }

    /// Bank names in sorted order
    pub fn bank_names(&self) -> Vec<&str> {
        self.banks.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setting(name: &str, number: u16) -> Setting {
        Setting::new(name, number, 0, 127).unwrap()
    }

    fn test_registry() -> Registry {
        Registry::new(vec![
            Bank::new(
                "osc",
                vec![
                    setting("Osc1 Freq", 0),
                    setting("Osc1 Fine", 1),
                    setting("Osc1 Shape", 2),
                ],
            ),
            Bank::new(
                "lfo",
                vec![setting("LFO1 Rate", 100), setting("LFO1 Shape", 2)],
            ),
            Bank::new("global", vec![setting("Split Point", 287)]),
        ])
    }

    #[test]
    fn test_all_settings_sorted() {
        let registry = test_registry();
        let numbers: Vec<u16> = registry.all_settings().iter().map(Setting::number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 2, 100, 287]);
    }

    #[test]
    fn test_lookup_by_number_single() {
        let registry = test_registry();
        let found = registry.lookup_by_number(100);
        assert_eq!(found, vec![setting("LFO1 Rate", 100)]);
    }

    #[test]
    fn test_lookup_by_number_duplicates() {
        let registry = test_registry();
        let names: Vec<String> = registry
            .lookup_by_number(2)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        // "lfo" sorts before "osc"
        assert_eq!(names, vec!["LFO1 Shape", "Osc1 Shape"]);
    }

    #[test]
    fn test_lookup_by_number_absent() {
        let registry = test_registry();
        assert!(registry.lookup_by_number(50).is_empty());
    }

    #[test]
    fn test_lookup_by_number_below_minimum() {
        let registry = Registry::new(vec![Bank::new("b", vec![setting("A", 10)])]);
        assert!(registry.lookup_by_number(0).is_empty());
        assert!(registry.lookup_by_number(9).is_empty());
    }

    #[test]
    fn test_lookup_by_number_above_maximum() {
        let registry = test_registry();
        assert!(registry.lookup_by_number(288).is_empty());
        assert!(registry.lookup_by_number(u16::MAX).is_empty());
    }

    #[test]
    fn test_lookup_first_element() {
        let registry = test_registry();
        assert_eq!(registry.lookup_by_number(0).len(), 1);
    }

    #[test]
    fn test_lookup_empty_registry() {
        let registry = Registry::default();
        assert!(registry.lookup_by_number(0).is_empty());
        assert!(registry.all_settings().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_bank() {
        let registry = test_registry();
        let bank = registry.lookup_bank("osc").unwrap();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.settings()[0].name(), "Osc1 Freq");
        assert!(registry.lookup_bank("filter").is_none());
    }

    #[test]
    fn test_bank_names() {
        let registry = test_registry();
        assert_eq!(registry.bank_names(), vec!["global", "lfo", "osc"]);
    }
}
