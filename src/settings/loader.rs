//! Bank loading from CSV files
//!
//! Each `*.csv` file in a directory is one bank, named after the file stem.
//! The first row is a header. Every other row is `name, number, min, max`.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use super::registry::{Bank, Registry};
use super::setting::Setting;
use crate::error::{P12Error, Result};

/// One CSV row, deserialized by position
#[derive(Debug, Deserialize)]
struct SettingRecord {
    name: String,
    number: u16,
    min: u16,
    max: u16,
}

/// Result of loading a bank directory
#[derive(Debug)]
pub struct LoadedBanks {
    pub registry: Registry,
    /// Records that were reported and skipped
    pub rejected: Vec<P12Error>,
}

/// Read one bank from CSV data
///
/// Rows that fail to parse are logged, collected in the returned list, and
/// skipped. They never stop the rest of the bank from loading.
pub fn read_bank<R: Read>(name: &str, reader: R) -> (Bank, Vec<P12Error>) {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut settings = Vec::new();
    let mut rejected = Vec::new();

    for (index, row) in csv_reader.records().enumerate() {
        // Row 1 is the header
        let location = format!("{} row {}", name, index + 2);

        let parsed = row
            .map_err(|e| e.to_string())
            .and_then(|record| {
                record
                    .deserialize::<SettingRecord>(None)
                    .map_err(|e| format!("{} in {:?}", e, record.iter().collect::<Vec<_>>()))
            })
            .and_then(|rec| {
                Setting::new(rec.name, rec.number, rec.min, rec.max).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(setting) => settings.push(setting),
            Err(reason) => {
                warn!("Could not parse {}: {}", location, reason);
                rejected.push(P12Error::ParseFailure { location, reason });
            }
        }
    }

    (Bank::new(name, settings), rejected)
}

/// Load one bank from a CSV file
pub fn load_bank(path: &Path) -> Result<(Bank, Vec<P12Error>)> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| P12Error::InvalidArgument {
            reason: format!("no bank name in {}", path.display()),
        })?
        .to_string();

    let file = fs::File::open(path)?;
    Ok(read_bank(&name, file))
}

/// Load every `*.csv` bank in `dir` into a registry
///
/// # Errors
/// Returns `BanksDirNotFound` if `dir` is not a directory. Malformed rows do
/// not fail the load; they are listed in [`LoadedBanks::rejected`].
pub fn load_dir(dir: &Path) -> Result<LoadedBanks> {
    if !dir.is_dir() {
        return Err(P12Error::BanksDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut banks = Vec::new();
    let mut rejected = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") || !path.is_file() {
            continue;
        }

        match load_bank(&path) {
            Ok((bank, mut bad_rows)) => {
                if bank.is_empty() {
                    warn!("Bank '{}' has no settings", bank.name());
                } else {
                    info!("Loaded bank '{}' ({} settings)", bank.name(), bank.len());
                }
                banks.push(bank);
                rejected.append(&mut bad_rows);
            }
            Err(e) => {
                warn!("Could not load bank {}: {}", path.display(), e);
                rejected.push(P12Error::ParseFailure {
                    location: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(LoadedBanks {
        registry: Registry::new(banks),
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const OSC_CSV: &str = "\
name,nrpn,min,max
Osc1 Freq,0,0,120
Osc1 Fine,1,0,100
Osc1 Shape,2,0,4
";

    #[test]
    fn test_read_bank() {
        let (bank, rejected) = read_bank("osc", OSC_CSV.as_bytes());
        assert!(rejected.is_empty());
        assert_eq!(bank.name(), "osc");
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.settings()[2], Setting::new("Osc1 Shape", 2, 0, 4).unwrap());
    }

    #[test]
    fn test_read_bank_trims_fields() {
        let data = "name,nrpn,min,max\n  Glide Rate , 12 , 0 , 127 \n";
        let (bank, rejected) = read_bank("glide", data.as_bytes());
        assert!(rejected.is_empty());
        assert_eq!(bank.settings()[0].name(), "Glide Rate");
        assert_eq!(bank.settings()[0].number(), 12);
    }

    #[test]
    fn test_read_bank_quoted_name() {
        let data = "name,nrpn,min,max\n\"Env, Amount\",30,0,254\n";
        let (bank, _) = read_bank("env", data.as_bytes());
        assert_eq!(bank.settings()[0].name(), "Env, Amount");
    }

    #[test]
    fn test_read_bank_skips_bad_rows() {
        let data = "\
name,nrpn,min,max
Good One,5,0,10
Not A Number,abc,0,10
Short Row,6
Inverted,7,10,0
Good Two,8,0,1
";
        let (bank, rejected) = read_bank("mixed", data.as_bytes());
        let names: Vec<&str> = bank.settings().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Good One", "Good Two"]);
        assert_eq!(rejected.len(), 3);
        assert!(rejected
            .iter()
            .all(|e| matches!(e, P12Error::ParseFailure { .. })));
    }

    #[test]
    fn test_rejected_row_location() {
        let data = "name,nrpn,min,max\nBad,x,0,1\n";
        let (_, rejected) = read_bank("bank", data.as_bytes());
        match &rejected[0] {
            P12Error::ParseFailure { location, .. } => assert_eq!(location, "bank row 2"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("osc.csv"), OSC_CSV).unwrap();
        fs::write(
            dir.path().join("lfo.csv"),
            "name,nrpn,min,max\nLFO1 Rate,100,0,127\nbroken\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.txt"), "not a bank").unwrap();

        let loaded = load_dir(dir.path()).unwrap();
        assert_eq!(loaded.registry.bank_names(), vec!["lfo", "osc"]);
        assert_eq!(loaded.registry.all_settings().len(), 4);
        assert_eq!(loaded.rejected.len(), 1);
    }

    #[test]
    fn test_load_dir_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = load_dir(&missing);
        assert!(matches!(result, Err(P12Error::BanksDirNotFound { .. })));
    }
}
