//! Modification parameters in SDRF key-value notation.
//!
//! A parameter is written as `NT=<name>;MT=<type>;PP=<position>;TA=<targets>`.
//! Known modifications take their leading part (name and accession) from a
//! Unimod catalog; custom ones append `CF=<formula>;MM=<mass>`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::compression::read_gzipped_json;
use crate::error::{Result, SdrfError};

use super::WorkingTable;

/// Base column for modification parameters; further ones go to `_1`, `_2`...
pub const MODIFICATION_COLUMN: &str = "comment[modification parameters]";

/// Amino acid one-letter codes accepted as modification targets.
pub const TARGET_AMINO_ACIDS: [&str; 21] = [
    "X", "G", "A", "L", "M", "F", "W", "K", "Q", "E", "S", "P", "V", "I", "C", "Y", "H", "R",
    "N", "D", "T",
];

/// `MT=` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationType {
    Fixed,
    Variable,
    Annotated,
}

impl ModificationType {
    pub const ALL: [ModificationType; 3] = [
        ModificationType::Fixed,
        ModificationType::Variable,
        ModificationType::Annotated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationType::Fixed => "Fixed",
            ModificationType::Variable => "Variable",
            ModificationType::Annotated => "Annotated",
        }
    }
}

impl fmt::Display for ModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationType {
    type Err = SdrfError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ModificationType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                SdrfError::Config(format!(
                    "unknown modification type '{s}', expected one of: {}",
                    ModificationType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// `PP=` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationPosition {
    Anywhere,
    ProteinNTerm,
    ProteinCTerm,
    AnyNTerm,
    AnyCTerm,
}

impl ModificationPosition {
    pub const ALL: [ModificationPosition; 5] = [
        ModificationPosition::Anywhere,
        ModificationPosition::ProteinNTerm,
        ModificationPosition::ProteinCTerm,
        ModificationPosition::AnyNTerm,
        ModificationPosition::AnyCTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationPosition::Anywhere => "Anywhere",
            ModificationPosition::ProteinNTerm => "Protein N-term",
            ModificationPosition::ProteinCTerm => "Protein C-term",
            ModificationPosition::AnyNTerm => "Any N-term",
            ModificationPosition::AnyCTerm => "Any C-term",
        }
    }
}

impl fmt::Display for ModificationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationPosition {
    type Err = SdrfError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ModificationPosition::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                SdrfError::Config(format!(
                    "unknown modification position '{s}', expected one of: {}",
                    ModificationPosition::ALL.map(|p| p.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ModificationSource {
    /// Leading notation from the catalog, e.g. `NT=Oxidation;AC=UNIMOD:35`.
    Known { name: String, notation: String },
    Custom {
        name: String,
        formula: String,
        mass: String,
    },
}

/// One modification, ready to be written into a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationParameter {
    source: ModificationSource,
    mod_type: ModificationType,
    position: ModificationPosition,
    targets: Vec<String>,
}

impl ModificationParameter {
    /// A catalog modification. `notation` is the catalog's entry for `name`.
    pub fn known(
        name: &str,
        notation: &str,
        mod_type: ModificationType,
        position: ModificationPosition,
        targets: &[&str],
    ) -> Result<Self> {
        if notation.trim().is_empty() {
            return Err(invalid(name, "catalog notation is empty"));
        }
        Ok(Self {
            source: ModificationSource::Known {
                name: name.to_string(),
                notation: notation.trim().to_string(),
            },
            mod_type,
            position,
            targets: check_targets(name, targets)?,
        })
    }

    /// A modification missing from the catalog, described by formula and mass.
    pub fn custom(
        name: &str,
        formula: &str,
        mass: &str,
        mod_type: ModificationType,
        position: ModificationPosition,
        targets: &[&str],
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(invalid(name, "name is empty"));
        }
        for (field, value) in [("NT", name), ("CF", formula), ("MM", mass)] {
            if value.contains(';') {
                return Err(invalid(name, &format!("{field} must not contain ';'")));
            }
        }
        Ok(Self {
            source: ModificationSource::Custom {
                name: name.trim().to_string(),
                formula: formula.trim().to_string(),
                mass: mass.trim().to_string(),
            },
            mod_type,
            position,
            targets: check_targets(name, targets)?,
        })
    }

    pub fn name(&self) -> &str {
        match &self.source {
            ModificationSource::Known { name, .. } | ModificationSource::Custom { name, .. } => name,
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// The SDRF cell value.
    pub fn sdrf_notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModificationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets = self.targets.join(",");
        match &self.source {
            ModificationSource::Known { notation, .. } => write!(
                f,
                "{notation};MT={};PP={};TA={targets}",
                self.mod_type, self.position
            ),
            ModificationSource::Custom {
                name,
                formula,
                mass,
            } => write!(
                f,
                "NT={name};MT={};PP={};TA={targets};CF={formula};MM={mass}",
                self.mod_type, self.position
            ),
        }
    }
}

fn invalid(name: &str, reason: &str) -> SdrfError {
    SdrfError::InvalidModification {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn check_targets(name: &str, targets: &[&str]) -> Result<Vec<String>> {
    if targets.is_empty() {
        return Err(invalid(name, "at least one target amino acid is required"));
    }
    let mut checked: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets {
        let code = target.trim().to_uppercase();
        if !TARGET_AMINO_ACIDS.contains(&code.as_str()) {
            return Err(invalid(name, &format!("unknown target amino acid '{target}'")));
        }
        if !checked.contains(&code) {
            checked.push(code);
        }
    }
    Ok(checked)
}

/// Modification name to leading SDRF notation, as shipped in `unimod_dict.json.gz`.
#[derive(Debug, Clone, Default)]
pub struct UnimodCatalog {
    entries: IndexMap<String, String>,
}

impl UnimodCatalog {
    /// File stem of the catalog inside a vocabulary directory.
    pub const DATA_KEY: &'static str = "unimod_dict";

    pub fn new(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load `<dir>/unimod_dict.json.gz`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(format!("{}.json.gz", Self::DATA_KEY));
        let mut entries: IndexMap<String, String> = read_gzipped_json(&path)?;
        entries.sort_keys();
        tracing::info!(path = %path.display(), modifications = entries.len(), "loaded unimod catalog");
        Ok(Self { entries })
    }

    pub fn notation(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a parameter for a catalog entry.
    pub fn parameter(
        &self,
        name: &str,
        mod_type: ModificationType,
        position: ModificationPosition,
        targets: &[&str],
    ) -> Result<ModificationParameter> {
        let notation = self.notation(name).ok_or_else(|| SdrfError::InvalidChoice {
            column: MODIFICATION_COLUMN.to_string(),
            value: name.to_string(),
        })?;
        ModificationParameter::known(name, notation, mod_type, position, targets)
    }
}

/// Write one modification per column, as a constant over all rows.
///
/// The first goes to [`MODIFICATION_COLUMN`], the i-th to
/// `comment[modification parameters]_<i>` right after the previous one.
/// Returns the columns written, in order.
pub fn write_modifications(
    table: &mut WorkingTable,
    modifications: &[ModificationParameter],
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(modifications.len());
    let mut previous = MODIFICATION_COLUMN.to_string();
    for (i, modification) in modifications.iter().enumerate() {
        let column = if i == 0 {
            MODIFICATION_COLUMN.to_string()
        } else {
            let column = format!("{MODIFICATION_COLUMN}_{i}");
            table.insert_column_after(&previous, &column)?;
            column
        };
        table.set_constant(&column, &modification.sdrf_notation());
        previous = column.clone();
        written.push(column);
    }
    tracing::info!(columns = written.len(), "wrote modification parameters");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::write_gzipped_json;
    use tempfile::tempdir;

    fn oxidation() -> ModificationParameter {
        ModificationParameter::known(
            "Oxidation",
            "NT=Oxidation;AC=UNIMOD:35",
            ModificationType::Variable,
            ModificationPosition::Anywhere,
            &["M"],
        )
        .unwrap()
    }

    #[test]
    fn test_known_notation() {
        assert_eq!(
            oxidation().sdrf_notation(),
            "NT=Oxidation;AC=UNIMOD:35;MT=Variable;PP=Anywhere;TA=M"
        );
    }

    #[test]
    fn test_custom_notation() {
        let custom = ModificationParameter::custom(
            "My label",
            "C2H4",
            "28.03",
            ModificationType::Fixed,
            ModificationPosition::ProteinNTerm,
            &["k", "R", "K"],
        )
        .unwrap();
        assert_eq!(custom.targets(), ["K", "R"]);
        assert_eq!(
            custom.to_string(),
            "NT=My label;MT=Fixed;PP=Protein N-term;TA=K,R;CF=C2H4;MM=28.03"
        );
    }

    #[test]
    fn test_invalid_targets() {
        let none = ModificationParameter::known(
            "Oxidation",
            "NT=Oxidation",
            ModificationType::Variable,
            ModificationPosition::Anywhere,
            &[],
        );
        assert!(matches!(none, Err(SdrfError::InvalidModification { .. })));

        let bad = ModificationParameter::custom(
            "x",
            "C",
            "12",
            ModificationType::Fixed,
            ModificationPosition::Anywhere,
            &["B"],
        );
        assert!(matches!(bad, Err(SdrfError::InvalidModification { ref reason, .. }) if reason.contains("'B'")));
    }

    #[test]
    fn test_custom_rejects_separator() {
        let err = ModificationParameter::custom(
            "x",
            "C;H",
            "12",
            ModificationType::Fixed,
            ModificationPosition::Anywhere,
            &["C"],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_type_and_position() {
        assert_eq!("variable".parse::<ModificationType>().unwrap(), ModificationType::Variable);
        assert_eq!(
            "Any C-term".parse::<ModificationPosition>().unwrap(),
            ModificationPosition::AnyCTerm
        );
        assert!("sometimes".parse::<ModificationType>().is_err());
    }

    #[test]
    fn test_write_into_base_and_sibling_columns() {
        let mut table = WorkingTable::new([
            "source name",
            MODIFICATION_COLUMN,
            "comment[fragment mass tolerance]",
        ]);
        table.resize_rows(2);
        let carbamidomethyl = ModificationParameter::known(
            "Carbamidomethyl",
            "NT=Carbamidomethyl;AC=UNIMOD:4",
            ModificationType::Fixed,
            ModificationPosition::Anywhere,
            &["C"],
        )
        .unwrap();
        let custom = ModificationParameter::custom(
            "Tag",
            "C4H2",
            "50.01",
            ModificationType::Annotated,
            ModificationPosition::AnyNTerm,
            &["X"],
        )
        .unwrap();

        let written =
            write_modifications(&mut table, &[carbamidomethyl, oxidation(), custom]).unwrap();
        assert_eq!(
            written,
            vec![
                MODIFICATION_COLUMN.to_string(),
                format!("{MODIFICATION_COLUMN}_1"),
                format!("{MODIFICATION_COLUMN}_2"),
            ]
        );
        assert_eq!(
            table.headers(),
            [
                "source name",
                MODIFICATION_COLUMN,
                "comment[modification parameters]_1",
                "comment[modification parameters]_2",
                "comment[fragment mass tolerance]",
            ]
        );
        assert_eq!(
            table.cell(1, MODIFICATION_COLUMN),
            Some("NT=Carbamidomethyl;AC=UNIMOD:4;MT=Fixed;PP=Anywhere;TA=C")
        );
        assert_eq!(
            table.cell(0, "comment[modification parameters]_2"),
            Some("NT=Tag;MT=Annotated;PP=Any N-term;TA=X;CF=C4H2;MM=50.01")
        );
    }

    #[test]
    fn test_rewrite_reuses_sibling_columns() {
        let mut table = WorkingTable::new([MODIFICATION_COLUMN]);
        table.resize_rows(1);
        write_modifications(&mut table, &[oxidation(), oxidation()]).unwrap();
        write_modifications(&mut table, &[oxidation(), oxidation()]).unwrap();
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_catalog_load_and_lookup() {
        let dir = tempdir().unwrap();
        let mut entries = IndexMap::new();
        entries.insert("Phospho".to_string(), "NT=Phospho;AC=UNIMOD:21".to_string());
        entries.insert("Acetyl".to_string(), "NT=Acetyl;AC=UNIMOD:1".to_string());
        write_gzipped_json(dir.path().join("unimod_dict.json.gz"), &entries).unwrap();

        let catalog = UnimodCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Acetyl", "Phospho"]);

        let phospho = catalog
            .parameter(
                "Phospho",
                ModificationType::Variable,
                ModificationPosition::Anywhere,
                &["S", "T", "Y"],
            )
            .unwrap();
        assert_eq!(
            phospho.sdrf_notation(),
            "NT=Phospho;AC=UNIMOD:21;MT=Variable;PP=Anywhere;TA=S,T,Y"
        );
        assert!(
            catalog
                .parameter("Nope", ModificationType::Fixed, ModificationPosition::Anywhere, &["C"])
                .is_err()
        );
    }
}
