//! Parsing of one tab-delimited registry line into a `DrugRecord`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use drug_indexer_shared::{DrugRecord, REGISTRY_FIELDS};

/// How empty tab-separated tokens are mapped onto fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMode {
    /// Column N always maps to field N; an empty column gives an empty field.
    #[default]
    Positional,
    /// Empty tokens are dropped before mapping, so later fields move left
    /// when an interior column is empty.
    Compact,
}

impl fmt::Display for ColumnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::Compact => f.write_str("compact"),
        }
    }
}

impl FromStr for ColumnMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown column mode '{}'", other)),
        }
    }
}

/// Reasons a registry line cannot become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line holds no data.
    #[error("blank line")]
    Blank,

    /// Fewer columns than registry fields.
    #[error("expected {expected} columns, found {found}", expected = REGISTRY_FIELDS.len())]
    MissingColumns { found: usize },

    /// The first column is not an integer.
    #[error("invalid drug id '{0}'")]
    InvalidId(String),
}

/// A registry line mapped onto the record fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryLine {
    /// First column exactly as it appears in the file.
    pub raw_id: String,
    /// The record, without pricing.
    pub record: DrugRecord,
    /// Whether empty columns were found among the mapped fields.
    pub has_empty_fields: bool,
}

/// Select the eight field values of a line according to the column mode.
fn select_columns(line: &str, mode: ColumnMode) -> (Vec<&str>, bool) {
    let field_count = REGISTRY_FIELDS.len();

    match mode {
        ColumnMode::Positional => {
            let columns: Vec<&str> = line.split('\t').take(field_count).collect();
            let has_empty = columns.iter().any(|c| c.is_empty());
            (columns, has_empty)
        }
        ColumnMode::Compact => {
            let mut columns = Vec::with_capacity(field_count);
            let mut has_empty = false;
            for token in line.split('\t') {
                if columns.len() == field_count {
                    break;
                }
                if token.is_empty() {
                    has_empty = true;
                } else {
                    columns.push(token);
                }
            }
            (columns, has_empty)
        }
    }
}

/// Parse one registry line.
///
/// The first eight columns map, in order, onto [`REGISTRY_FIELDS`]; extra
/// columns are ignored. Values are kept verbatim.
pub fn parse_registry_line(line: &str, mode: ColumnMode) -> Result<RegistryLine, LineError> {
    if line.trim().is_empty() {
        return Err(LineError::Blank);
    }

    let (columns, has_empty_fields) = select_columns(line, mode);
    if columns.len() < REGISTRY_FIELDS.len() {
        return Err(LineError::MissingColumns {
            found: columns.len(),
        });
    }

    let raw_id = columns[0];
    let drug_id = raw_id
        .trim()
        .parse::<i32>()
        .map_err(|_| LineError::InvalidId(raw_id.to_string()))?;

    let record = DrugRecord::new(
        drug_id, columns[1], columns[2], columns[3], columns[4], columns[5], columns[6],
        columns[7],
    );

    Ok(RegistryLine {
        raw_id: raw_id.to_string(),
        record,
        has_empty_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "60002283\tANASTROZOLE ACCORD 1 mg, comprimé pelliculé\tcomprimé pelliculé\torale\tAutorisation active\tProcédure nationale\tCommercialisée\t16/03/2011\t\t\tNon";

    #[test]
    fn test_parse_well_formed_line() {
        let parsed = parse_registry_line(LINE, ColumnMode::Positional).unwrap();
        let record = parsed.record;

        assert_eq!(parsed.raw_id, "60002283");
        assert_eq!(record.drug_id, 60002283);
        assert_eq!(record.drug_name, "ANASTROZOLE ACCORD 1 mg, comprimé pelliculé");
        assert_eq!(record.drug_type, "comprimé pelliculé");
        assert_eq!(record.drug_administration, "orale");
        assert_eq!(record.authorization_status, "Autorisation active");
        assert_eq!(record.authorization_type, "Procédure nationale");
        assert_eq!(record.commercial_status, "Commercialisée");
        assert_eq!(record.date_of_circulation, "16/03/2011");
        assert_eq!(record.price_with_honorary, 0.0);
        assert_eq!(record.repayment_rate, 0);
        assert!(!parsed.has_empty_fields);
    }

    #[test]
    fn test_both_modes_agree_on_full_lines() {
        let positional = parse_registry_line(LINE, ColumnMode::Positional).unwrap();
        let compact = parse_registry_line(LINE, ColumnMode::Compact).unwrap();
        assert_eq!(positional, compact);
    }

    #[test]
    fn test_empty_interior_field_positional() {
        let line = "61266250\tA 313 50 000 U.I., capsule molle\tcapsule molle\t\tAutorisation active\tProcédure nationale\tCommercialisée\t12/03/1998\textra";

        let parsed = parse_registry_line(line, ColumnMode::Positional).unwrap();

        assert!(parsed.has_empty_fields);
        assert_eq!(parsed.record.drug_administration, "");
        assert_eq!(parsed.record.authorization_status, "Autorisation active");
        assert_eq!(parsed.record.date_of_circulation, "12/03/1998");
    }

    #[test]
    fn test_empty_interior_field_compact_shifts() {
        let line = "61266250\tA 313 50 000 U.I., capsule molle\tcapsule molle\t\tAutorisation active\tProcédure nationale\tCommercialisée\t12/03/1998\textra";

        let parsed = parse_registry_line(line, ColumnMode::Compact).unwrap();

        assert!(parsed.has_empty_fields);
        assert_eq!(parsed.record.drug_administration, "Autorisation active");
        assert_eq!(parsed.record.commercial_status, "12/03/1998");
        assert_eq!(parsed.record.date_of_circulation, "extra");
    }

    #[test]
    fn test_trailing_empty_columns_are_not_flagged() {
        let parsed = parse_registry_line(LINE, ColumnMode::Compact).unwrap();
        assert!(!parsed.has_empty_fields);
    }

    #[test]
    fn test_missing_columns() {
        let result = parse_registry_line("60002283\tANASTROZOLE\tcomprimé", ColumnMode::Positional);
        assert_eq!(result, Err(LineError::MissingColumns { found: 3 }));
    }

    #[test]
    fn test_invalid_id() {
        let line = "CIS\tname\ttype\troute\tstatus\tprocedure\tcommercial\t01/01/2000";
        let result = parse_registry_line(line, ColumnMode::Positional);
        assert_eq!(result, Err(LineError::InvalidId("CIS".to_string())));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(
            parse_registry_line("   ", ColumnMode::Positional),
            Err(LineError::Blank)
        );
    }

    #[test]
    fn test_column_mode_from_str() {
        assert_eq!("compact".parse::<ColumnMode>(), Ok(ColumnMode::Compact));
        assert_eq!(" Positional ".parse::<ColumnMode>(), Ok(ColumnMode::Positional));
        assert!("zip".parse::<ColumnMode>().is_err());
        assert_eq!(ColumnMode::default(), ColumnMode::Positional);
    }
}
