use std::io::Read;

use iit_core::{BracketTable, BracketTableError, TaxBracket, TaxPolicy};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown bracket table '{0}' (expected 'comprehensive' or 'annual_bonus')")]
    UnknownTable(String),

    #[error("Invalid {table} table: {source}")]
    InvalidTable {
        table: BracketTableKind,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// Which of the two progressive tables a CSV row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketTableKind {
    /// Annual comprehensive (salary) income.
    Comprehensive,
    /// Annual one-time bonus, keyed by the monthly average.
    AnnualBonus,
}

impl BracketTableKind {
    fn from_code(code: &str) -> Result<Self, BracketLoaderError> {
        match code {
            "comprehensive" => Ok(Self::Comprehensive),
            "annual_bonus" => Ok(Self::AnnualBonus),
            _ => Err(BracketLoaderError::UnknownTable(code.to_string())),
        }
    }
}

impl std::fmt::Display for BracketTableKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Comprehensive => write!(f, "comprehensive"),
            Self::AnnualBonus => write!(f, "annual_bonus"),
        }
    }
}

/// A single record from the brackets CSV file.
///
/// - `table`: `comprehensive` or `annual_bonus`
/// - `upper_bound`: inclusive upper bound (empty for the unbounded top bracket)
/// - `rate`: marginal rate as a decimal (e.g., 0.10 for 10%)
/// - `quick_deduction`: amount subtracted after applying the rate
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub table: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive bracket tables from CSV files.
///
/// Rows keep their file order within each table. A table absent from the file
/// falls back to the built-in 2019 schedule when building a policy.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            BracketTableKind::from_code(&record.table)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a validated [`TaxPolicy`] from parsed records.
    ///
    /// The standard deduction and social insurance rates keep their defaults.
    pub fn into_policy(records: &[BracketRecord]) -> Result<TaxPolicy, BracketLoaderError> {
        let defaults = TaxPolicy::default();

        let salary_brackets = Self::table(records, BracketTableKind::Comprehensive)?
            .unwrap_or(defaults.salary_brackets);
        let bonus_brackets = Self::table(records, BracketTableKind::AnnualBonus)?
            .unwrap_or(defaults.bonus_brackets);

        Ok(TaxPolicy {
            salary_brackets,
            bonus_brackets,
            ..defaults
        })
    }

    /// Parse and build in one step.
    pub fn load_policy<R: Read>(reader: R) -> Result<TaxPolicy, BracketLoaderError> {
        let records = Self::parse(reader)?;
        let policy = Self::into_policy(&records)?;
        tracing::info!(records = records.len(), "loaded bracket tables");
        Ok(policy)
    }

    fn table(
        records: &[BracketRecord],
        kind: BracketTableKind,
    ) -> Result<Option<BracketTable>, BracketLoaderError> {
        let mut brackets = Vec::new();
        for record in records {
            if BracketTableKind::from_code(&record.table)? == kind {
                brackets.push(TaxBracket {
                    upper_bound: record.upper_bound,
                    rate: record.rate,
                    quick_deduction: record.quick_deduction,
                });
            }
        }

        if brackets.is_empty() {
            tracing::debug!(table = %kind, "no rows for table, using built-in schedule");
            return Ok(None);
        }

        BracketTable::new(brackets)
            .map(Some)
            .map_err(|source| BracketLoaderError::InvalidTable {
                table: kind,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"table,upper_bound,rate,quick_deduction
comprehensive,36000,0.03,0
comprehensive,144000,0.10,2520
comprehensive,300000,0.20,16920
comprehensive,420000,0.25,31920
comprehensive,660000,0.30,52920
comprehensive,960000,0.35,85920
comprehensive,,0.45,181920
annual_bonus,3000,0.03,0
annual_bonus,12000,0.10,210
annual_bonus,25000,0.20,1410
annual_bonus,35000,0.25,2660
annual_bonus,55000,0.30,4410
annual_bonus,80000,0.35,7160
annual_bonus,,0.45,15160
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "table,upper_bound,rate,quick_deduction\ncomprehensive,36000,0.03,0";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                table: "comprehensive".to_string(),
                upper_bound: Some(dec!(36000)),
                rate: dec!(0.03),
                quick_deduction: dec!(0),
            }]
        );
    }

    #[test]
    fn test_parse_csv_unbounded_top_bracket() {
        let csv = "table,upper_bound,rate,quick_deduction\nannual_bonus,,0.45,15160";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].quick_deduction, dec!(15160));
    }

    #[test]
    fn test_parse_full_file_matches_builtin_schedules() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
        let policy = BracketLoader::into_policy(&records).expect("Failed to build policy");

        assert_eq!(records.len(), 14);
        assert_eq!(policy, TaxPolicy::default());
    }

    #[test]
    fn test_missing_table_falls_back_to_builtin() {
        let csv = "table,upper_bound,rate,quick_deduction\n\
                   annual_bonus,5000,0.05,0\n\
                   annual_bonus,,0.20,750\n";

        let policy = BracketLoader::load_policy(csv.as_bytes()).expect("Failed to load policy");

        assert_eq!(policy.salary_brackets, BracketTable::comprehensive_2019());
        assert_eq!(policy.bonus_brackets.brackets().len(), 2);
        assert_eq!(policy.bonus_brackets.find(dec!(6000)).rate, dec!(0.20));
        assert_eq!(policy.standard_deduction, dec!(60000));
    }

    #[test]
    fn test_parse_unknown_table() {
        let csv = "table,upper_bound,rate,quick_deduction\nmonthly,3000,0.03,0";

        let result = BracketLoader::parse(csv.as_bytes());

        match result {
            Err(BracketLoaderError::UnknownTable(ref table)) => assert_eq!(table, "monthly"),
            other => panic!("expected UnknownTable, got {other:?}"),
        }
    }

    #[test]
    fn test_into_policy_rejects_out_of_order_bounds() {
        let csv = "table,upper_bound,rate,quick_deduction\n\
                   comprehensive,144000,0.10,2520\n\
                   comprehensive,36000,0.03,0\n\
                   comprehensive,,0.45,181920\n";
        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let err = BracketLoader::into_policy(&records).expect_err("Should reject table");

        let BracketLoaderError::InvalidTable { table, source } = err else {
            panic!("Expected InvalidTable error, got: {:?}", err);
        };
        assert_eq!(table, BracketTableKind::Comprehensive);
        assert_eq!(
            source,
            BracketTableError::NonIncreasingBound {
                index: 1,
                bound: dec!(36000)
            }
        );
    }

    #[test]
    fn test_into_policy_rejects_missing_unbounded_bracket() {
        let csv = "table,upper_bound,rate,quick_deduction\nannual_bonus,3000,0.03,0\n";
        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let result = BracketLoader::into_policy(&records);

        assert!(matches!(
            result,
            Err(BracketLoaderError::InvalidTable {
                table: BracketTableKind::AnnualBonus,
                source: BracketTableError::MissingUnboundedBracket,
            })
        ));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "table,upper_bound\ncomprehensive,36000";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "table,upper_bound,rate,quick_deduction\ncomprehensive,abc,0.03,0";

        let result = BracketLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "table,upper_bound,rate,quick_deduction\n";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let policy = BracketLoader::into_policy(&records).expect("Failed to build policy");

        assert!(records.is_empty());
        assert_eq!(policy, TaxPolicy::default());
    }
}
