//! Parsing of year and district selections from config values and CLI flags.
//!
//! Selections are comma-separated lists. An empty string is a valid, empty
//! selection: it matches no rows.

use std::collections::BTreeSet;

use crate::domain::district;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate value: {0}")]
    Duplicate(String),

    #[error("not a whole number: {0}")]
    NotANumber(String),

    #[error("unknown district: {0}")]
    UnknownDistrict(String),

    #[error("unknown property type: {0}")]
    UnknownPropertyType(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

fn tokens(input: &str) -> Result<Vec<&str>, SelectionError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|token| {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                Err(SelectionError::EmptyToken)
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}

pub fn parse_years(input: &str) -> Result<BTreeSet<i32>, SelectionError> {
    let mut years = BTreeSet::new();
    for token in tokens(input)? {
        let year: i32 = token
            .parse()
            .map_err(|_| SelectionError::NotANumber(token.to_string()))?;
        if !years.insert(year) {
            return Err(SelectionError::Duplicate(token.to_string()));
        }
    }
    Ok(years)
}

/// Districts may be given as numbers (`11`) or Roman numerals (`XI`).
pub fn parse_districts(input: &str) -> Result<BTreeSet<u32>, SelectionError> {
    let mut districts = BTreeSet::new();
    for token in tokens(input)? {
        let code = match token.parse::<u32>() {
            Ok(code) => code,
            Err(_) => district::from_roman(token)
                .ok_or_else(|| SelectionError::UnknownDistrict(token.to_string()))?,
        };
        if !district::is_known(code) {
            return Err(SelectionError::UnknownDistrict(token.to_string()));
        }
        if !districts.insert(code) {
            return Err(SelectionError::Duplicate(token.to_string()));
        }
    }
    Ok(districts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_years_basic() {
        let years = parse_years("2021,2022,2023").unwrap();
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2021, 2022, 2023]);
    }

    #[test]
    fn parse_years_with_whitespace() {
        let years = parse_years("  2023 , 2021 ").unwrap();
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2021, 2023]);
    }

    #[test]
    fn parse_years_empty_input_is_empty_selection() {
        assert!(parse_years("").unwrap().is_empty());
        assert!(parse_years("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_years_empty_token() {
        assert_eq!(parse_years("2021,,2022"), Err(SelectionError::EmptyToken));
    }

    #[test]
    fn parse_years_duplicate() {
        assert!(matches!(
            parse_years("2021,2022,2021"),
            Err(SelectionError::Duplicate(s)) if s == "2021"
        ));
    }

    #[test]
    fn parse_years_not_a_number() {
        assert!(matches!(
            parse_years("2021,next"),
            Err(SelectionError::NotANumber(s)) if s == "next"
        ));
    }

    #[test]
    fn parse_districts_accepts_numbers_and_roman() {
        let districts = parse_districts("1, XI ,xiii").unwrap();
        assert_eq!(districts.into_iter().collect::<Vec<_>>(), vec![1, 11, 13]);
    }

    #[test]
    fn parse_districts_rejects_out_of_range() {
        assert!(matches!(
            parse_districts("5,24"),
            Err(SelectionError::UnknownDistrict(s)) if s == "24"
        ));
        assert!(parse_districts("0").is_err());
    }

    #[test]
    fn parse_districts_duplicate_across_notations() {
        assert!(matches!(
            parse_districts("2,II"),
            Err(SelectionError::Duplicate(s)) if s == "II"
        ));
    }
}
