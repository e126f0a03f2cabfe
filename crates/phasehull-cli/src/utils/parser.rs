use phasehull::core::models::composition::{Composition, CompositionError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Composition list is empty. Expected 'Element=amount' pairs (e.g., 'Al=1,Ni=3').")]
    Empty,

    #[error("Invalid composition term '{0}'. Expected 'Element=amount' (e.g., 'Al=1').")]
    InvalidTerm(String),

    #[error("Invalid amount '{amount}' for element '{element}'.")]
    InvalidAmount { element: String, amount: String },

    #[error(transparent)]
    Composition(#[from] CompositionError),
}

/// Parses a comma-separated `Element=amount` list such as `Al=1, Ni=3`.
///
/// Repeated elements accumulate.
pub fn parse_composition(input: &str) -> Result<Composition, ParseError> {
    let terms: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut pairs = Vec::with_capacity(terms.len());
    for term in terms {
        let Some((element, amount)) = term.split_once('=') else {
            return Err(ParseError::InvalidTerm(term.to_string()));
        };
        let element = element.trim();
        if element.is_empty() || !element.chars().all(char::is_alphanumeric) {
            return Err(ParseError::InvalidTerm(term.to_string()));
        }
        let amount = amount.trim();
        let value: f64 = amount.parse().map_err(|_| ParseError::InvalidAmount {
            element: element.to_string(),
            amount: amount.to_string(),
        })?;
        pairs.push((element.to_string(), value));
    }
    Ok(Composition::new(pairs)?)
}
