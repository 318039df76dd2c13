//! Display normalization for bill fields.

use chrono::{Datelike, NaiveDate};
use shared::domain::{BillStatus, BILL_DATE_FORMAT};
use thiserror::Error;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid bill date '{0}'")]
    InvalidDate(String),
    #[error("unknown bill status '{0}'")]
    UnknownStatus(String),
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(raw.trim(), BILL_DATE_FORMAT)
        .map_err(|_| FormatError::InvalidDate(raw.to_string()))
}

/// `2004-04-04` becomes `4 Avr. 04`.
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_date(raw)?;
    let month = MONTHS_FR[date.month0() as usize];
    Ok(format!(
        "{} {month}. {:02}",
        date.day(),
        date.year().rem_euclid(100)
    ))
}

pub fn format_status(raw: &str) -> Result<String, FormatError> {
    raw.trim()
        .parse::<BillStatus>()
        .map(|status| status.label().to_string())
        .map_err(|_| FormatError::UnknownStatus(raw.to_string()))
}
