//! National ID ("cédula") value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use casework_core::ValueObject;

pub const MIN_DIGITS: usize = 8;
pub const MAX_DIGITS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CedulaError {
    #[error("cédula must have at least {MIN_DIGITS} digits")]
    TooShort { digits: usize },

    #[error("cédula must not have more than {MAX_DIGITS} digits")]
    TooLong { digits: usize },
}

/// A cédula normalized to its digits only (`"V-123.456.78"` becomes `"12345678"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cedula(String);

impl ValueObject for Cedula {}

impl Cedula {
    /// Strip every non-digit character and check the digit count.
    pub fn parse(raw: &str) -> Result<Self, CedulaError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let count = digits.len();

        if count < MIN_DIGITS {
            return Err(CedulaError::TooShort { digits: count });
        }
        if count > MAX_DIGITS {
            return Err(CedulaError::TooLong { digits: count });
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Cedula {
    type Error = CedulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cedula::parse(&value)
    }
}

impl From<Cedula> for String {
    fn from(value: Cedula) -> Self {
        value.0
    }
}

impl core::fmt::Display for Cedula {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
