//! Currencies known to the exposure engine.
//!
//! Results are reported in one base currency; a CSA may be denominated in
//! another. The spot converting CSA amounts to base is named by
//! [`Currency::fx_pair`], e.g. `"EURUSD"` for base-currency units per EUR.
//!
//! ```
//! use xva_core::types::currency::Currency;
//!
//! let csa: Currency = "eur".parse().unwrap();
//! assert_eq!(csa.fx_pair(Currency::USD), "EURUSD");
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// ISO 4217 currency.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    AUD,
    CAD,
    SEK,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::AUD,
        Currency::CAD,
        Currency::SEK,
    ];

    /// Three-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SEK => "SEK",
        }
    }

    /// Spot name for the price of one `self` in `quote`: `self.code() + quote.code()`.
    pub fn fx_pair(&self, quote: Currency) -> String {
        [self.code(), quote.code()].concat()
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|ccy| ccy.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
