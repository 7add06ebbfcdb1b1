use crate::DemoError;
use std::fmt;
use std::str::FromStr;

/// SPL tokens offered by the token send / approve actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplToken {
    Usdc,
    Tether,
    Bonk,
    Gogs,
}

impl SplToken {
    pub const ALL: [SplToken; 4] = [SplToken::Usdc, SplToken::Tether, SplToken::Bonk, SplToken::Gogs];

    pub fn symbol(self) -> &'static str {
        match self {
            SplToken::Usdc => "USDC",
            SplToken::Tether => "Tether",
            SplToken::Bonk => "Bonk",
            SplToken::Gogs => "GOGS",
        }
    }

    /// Base58 mint address
    pub fn mint(self) -> &'static str {
        match self {
            SplToken::Usdc => "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            SplToken::Tether => "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB",
            SplToken::Bonk => "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
            SplToken::Gogs => "HxptKywiNbHobJD4XMMBn1czMUGkdMrUkeUErQLKbonk",
        }
    }

    pub fn decimals(self) -> u8 {
        match self {
            SplToken::Bonk => 5,
            _ => 6,
        }
    }
}

impl FromStr for SplToken {
    type Err = DemoError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|token| token.symbol() == symbol)
            .ok_or_else(|| DemoError::failed(format!("Unknown token {}", symbol)))
    }
}

impl fmt::Display for SplToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Convert a decimal amount string (`"0.1"`, `"1000"`) to base units
///
/// Exact: the conversion is done on the digits, never through floating
/// point. Fails when the amount has more fractional digits than `decimals`,
/// does not fit in a `u64`, or is zero.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<u64, DemoError> {
    let invalid = || DemoError::failed(format!("Invalid token amount {:?}", amount));

    let (whole, fraction) = amount.trim().split_once('.').unwrap_or((amount.trim(), ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(DemoError::failed(format!(
            "{} has more than {} decimal places",
            amount, decimals
        )));
    }

    let digits = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    let digits = digits.trim_start_matches('0');
    let units = if digits.is_empty() {
        0
    } else {
        digits.parse::<u64>().map_err(|_| invalid())?
    };

    if units == 0 {
        return Err(DemoError::failed(
            "Calculated token amount is zero or less. Check decimals and amount.",
        ));
    }
    Ok(units)
}
