//! Text formatting for admin tables: lenient number parsing and currency
//! rendering.

mod money;
mod number;

pub use money::MoneyFormatter;
pub use number::parse_float;
