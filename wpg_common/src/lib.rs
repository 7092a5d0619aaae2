mod helpers;
mod rupees;

pub use helpers::parse_boolean_flag;
pub use rupees::{Rupees, RupeesConversionError, PKR_CURRENCY_CODE, PKR_CURRENCY_CODE_LOWER};
