// Date and money formatting, plus decimal-safe arithmetic
pub mod computed;
pub mod date;
pub mod money;

pub use computed::{number_add, number_div, number_mul, number_sub, Amount};
pub use money::{parse_money, round_number, to_fixed_number, MoneyFormat};
