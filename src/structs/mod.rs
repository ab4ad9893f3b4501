pub mod cli;
pub mod category;
pub mod category_set;
pub mod calc;
