pub mod expr;
pub mod literal;
pub mod parser;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod toplevel;
