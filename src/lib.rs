pub mod ast;
pub mod calculator;
pub mod error;
pub mod plot;
pub mod symbols;

use ast::Evaluator;
use error::Result;
use symbols::SymbolTable;

/// One-shot evaluation against a copy of `symbols`; assignments are discarded.
pub fn evaluate_expression(expression: &str, symbols: &SymbolTable) -> Result<f64> {
    let mut evaluator = Evaluator::with_symbols(symbols.clone());
    evaluator.evaluate(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_expression_does_not_modify_symbols() {
        let symbols = SymbolTable::from_iter([("a", 2.0)]);
        assert_eq!(evaluate_expression("a = a * 10", &symbols).unwrap(), 20.0);
        assert_eq!(symbols.get("a"), Some(2.0));
    }
}
