use crate::ast::{is_function_prefix, is_plot_variable, ASTNode, Parser, PLOT_VARIABLE};
use crate::error::{Error, Result};
use crate::symbols::SymbolTable;
use log::{debug, trace};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(128) {
    Some(size) => size,
    None => unreachable!(),
};

/// Evaluates arithmetic expressions against a symbol table it owns.
///
/// Assignments (`a = 2 * b`) write into the table and are visible to every
/// later call on the same instance. A failed call never writes.
pub struct Evaluator {
    symbols: SymbolTable,
    cache: LruCache<String, Arc<ASTNode>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE)
    }
}

impl Evaluator {
    /// Creates a new `Evaluator` with a given maximum parse cache size.
    /// A size of zero falls back to the default.
    pub fn new(max_cache_size: usize) -> Self {
        Self::with_cache_size(NonZeroUsize::new(max_cache_size).unwrap_or(DEFAULT_CACHE_SIZE))
    }

    fn with_cache_size(max_cache_size: NonZeroUsize) -> Self {
        Self {
            symbols: SymbolTable::new(),
            cache: LruCache::new(max_cache_size),
        }
    }

    /// Starts from an existing set of variables.
    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Parse an expression string into an AST, reusing earlier parses of the same text.
    pub fn parse(&mut self, expression: &str) -> Result<Arc<ASTNode>> {
        let expression = expression.trim();
        if let Some(ast) = self.cache.get(expression) {
            trace!("Parse cache hit: {}", expression);
            return Ok(Arc::clone(ast));
        }

        let ast = Arc::new(Parser::parse_expression(expression)?);
        self.cache.put(expression.to_string(), Arc::clone(&ast));
        Ok(ast)
    }

    /// Evaluates one line of input.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` with the value, which may be infinite or NaN.
    /// * `Err(Error::Parse)` for malformed input.
    /// * `Err(Error::UndefinedVariable)` for a name that was never assigned.
    pub fn evaluate(&mut self, expression: &str) -> Result<f64> {
        let ast = self.parse(expression)?;
        self.evaluate_ast(&ast)
    }

    /// Evaluates `template` with every free `x` token bound to `x`.
    ///
    /// Substitution is token-aware: `max` or `xx` are different identifiers
    /// and keep resolving through the symbol table.
    pub fn evaluate_at(&mut self, template: &str, x: f64) -> Result<f64> {
        let ast = self.parse(template)?;
        if ast.assignment_target().is_some_and(is_plot_variable) {
            return Err(Error::InvertedFunction);
        }

        let bound = ast.bind_variable(PLOT_VARIABLE, x);
        self.evaluate_ast(&bound)
    }

    /// Evaluate an already parsed tree, applying a root assignment on success.
    pub fn evaluate_ast(&mut self, ast: &ASTNode) -> Result<f64> {
        match ast {
            ASTNode::Assignment { target, value } => {
                let result = evaluate_node(value, &self.symbols)?;
                if is_function_prefix(target) {
                    trace!("Stripped '{} =' prefix", target);
                } else {
                    debug!("Assigning {} = {}", target, result);
                    self.symbols.set(target, result);
                }
                Ok(result)
            }
            node => evaluate_node(node, &self.symbols),
        }
    }
}

/// Evaluates `ast` without touching `symbols`.
///
/// An `Assignment` node evaluates to its right-hand side; only
/// [`Evaluator::evaluate_ast`] performs the write.
pub fn evaluate_node(ast: &ASTNode, symbols: &SymbolTable) -> Result<f64> {
    match ast {
        ASTNode::Number(n) => Ok(*n),

        ASTNode::Identifier { name, position } => {
            symbols
                .get(name)
                .ok_or_else(|| Error::UndefinedVariable {
                    name: name.clone(),
                    position: *position,
                })
        }

        ASTNode::Negate(inner) => Ok(-evaluate_node(inner, symbols)?),

        ASTNode::Sequence { first, rest } => {
            let mut acc = evaluate_node(first, symbols)?;
            for (operator, node) in rest {
                acc = operator.apply(acc, evaluate_node(node, symbols)?);
            }
            Ok(acc)
        }

        ASTNode::BinaryOperation {
            left,
            operator,
            right,
        } => {
            let left_value = evaluate_node(left, symbols)?;
            let right_value = evaluate_node(right, symbols)?;
            Ok(operator.apply(left_value, right_value))
        }

        ASTNode::Group(inner) => evaluate_node(inner, symbols),

        ASTNode::Assignment { value, .. } => evaluate_node(value, symbols),
    }
}
