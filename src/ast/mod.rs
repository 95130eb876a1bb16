mod evaluator;
mod parser;

pub use evaluator::*;
pub use parser::{ExpressionParser as Parser, MAX_NESTING_DEPTH};

/// Name of the free variable bound by [`Evaluator::evaluate_at`].
pub const PLOT_VARIABLE: &str = "x";

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Identifier {
        name: String,
        position: usize,
    },
    Negate(Box<ASTNode>),
    /// `first op1 rest1 op2 rest2 ...` folded left to right; one node per
    /// `+ -` or `* /` chain keeps long inputs shallow.
    Sequence {
        first: Box<ASTNode>,
        rest: Vec<(Operator, ASTNode)>,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    Group(Box<ASTNode>),
    /// Only ever produced at the root of a parsed expression.
    Assignment {
        target: String,
        value: Box<ASTNode>,
    },
}

impl ASTNode {
    /// Returns a copy of the tree with every `name` identifier replaced by `value`.
    ///
    /// Works on whole tokens, so identifiers that merely contain `name`
    /// (e.g. `max` for `x`) are left alone. Assignment targets are not rewritten.
    pub fn bind_variable(&self, name: &str, value: f64) -> ASTNode {
        match self {
            ASTNode::Identifier { name: ident, .. } if ident == name => ASTNode::Number(value),
            ASTNode::Number(_) | ASTNode::Identifier { .. } => self.clone(),
            ASTNode::Negate(inner) => ASTNode::Negate(Box::new(inner.bind_variable(name, value))),
            ASTNode::Sequence { first, rest } => ASTNode::Sequence {
                first: Box::new(first.bind_variable(name, value)),
                rest: rest
                    .iter()
                    .map(|(operator, node)| (*operator, node.bind_variable(name, value)))
                    .collect(),
            },
            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => ASTNode::BinaryOperation {
                left: Box::new(left.bind_variable(name, value)),
                operator: *operator,
                right: Box::new(right.bind_variable(name, value)),
            },
            ASTNode::Group(inner) => ASTNode::Group(Box::new(inner.bind_variable(name, value))),
            ASTNode::Assignment { target, value: rhs } => ASTNode::Assignment {
                target: target.clone(),
                value: Box::new(rhs.bind_variable(name, value)),
            },
        }
    }

    /// Target of a root-level assignment, if this is one.
    pub fn assignment_target(&self) -> Option<&str> {
        match self {
            ASTNode::Assignment { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Builds a [`ASTNode::Sequence`], or returns `first` alone when there is nothing to fold.
pub fn sequence(first: ASTNode, rest: Vec<(Operator, ASTNode)>) -> ASTNode {
    if rest.is_empty() {
        first
    } else {
        ASTNode::Sequence {
            first: Box::new(first),
            rest,
        }
    }
}

/// `x = ...` assigns the plot variable itself, in either case.
pub fn is_plot_variable(target: &str) -> bool {
    target.eq_ignore_ascii_case(PLOT_VARIABLE)
}

/// `y = ...` is a function definition prefix rather than a write to `y`.
pub fn is_function_prefix(target: &str) -> bool {
    target.eq_ignore_ascii_case("y")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// IEEE-754 semantics throughout: `1/0` is `inf`, `0/0` is `NaN`.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, position: usize) -> ASTNode {
        ASTNode::Identifier {
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn test_bind_variable_replaces_whole_tokens_only() {
        // max + x
        let ast = ASTNode::BinaryOperation {
            left: Box::new(ident("max", 0)),
            operator: Operator::Add,
            right: Box::new(ident("x", 6)),
        };

        let bound = ast.bind_variable("x", 2.0);
        assert_eq!(
            bound,
            ASTNode::BinaryOperation {
                left: Box::new(ident("max", 0)),
                operator: Operator::Add,
                right: Box::new(ASTNode::Number(2.0)),
            }
        );
    }

    #[test]
    fn test_bind_variable_leaves_assignment_target() {
        let ast = ASTNode::Assignment {
            target: "x".to_string(),
            value: Box::new(ASTNode::Negate(Box::new(ident("x", 5)))),
        };

        let bound = ast.bind_variable("x", 3.0);
        assert_eq!(bound.assignment_target(), Some("x"));
        assert_eq!(
            bound,
            ASTNode::Assignment {
                target: "x".to_string(),
                value: Box::new(ASTNode::Negate(Box::new(ASTNode::Number(3.0)))),
            }
        );
    }

    #[test]
    fn test_bind_variable_inside_sequence() {
        let ast = sequence(
            ident("x", 0),
            vec![(Operator::Subtract, ident("x", 4)), (Operator::Add, ident("a", 8))],
        );

        assert_eq!(
            ast.bind_variable("x", 1.0),
            ASTNode::Sequence {
                first: Box::new(ASTNode::Number(1.0)),
                rest: vec![
                    (Operator::Subtract, ASTNode::Number(1.0)),
                    (Operator::Add, ident("a", 8)),
                ],
            }
        );
    }

    #[test]
    fn test_sequence_without_rest_is_the_operand() {
        assert_eq!(sequence(ASTNode::Number(2.0), vec![]), ASTNode::Number(2.0));
    }

    #[test]
    fn test_plot_variable_is_case_insensitive() {
        assert!(is_plot_variable("x"));
        assert!(is_plot_variable("X"));
        assert!(!is_plot_variable("xx"));
    }

    #[test]
    fn test_operator_apply_follows_ieee() {
        assert_eq!(Operator::Divide.apply(1.0, 0.0), f64::INFINITY);
        assert_eq!(Operator::Divide.apply(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(Operator::Divide.apply(0.0, 0.0).is_nan());
        assert_eq!(Operator::Power.apply(2.0, 10.0), 1024.0);
    }

    #[test]
    fn test_operator_try_from() {
        assert_eq!(Operator::try_from("^"), Ok(Operator::Power));
        assert!(Operator::try_from("%").is_err());
    }

    #[test]
    fn test_function_prefix_is_case_insensitive() {
        assert!(is_function_prefix("y"));
        assert!(is_function_prefix("Y"));
        assert!(!is_function_prefix("z"));
        assert!(!is_function_prefix("yy"));
    }
}
