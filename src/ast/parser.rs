use crate::ast::{sequence, ASTNode, Operator};
use crate::error::{Error, Result};
use log::debug;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

/// Deepest allowed combination of open groups and pending `^` operands.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Parser)]
#[grammar = "./expression.pest"]
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parses one line. Positions in the resulting tree and in errors are
    /// byte offsets into `input` as given.
    pub fn parse_expression(input: &str) -> Result<ASTNode> {
        debug!("Parsing expression: {}", input);
        check_nesting(input)?;
        let parse_result = ExpressionParser::parse(Rule::expression, input)
            .map_err(|e| syntax_error(input, e))?
            .next()
            .ok_or_else(|| Error::parse("Failed to parse expression", input, 0))?;

        debug!("Parse result: {:#?}", parse_result);
        let mut pairs = parse_result.into_inner();
        let statement = next_pair(&mut pairs, input)?;
        match statement.as_rule() {
            Rule::assignment => Self::build_assignment(statement, input),
            Rule::arithmetic_expression => Self::build_arithmetic_expression(statement, input),
            _ => Err(unexpected(&statement, input)),
        }
    }

    fn build_assignment(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let target = next_pair(&mut pairs, input)?.as_str().to_string();
        // ASSIGN
        next_pair(&mut pairs, input)?;
        let value = Self::build_arithmetic_expression(next_pair(&mut pairs, input)?, input)?;
        debug!("Assignment to '{}': {:?}", target, value);

        Ok(ASTNode::Assignment {
            target,
            value: Box::new(value),
        })
    }

    fn build_arithmetic_expression(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        debug!("Building arithmetic expression: {:?}", pair.as_str());
        let mut pairs = pair.into_inner();
        let first = Self::build_term(next_pair(&mut pairs, input)?, input)?;
        let mut rest = Vec::new();

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::PLUS | Rule::MINUS => binary_operator(&operator_pair, input)?,
                _ => return Err(unexpected(&operator_pair, input)),
            };

            let right = Self::build_term(next_pair(&mut pairs, input)?, input)?;
            rest.push((operator, right));
        }

        Ok(sequence(first, rest))
    }

    fn build_term(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let first = Self::build_unary(next_pair(&mut pairs, input)?, input)?;
        let mut rest = Vec::new();

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::STAR | Rule::SLASH => binary_operator(&operator_pair, input)?,
                _ => return Err(unexpected(&operator_pair, input)),
            };

            let right = Self::build_unary(next_pair(&mut pairs, input)?, input)?;
            rest.push((operator, right));
        }

        Ok(sequence(first, rest))
    }

    /// A run of minus signs reduces to its parity: `--a` is `a`, `---a` is `-a`.
    fn build_unary(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let mut negate = false;

        while pairs.peek().map(|p| p.as_rule()) == Some(Rule::MINUS) {
            pairs.next();
            negate = !negate;
        }

        let node = Self::build_power(next_pair(&mut pairs, input)?, input)?;
        if negate {
            Ok(ASTNode::Negate(Box::new(node)))
        } else {
            Ok(node)
        }
    }

    fn build_power(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let base = Self::build_primary_expression(next_pair(&mut pairs, input)?, input)?;

        let Some(operator_pair) = pairs.next() else {
            return Ok(base);
        };
        if operator_pair.as_rule() != Rule::CARET {
            return Err(unexpected(&operator_pair, input));
        }

        let exponent = Self::build_unary(next_pair(&mut pairs, input)?, input)?;
        Ok(ASTNode::BinaryOperation {
            left: Box::new(base),
            operator: Operator::Power,
            right: Box::new(exponent),
        })
    }

    fn build_primary_expression(pair: Pair<Rule>, input: &str) -> Result<ASTNode> {
        debug!("Building primary expression: {:?}", pair.as_str());
        match pair.as_rule() {
            Rule::number => {
                let value = pair.as_str().parse::<f64>().map_err(|_| {
                    Error::parse("Invalid number literal", input, pair.as_span().start())
                })?;
                Ok(ASTNode::Number(value))
            }
            Rule::identifier => Ok(ASTNode::Identifier {
                name: pair.as_str().to_string(),
                position: pair.as_span().start(),
            }),
            Rule::group => {
                let inner = next_pair(&mut pair.into_inner(), input)?;
                Ok(ASTNode::Group(Box::new(Self::build_arithmetic_expression(
                    inner, input,
                )?)))
            }
            _ => Err(unexpected(&pair, input)),
        }
    }
}

/// Rejects input whose groups and `^` chains would nest deeper than
/// [`MAX_NESTING_DEPTH`], before any recursive descent happens.
fn check_nesting(input: &str) -> Result<()> {
    // Pending `^` count per open group; the bottom entry is the top level.
    let mut chains: Vec<usize> = vec![0];
    let mut depth = 0;
    let mut previous = None;

    for (position, c) in input.char_indices() {
        match c {
            '(' => {
                chains.push(0);
                depth += 1;
            }
            ')' => {
                if chains.len() > 1 {
                    depth -= chains.pop().unwrap_or(0) + 1;
                }
            }
            '^' => {
                if let Some(chain) = chains.last_mut() {
                    *chain += 1;
                }
                depth += 1;
            }
            '+' | '*' | '/' => depth -= end_chain(&mut chains),
            '-' if previous.is_some_and(ends_operand) => depth -= end_chain(&mut chains),
            _ => {}
        }

        if depth > MAX_NESTING_DEPTH {
            return Err(Error::parse(
                format!("Expression nested too deeply (limit {})", MAX_NESTING_DEPTH),
                input,
                position,
            ));
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }

    Ok(())
}

fn end_chain(chains: &mut [usize]) -> usize {
    chains.last_mut().map(std::mem::take).unwrap_or(0)
}

/// Whether a `-` following `c` is binary subtraction rather than negation.
fn ends_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == ')'
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, input: &str) -> Result<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| Error::parse("Missing operand", input, input.len()))
}

fn binary_operator(pair: &Pair<Rule>, input: &str) -> Result<Operator> {
    Operator::try_from(pair.as_str())
        .map_err(|message| Error::parse(message, input, pair.as_span().start()))
}

fn unexpected(pair: &Pair<Rule>, input: &str) -> Error {
    Error::parse(
        format!("Unexpected {:?}", pair.as_rule()),
        input,
        pair.as_span().start(),
    )
}

fn syntax_error(input: &str, error: pest::error::Error<Rule>) -> Error {
    let position = match &error.location {
        InputLocation::Pos(pos) => *pos,
        InputLocation::Span((start, _)) => *start,
    };
    let error = error.renamed_rules(token_name);
    Error::parse(error.variant.message(), input, position)
}

fn token_name(rule: &Rule) -> String {
    match rule {
        Rule::number => "number".to_string(),
        Rule::identifier => "identifier".to_string(),
        Rule::group => "'('".to_string(),
        Rule::ASSIGN => "'='".to_string(),
        Rule::PLUS => "'+'".to_string(),
        Rule::MINUS => "'-'".to_string(),
        Rule::STAR => "'*'".to_string(),
        Rule::SLASH => "'/'".to_string(),
        Rule::CARET => "'^'".to_string(),
        Rule::EOI => "end of input".to_string(),
        other => format!("{:?}", other),
    }
}
