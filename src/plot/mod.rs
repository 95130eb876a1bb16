mod range;

pub use range::PlotRange;

use crate::ast::{
    evaluate_node, is_function_prefix, is_plot_variable, ASTNode, Evaluator, Parser, PLOT_VARIABLE,
};
use crate::error::{Error, Result};
use log::{debug, trace};
use rayon::prelude::*;
use std::num::NonZeroUsize;

/// Number of subdivisions of `[x_min, x_max]` used when none is configured.
pub const DEFAULT_STEPS: usize = 2000;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlotConfig {
    /// The range is sampled at `steps + 1` points, both ends included.
    pub steps: NonZeroUsize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            steps: NonZeroUsize::new(DEFAULT_STEPS).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl PlotConfig {
    pub fn with_steps(steps: NonZeroUsize) -> Self {
        Self { steps }
    }
}

/// The right-hand side of `y = f(x)`, parsed once and bound per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTemplate {
    body: ASTNode,
}

impl FunctionTemplate {
    /// Accepts `f(x)` or `y = f(x)`. Rejects `x = f(y)` and assignments to any other name.
    pub fn prepare(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }

        let body = match Parser::parse_expression(input)? {
            ASTNode::Assignment { target, .. } if is_plot_variable(&target) => {
                return Err(Error::InvertedFunction)
            }
            ASTNode::Assignment { target, value } if is_function_prefix(&target) => *value,
            ASTNode::Assignment { target, .. } => {
                return Err(Error::UnsupportedAssignment { target })
            }
            body => body,
        };

        Ok(Self { body })
    }

    pub fn body(&self) -> &ASTNode {
        &self.body
    }
}

/// Samples a function template across a [`PlotRange`].
#[derive(Debug, Default, Clone)]
pub struct FunctionPlotter {
    config: PlotConfig,
}

impl FunctionPlotter {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Prepares `function` and samples it. Variables other than `x` resolve
    /// through `evaluator`'s symbol table, which is only read.
    pub fn plot(
        &self,
        evaluator: &Evaluator,
        function: &str,
        range: &PlotRange,
    ) -> Result<Vec<Point>> {
        let template = FunctionTemplate::prepare(function)?;
        Ok(self.sample(evaluator, &template, range))
    }

    /// Points whose evaluation fails, is not finite, or falls outside
    /// `[y_min, y_max]` are skipped. The result is sorted by `x`.
    pub fn sample(
        &self,
        evaluator: &Evaluator,
        template: &FunctionTemplate,
        range: &PlotRange,
    ) -> Vec<Point> {
        let steps = self.config.steps.get();
        let symbols = evaluator.symbols();
        debug!(
            "Sampling {} points over [{}, {}]",
            steps + 1,
            range.x_min(),
            range.x_max()
        );

        let mut points: Vec<Point> = (0..=steps)
            .into_par_iter()
            .filter_map(|i| {
                let x = range.x_at(i, steps);
                let bound = template.body().bind_variable(PLOT_VARIABLE, x);
                match evaluate_node(&bound, symbols) {
                    Ok(y) if y.is_finite() && range.contains_y(y) => Some(Point { x, y }),
                    Ok(y) => {
                        trace!("Discarding x={}: y={} is not visible", x, y);
                        None
                    }
                    Err(e) => {
                        debug!("Error at x={}: {}", x, e);
                        None
                    }
                }
            })
            .collect();

        points.par_sort_by(|a, b| a.x.total_cmp(&b.x));
        debug!("Kept {} of {} points", points.len(), steps + 1);
        points
    }
}
