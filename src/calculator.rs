use crate::ast::Evaluator;
use crate::error::{Error, Result};

/// Line-at-a-time calculator. Assignments persist for the life of the value.
#[derive(Default)]
pub struct Calculator {
    evaluator: Evaluator,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluate(&mut self, line: &str) -> Result<f64> {
        if line.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        self.evaluator.evaluate(line)
    }

    /// Evaluates `line` and renders the outcome the way it is shown to a user.
    pub fn submit(&mut self, line: &str) -> String {
        match self.evaluate(line) {
            Ok(value) => format_number(value),
            Err(Error::EmptyInput) => "Error: Input is empty!".to_string(),
            Err(e) => format!("Error: {}", e),
        }
    }
}

/// Invariant notation: shortest round-trip decimal, `.` as separator.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_formats_results() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.submit("2 + 3 * 4"), "14");
        assert_eq!(calculator.submit("1 / 4"), "0.25");
        assert_eq!(calculator.submit("1 / 0"), "Infinity");
        assert_eq!(calculator.submit("-1 / 0"), "-Infinity");
        assert_eq!(calculator.submit("0 / 0"), "NaN");
    }

    #[test]
    fn test_submit_keeps_assignments() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.submit("x = 5"), "5");
        assert_eq!(calculator.submit("y = x + 3"), "8");
        assert_eq!(calculator.evaluator().symbols().get("x"), Some(5.0));
    }

    #[test]
    fn test_submit_empty_input() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.submit("   "), "Error: Input is empty!");
        assert_eq!(calculator.evaluate(""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_submit_reports_error_message_verbatim() {
        let mut calculator = Calculator::new();
        let err = calculator.evaluate("z + 1").unwrap_err();
        assert_eq!(calculator.submit("z + 1"), format!("Error: {}", err));
        assert_eq!(
            calculator.submit("z + 1"),
            "Error: Undefined variable 'z' at position 0"
        );
    }

    #[test]
    fn test_submit_deeply_nested_input_gives_short_message() {
        let mut calculator = Calculator::new();
        let message = calculator.submit(&format!("{}1", "(".repeat(5000)));
        assert!(message.starts_with("Error: Parse error at position 64"), "{}", message);
        assert!(message.chars().count() < 160, "{}", message);
    }

    #[test]
    fn test_format_number_is_invariant() {
        assert_eq!(format_number(1234.5), "1234.5");
        assert_eq!(format_number(-0.125), "-0.125");
        assert_eq!(format_number(1e21), "1000000000000000000000");
    }
}
