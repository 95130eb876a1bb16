use graphcalc_rs::calculator::Calculator;
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    pretty_env_logger::init();

    let mut calculator = Calculator::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        writeln!(stdout, "{}", calculator.submit(&line))?;
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    Ok(())
}
