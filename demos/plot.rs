use graphcalc_rs::ast::Evaluator;
use graphcalc_rs::plot::{FunctionPlotter, PlotRange};
use log::info;
use std::process::ExitCode;

const USAGE: &str = "usage: plot <function> <x_min> <x_max> <y_min> <y_max>";

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [function, x_min, x_max, y_min, y_max] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let range = match PlotRange::parse(x_min, x_max, y_min, y_max) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let evaluator = Evaluator::default();
    match FunctionPlotter::default().plot(&evaluator, function, &range) {
        Ok(points) => {
            info!("Plotted {} points", points.len());
            println!("x,y");
            for point in points {
                println!("{},{}", point.x, point.y);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error plotting function: {}", e);
            ExitCode::FAILURE
        }
    }
}
