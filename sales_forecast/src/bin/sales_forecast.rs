use sales_forecast::{logging, run_forecast, DataLoader, ForecastConfig, ForecastReport};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: sales_forecast <rows.csv|rows.json> [product name] [config.json] [--json]";

fn run(args: &[String]) -> sales_forecast::Result<String> {
    let json_output = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let input = positional.first().ok_or_else(|| {
        sales_forecast::ForecastError::InvalidParameter(USAGE.to_string())
    })?;
    let product = positional.get(1).map(|s| s.as_str()).unwrap_or("");
    let config = match positional.get(2) {
        Some(path) => ForecastConfig::from_json_file(path)?,
        None => ForecastConfig::default(),
    };

    let entries = DataLoader::from_path(input)?;
    let result = run_forecast(&entries, product, &config)?;
    let report = ForecastReport::new(&result, product);

    if json_output {
        return report.to_json();
    }

    let mut out = String::new();
    for notice in &report.notices {
        out.push_str(&format!("note: {}\n", notice));
    }
    out.push_str(&report.to_string());
    if report.used_fallback {
        out.push_str("\n(the seasonal fit repeated the last month, so a trend re-fit was used)");
    }
    Ok(out)
}

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", err.kind(), err);
            ExitCode::FAILURE
        }
    }
}
