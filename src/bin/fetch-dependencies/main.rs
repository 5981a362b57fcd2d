use std::process::ExitCode;

use fetch_dependencies::{Event, Fetcher, PlannedDependency, System};

use crate::args::{OutputFormat, ValidatedCommand};
use crate::error::AppError;

mod args;
mod error;
mod progress;

#[derive(serde::Serialize)]
struct PlanDocument<'a> {
    dependency: &'a [PlannedDependency],
}

fn list(plan: &[PlannedDependency], format: Option<OutputFormat>) -> Result<(), AppError> {
    match format {
        Some(OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(plan)?),
        Some(OutputFormat::Toml) => {
            print!("{}", toml::to_string(&PlanDocument { dependency: plan })?)
        }
        None => {
            for item in plan {
                let status = if item.present {
                    "already satisfied"
                } else {
                    "missing"
                };
                println!(
                    "{}: {} -> {} ({status})",
                    item.name,
                    item.url,
                    item.path.display()
                );
            }
        }
    }
    Ok(())
}

fn run() -> Result<(), AppError> {
    match args::parse()? {
        ValidatedCommand::Fetch {
            dependencies,
            context,
        } => {
            let mut progress = progress::Progress::new();
            let result = Fetcher::new(System, |event: &Event<'_>| progress.report(event))
                .fetch(&dependencies, &context);
            result?;
            progress.summary();
            Ok(())
        }
        ValidatedCommand::List {
            dependencies,
            context,
            format,
        } => list(&context.plan(&dependencies), format),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::report(&err);
            err.into()
        }
    }
}
