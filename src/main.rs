//! Command-line form host: reads one submission as JSON and prints the verdict.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use serde::Serialize;

use obesity_risk::{
    assessment::assess_with_model,
    config,
    encoding::{FeatureEncoder, RawSelection, form_options},
    logging::{self, LogOptions},
    model_store::{self, ModelSource},
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    input: Option<PathBuf>,
    model_path: Option<PathBuf>,
    json: bool,
    list_options: bool,
    verbose: bool,
    write_log_file: bool,
    help: bool,
}

#[derive(Serialize)]
struct FieldOptions {
    field: &'static str,
    options: Vec<&'static str>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if options.help {
        println!("{}", help_text());
        return Ok(());
    }

    let log_options = LogOptions {
        default_filter: if options.verbose { "debug" } else { "info" },
        write_file: options.write_log_file,
    };
    if let Err(err) = logging::init(log_options) {
        eprintln!("Logging disabled: {err}");
    }

    if options.list_options {
        return print_form_options(options.json);
    }

    let mut settings = config::load_or_default().map_err(|err| err.to_string())?;
    if let Some(path) = options.model_path.clone() {
        settings.model_path = Some(path);
    }
    let source = ModelSource::from_settings(&settings).map_err(|err| err.to_string())?;
    let classifier = model_store::shared().get_or_load(|| model_store::load_checked(&source));

    let raw = read_selection(options.input.as_ref())?;
    let encoder = FeatureEncoder::new(settings.bmi_policy);
    let assessment =
        assess_with_model(&encoder, classifier, &raw).map_err(|err| err.to_string())?;

    if options.json {
        let text = serde_json::to_string_pretty(&assessment).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        println!("{}", assessment.verdict);
    }
    Ok(())
}

fn read_selection(input: Option<&PathBuf>) -> Result<RawSelection, String> {
    let reader: Box<dyn Read> = match input {
        Some(path) if path.as_os_str() != "-" => Box::new(
            File::open(path).map_err(|err| format!("Failed to open {}: {err}", path.display()))?,
        ),
        _ => Box::new(io::stdin().lock()),
    };
    serde_json::from_reader(BufReader::new(reader))
        .map_err(|err| format!("Invalid submission JSON: {err}"))
}

fn print_form_options(json: bool) -> Result<(), String> {
    let fields: Vec<FieldOptions> = form_options()
        .into_iter()
        .map(|(field, options)| FieldOptions { field, options })
        .collect();
    if json {
        let text = serde_json::to_string_pretty(&fields).map_err(|err| err.to_string())?;
        println!("{text}");
        return Ok(());
    }
    for field in fields {
        println!("{}: {}", field.field, field.options.join(" | "));
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        write_log_file: true,
        ..CliOptions::default()
    };

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => options.help = true,
            "--input" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--input requires a value".to_string())?;
                options.input = Some(PathBuf::from(value));
            }
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                options.model_path = Some(PathBuf::from(value));
            }
            "--json" => options.json = true,
            "--options" => options.list_options = true,
            "--verbose" => options.verbose = true,
            "--no-log-file" => options.write_log_file = false,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "obesity-risk",
        "",
        "Usage:",
        "  obesity-risk [--input <submission.json|->] [options]",
        "  obesity-risk --options [--json]",
        "",
        "Options:",
        "  --input <path>   Submission JSON (default: stdin).",
        "  --model <path>   Classifier artifact to use instead of the configured one.",
        "  --json           Print the encoded record, probabilities and verdict as JSON.",
        "  --options        List the accepted answers for every form field.",
        "  --verbose        Debug-level logging (RUST_LOG still wins).",
        "  --no-log-file    Log to stderr only.",
    ]
    .join("\n")
}
