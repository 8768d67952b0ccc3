use std::path::PathBuf;

use obesity_risk::{
    app_dirs, config,
    classifier::LinearRiskModel,
    logging::{self, LogOptions},
    model_store::{ModelSource, fetch_to_path},
};

#[derive(Debug, Default)]
struct SetupOptions {
    url: Option<String>,
    sha256: Option<String>,
    models_dir: Option<PathBuf>,
    force: bool,
}

fn main() {
    let mut options = SetupOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--url" => {
                if let Some(value) = args.next() {
                    options.url = Some(value);
                }
            }
            "--sha256" => {
                if let Some(value) = args.next() {
                    options.sha256 = Some(value);
                }
            }
            "--models-dir" => {
                if let Some(value) = args.next() {
                    options.models_dir = Some(PathBuf::from(value));
                }
            }
            "--force" => {
                options.force = true;
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {}
        }
    }

    let log_options = LogOptions {
        write_file: false,
        ..LogOptions::default()
    };
    if let Err(err) = logging::init(log_options) {
        eprintln!("Logging disabled: {err}");
    }

    match ensure_model(options) {
        Ok(path) => {
            println!("Classifier artifact ready: {}", path.display());
        }
        Err(err) => {
            eprintln!("Failed to prepare classifier artifact: {err}");
            std::process::exit(1);
        }
    }
}

fn ensure_model(options: SetupOptions) -> Result<PathBuf, String> {
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let mut source = ModelSource::from_settings(&settings).map_err(|err| err.to_string())?;
    if let Some(url) = options.url {
        source.url = Some(url);
    }
    if let Some(sha256) = options.sha256 {
        source.sha256 = Some(sha256);
    }
    let dest = match options.models_dir {
        Some(dir) => dir.join(config::DEFAULT_MODEL_FILE_NAME),
        None if settings.model_path.is_some() => source.local_path.clone(),
        None => app_dirs::models_dir()
            .map_err(|err| err.to_string())?
            .join(config::DEFAULT_MODEL_FILE_NAME),
    };

    if !options.force && LinearRiskModel::load_json(&dest).is_ok() {
        return Ok(dest);
    }
    fetch_to_path(&source, &dest)
}

fn print_help() {
    println!(
        "Usage: obesity-risk-model-setup [--url <url>] [--sha256 <hex>] [--models-dir <path>] [--force]"
    );
}
