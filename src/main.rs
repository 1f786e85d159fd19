use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use spamcheck::config::Config;
use spamcheck::dataset::Dataset;
use spamcheck::inference::InferenceService;
use spamcheck::model::artifact::{artifact_paths, load_model_pair};
use spamcheck::model::train::{train_and_save_model, TrainOptions};
use spamcheck::model::traits::FeatureEncoder;
use spamcheck::model::SPAM_CLASS;
use spamcheck::text::Preprocess;

/// spamcheck: classify text as spam or not spam.
///
/// Trains a TF-IDF + multinomial naive Bayes model from a labelled corpus
/// and serves it over a small HTTP API.
#[derive(Parser)]
#[command(name = "spamcheck", version, about)]
struct Cli {
    /// Directory holding the model artifacts (overrides SPAMCHECK_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the model and serve the HTTP API
    Serve {
        /// Port to listen on (default: SPAMCHECK_PORT or 8000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: SPAMCHECK_BIND or 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Train the vectorizer and classifier and save them to the model directory
    Train {
        /// Labelled corpus, one `label<TAB>text` per line
        #[arg(long)]
        data: Option<PathBuf>,

        /// Fraction of messages held out for evaluation (default: 0.2)
        #[arg(long, default_value = "0.2")]
        test_ratio: f64,

        /// Seed for the train/test shuffle (default: 42)
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Naive Bayes smoothing (default: 1.0)
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Feed raw text to the vectorizer instead of cleaning it first
        #[arg(long)]
        no_clean: bool,
    },

    /// Evaluate the saved model against a labelled corpus
    Evaluate {
        /// Labelled corpus, one `label<TAB>text` per line
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Classify a single text
    Predict {
        text: String,

        /// Also print the spam probability
        #[arg(long)]
        verbose: bool,
    },

    /// Print the cleaned form of a text
    Clean { text: String },

    /// Show which model is loaded from the model directory
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spamcheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    match cli.command {
        Commands::Serve { port, bind } => {
            config.require_models()?;

            // Loading failures are fatal: never bind without a usable model.
            let service = InferenceService::load(&config.model_dir)
                .context("Cannot start server: model unavailable")?;

            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            spamcheck::web::run_server(service, &bind, port).await?;
        }

        Commands::Train {
            data,
            test_ratio,
            seed,
            alpha,
            no_clean,
        } => {
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            let dataset = Dataset::load(&data_path)?;
            let (train, test) = dataset.split(test_ratio, seed)?;

            let options = TrainOptions {
                preprocess: if no_clean {
                    Preprocess::Raw
                } else {
                    Preprocess::Clean
                },
                alpha,
            };

            println!(
                "Training on {} messages ({} spam), holding out {}...",
                train.len(),
                train.spam_count(),
                test.len()
            );

            let (vectorizer_path, model_path) = artifact_paths(&config.model_dir);
            let (model, vectorizer) = train_and_save_model(
                &train.texts,
                &train.labels,
                &model_path,
                &vectorizer_path,
                &options,
            )?;

            println!("  Vocabulary: {} terms", vectorizer.dim());
            println!("  Classifier: {}", model_path.display());
            println!("  Vectorizer: {}", vectorizer_path.display());

            if !test.is_empty() {
                let service = InferenceService::new(
                    Arc::new(vectorizer),
                    Arc::new(model),
                    options.preprocess,
                )?;
                let report = spamcheck::metrics::evaluate(&service, &test);
                spamcheck::output::terminal::display_report("Held-out Evaluation", &report);
            }

            println!("{}", "Model saved.".bold());
        }

        Commands::Evaluate { data } => {
            config.require_models()?;
            let service = InferenceService::load(&config.model_dir)?;
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            let dataset = Dataset::load(&data_path)?;

            let report = spamcheck::metrics::evaluate(&service, &dataset);
            spamcheck::output::terminal::display_report(
                &format!("Evaluation on {}", data_path.display()),
                &report,
            );
        }

        Commands::Predict { text, verbose } => {
            config.require_models()?;
            let (vectorizer, model) = load_model_pair(&config.model_dir)?;

            let spam_probability = if verbose {
                let features = vectorizer.encode(&vectorizer.preprocess.apply(&text));
                let proba = model.predict_proba(&features);
                model
                    .classes
                    .iter()
                    .position(|&c| c == SPAM_CLASS)
                    .map(|i| proba[i])
            } else {
                None
            };

            let preprocess = vectorizer.preprocess;
            let service = InferenceService::new(Arc::new(vectorizer), Arc::new(model), preprocess)?;
            let prediction = service.predict(&text);

            spamcheck::output::terminal::display_prediction(
                &text,
                prediction.prediction,
                spam_probability,
            );
        }

        Commands::Clean { text } => {
            println!("{}", spamcheck::text::clean_text(&text));
        }

        Commands::Status => {
            println!("Model directory: {}", config.model_dir.display());
            match load_model_pair(&config.model_dir) {
                Ok((vectorizer, model)) => {
                    println!("  Vocabulary: {} terms", vectorizer.dim());
                    println!("  Classes: {:?}", model.classes);
                    println!("  Smoothing alpha: {}", model.alpha);
                    println!("  Preprocessing: {:?}", vectorizer.preprocess);
                    println!("{}", "Model is ready to serve.".green());
                }
                Err(e) => {
                    println!("  {} {:#}", "Model unavailable:".red(), anyhow::Error::from(e));
                    println!("\nRun `spamcheck train` to build the model artifacts.");
                }
            }
        }
    }

    Ok(())
}
