//! PromptShield CLI - scan inputs and outputs from the terminal

use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;

use shield_core::{ExecutorError, ModelExecutor, SecurePipeline, ShieldConfig};
use shield_filter::InjectionFilter;
use shield_hitl::LogSink;
use shield_output::OutputValidator;

#[derive(Parser)]
#[command(name = "promptshield")]
#[command(about = "PromptShield - Layered prompt-injection defense")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Scan an input for injection signatures
    Scan {
        /// The input text to scan
        input: String,
    },
    /// Validate a model output for PII and credential exposure
    CheckOutput {
        /// The output text to validate
        output: String,
    },
    /// Run an input through the full pipeline with a stub model
    Ask {
        /// The input text to process
        input: String,
        /// System prompt to protect
        #[arg(short, long, default_value = "You are a helpful assistant.")]
        system_prompt: String,
        /// User id for rate limiting
        #[arg(short, long, default_value = "cli-user")]
        user: String,
    },
}

/// Stub backend so the pipeline can run without a live model.
struct StubExecutor;

#[async_trait]
impl ModelExecutor for StubExecutor {
    async fn execute(&self, prompt: &str) -> Result<String, ExecutorError> {
        Ok(format!("[stub response to {} prompt bytes]", prompt.len()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Scan { input }) => {
            let filter = InjectionFilter::new();
            let result = filter.detect(&input);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::CheckOutput { output }) => {
            let validator = OutputValidator::new();
            let result = validator.validate(&output);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::Ask {
            input,
            system_prompt,
            user,
        }) => {
            let pipeline = SecurePipeline::new(
                ShieldConfig::default(),
                Arc::new(StubExecutor),
                Arc::new(LogSink),
            );
            let verdict = pipeline.process_request(&input, &system_prompt, &user).await?;
            match verdict.response() {
                Some(response) => println!("{}", response),
                None => {
                    println!("DENIED: {}", verdict.reason().unwrap_or_default());
                    if let Some(review_id) = verdict.review_id() {
                        println!("Review id: {}", review_id);
                    }
                }
            }
        }
        None => {
            println!("PromptShield v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}
