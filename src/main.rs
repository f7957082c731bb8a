use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pa_client::{HttpExtractionService, HttpSubmissionService, http_client};
use pa_core::config::submit_delay_from_env_value;
use pa_core::constants::{
    DEFAULT_EXTRACTION_URL, DEFAULT_SUBMISSION_URL, PDF_MEDIA_TYPE, SUBMITTING_MESSAGE,
    UPLOADING_MESSAGE,
};
use pa_core::{
    AbortHandle, ClientConfig, CodeId, CodeKind, DocumentUpload, FormStep, IdentityField, PatientForm, Status,
    SubmissionValidator, SubmitOutcome, UploadOutcome, WorkflowController, WorkflowError,
};

/// Applied on top of `RUST_LOG`; one entry per workspace crate that logs.
const DEFAULT_LOG_DIRECTIVES: [&str; 3] = ["pa_run=info", "pa_core=info", "pa_client=info"];

#[derive(Parser)]
#[command(name = "pa-run")]
#[command(about = "Prior authorisation workflow client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document and print the prefilled form
    Upload {
        /// Document to upload
        file: PathBuf,
    },
    /// Upload a document, apply edits and submit the form
    Submit {
        /// Document to upload
        file: PathBuf,
        /// Replace the extracted first name
        #[arg(long)]
        first_name: Option<String>,
        /// Replace the extracted last name
        #[arg(long)]
        last_name: Option<String>,
        /// Replace the extracted date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
        /// Append a procedure code
        #[arg(long = "add-procedure", value_name = "CODE")]
        add_procedure: Vec<String>,
        /// Append a diagnosis code
        #[arg(long = "add-diagnosis", value_name = "CODE")]
        add_diagnosis: Vec<String>,
        /// Remove every procedure entry with this code
        #[arg(long = "remove-procedure", value_name = "CODE")]
        remove_procedure: Vec<String>,
        /// Remove every diagnosis entry with this code
        #[arg(long = "remove-diagnosis", value_name = "CODE")]
        remove_diagnosis: Vec<String>,
    },
    /// Check codes against the submission rules without contacting any service
    Check {
        #[arg(long, value_name = "CODE")]
        procedure: Vec<String>,
        #[arg(long, value_name = "CODE")]
        diagnosis: Vec<String>,
    },
}

/// Entry point for the prior authorisation client.
///
/// # Environment Variables
/// - `PA_EXTRACTION_URL`: extraction service base URL (default: "http://localhost:10000")
/// - `PA_SUBMISSION_URL`: submission service base URL (default: "http://localhost:5000")
/// - `PA_ACCEPTED_DOCUMENT_TYPE`: accepted upload media type (default: "application/pdf")
/// - `PA_SUBMIT_DELAY_MS`: delay before the submission request starts (default: 1000)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in DEFAULT_LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file } => {
            let mut controller = controller_from_env()?;
            if !upload(&mut controller, &file).await? {
                return Ok(());
            }
            let step = on_form(&controller)?;
            println!("{}", serde_json::to_string_pretty(step.form())?);
        }
        Commands::Submit {
            file,
            first_name,
            last_name,
            dob,
            add_procedure,
            add_diagnosis,
            remove_procedure,
            remove_diagnosis,
        } => {
            let mut controller = controller_from_env()?;
            if !upload(&mut controller, &file).await? {
                return Ok(());
            }

            let step = controller
                .form_step_mut()
                .context("form step not shown after upload")?;
            if let Some(value) = first_name {
                step.set_field(IdentityField::FirstName, value);
            }
            if let Some(value) = last_name {
                step.set_field(IdentityField::LastName, value);
            }
            if let Some(value) = dob {
                step.set_field(IdentityField::DateOfBirth, value.format("%Y-%m-%d").to_string());
            }
            remove_codes(step, CodeKind::Procedure, &remove_procedure);
            remove_codes(step, CodeKind::Diagnosis, &remove_diagnosis);
            for value in add_procedure {
                let id = step.add_code(CodeKind::Procedure);
                step.update_code(CodeKind::Procedure, &id, value);
            }
            for value in add_diagnosis {
                let id = step.add_code(CodeKind::Diagnosis);
                step.update_code(CodeKind::Diagnosis, &id, value);
            }

            let handle = controller.abort_handle();
            let watcher = cancel_on_ctrl_c(handle);
            let printer = print_status(controller.subscribe_status());
            let result = controller.submit().await;
            watcher.abort();
            printer.abort();

            match result {
                Ok(SubmitOutcome::Submitted) => println!("Submission accepted"),
                Ok(SubmitOutcome::Abandoned) => println!("Submission cancelled"),
                Err(err) => return Err(reported(err)),
            }
        }
        Commands::Check {
            procedure,
            diagnosis,
        } => {
            let mut form = PatientForm::default();
            for value in procedure {
                let id = form.add_code(CodeKind::Procedure);
                form.update_code(CodeKind::Procedure, &id, value);
            }
            for value in diagnosis {
                let id = form.add_code(CodeKind::Diagnosis);
                form.update_code(CodeKind::Diagnosis, &id, value);
            }

            match SubmissionValidator::validate(&form) {
                Ok(()) => println!("Codes are ready for submission"),
                Err(WorkflowError::FormatRejected { invalid }) => {
                    for id in &invalid {
                        if let Some(code) = form.procedure_codes.get(id) {
                            eprintln!("invalid procedure code: {:?}", code.value);
                        }
                    }
                    return Err(reported(WorkflowError::FormatRejected { invalid }));
                }
                Err(err) => return Err(reported(err)),
            }
        }
    }

    Ok(())
}

fn controller_from_env() -> anyhow::Result<WorkflowController> {
    let cfg = Arc::new(config_from_env()?);
    let client = http_client()?;

    tracing::info!("++ Extraction service at {}", cfg.extraction_base_url());
    tracing::info!("++ Submission service at {}", cfg.submission_base_url());

    Ok(WorkflowController::new(
        cfg.clone(),
        Arc::new(HttpExtractionService::new(client.clone(), &cfg)),
        Arc::new(HttpSubmissionService::new(client, &cfg)),
    ))
}

fn config_from_env() -> anyhow::Result<ClientConfig> {
    let extraction_url =
        std::env::var("PA_EXTRACTION_URL").unwrap_or_else(|_| DEFAULT_EXTRACTION_URL.into());
    let submission_url =
        std::env::var("PA_SUBMISSION_URL").unwrap_or_else(|_| DEFAULT_SUBMISSION_URL.into());
    let accepted_type =
        std::env::var("PA_ACCEPTED_DOCUMENT_TYPE").unwrap_or_else(|_| PDF_MEDIA_TYPE.into());
    let submit_delay = submit_delay_from_env_value(std::env::var("PA_SUBMIT_DELAY_MS").ok())?;

    Ok(ClientConfig::new(
        extraction_url,
        submission_url,
        accepted_type,
        submit_delay,
    )?)
}

/// Runs the upload step for `path`. Returns `false` if the request was cancelled.
async fn upload(controller: &mut WorkflowController, path: &Path) -> anyhow::Result<bool> {
    let document = DocumentUpload::from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    controller.select_file(document).map_err(reported)?;

    let watcher = cancel_on_ctrl_c(controller.abort_handle());
    let printer = print_status(controller.subscribe_status());
    let result = controller.upload().await;
    watcher.abort();
    printer.abort();

    match result.map_err(reported)? {
        UploadOutcome::Extracted => Ok(true),
        UploadOutcome::Abandoned => {
            println!("Upload cancelled");
            Ok(false)
        }
        UploadOutcome::NoFileSelected => {
            anyhow::bail!("upload did not start")
        }
    }
}

fn on_form(controller: &WorkflowController) -> anyhow::Result<&FormStep> {
    let step = controller
        .form_step()
        .context("form step not shown after upload")?;
    if let Some(notice) = step.general_code_notice() {
        eprintln!("{notice}");
    }
    Ok(step)
}

fn remove_codes(step: &mut FormStep, kind: CodeKind, values: &[String]) {
    let ids: Vec<CodeId> = step
        .form()
        .codes(kind)
        .iter()
        .filter(|code| values.contains(&code.value))
        .map(|code| code.id.clone())
        .collect();
    for id in &ids {
        step.remove_code(kind, id);
    }
}

fn reported(err: WorkflowError) -> anyhow::Error {
    tracing::debug!(error = ?err, "workflow step failed");
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn cancel_on_ctrl_c(handle: AbortHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if handle.abort() {
                tracing::info!("interrupt received, abandoned pending request");
            }
        }
    })
}

fn print_status(mut status: watch::Receiver<Status>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            match *status.borrow_and_update() {
                Status::Uploading => eprintln!("{UPLOADING_MESSAGE}"),
                Status::Submitting => eprintln!("{SUBMITTING_MESSAGE}"),
                Status::Idle => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_of<T>() -> &'static str {
        std::any::type_name::<T>().split("::").next().unwrap()
    }

    #[test]
    fn default_log_directives_cover_workspace_crates() {
        for target in [
            module_path!(),
            crate_of::<WorkflowController>(),
            crate_of::<HttpExtractionService>(),
        ] {
            assert!(
                DEFAULT_LOG_DIRECTIVES.contains(&format!("{target}=info").as_str()),
                "{target} has no default directive"
            );
        }
        for directive in DEFAULT_LOG_DIRECTIVES {
            directive
                .parse::<tracing_subscriber::filter::Directive>()
                .unwrap();
        }
    }
}
