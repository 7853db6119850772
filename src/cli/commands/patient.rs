//! Patient intake commands
//!
//! Each subcommand works on a draft file. The file plays the part of the
//! open form: edits, uploads and local checks update it, and `submit`
//! drives it through the submission coordinator.

use crate::adapters::api::DocumentFile;
use crate::cli::app::{exit_code, load_or_report};
use crate::cli::draft_file::DraftFile;
use crate::core::intake::{FormModel, SubmissionCoordinator, SubmitOutcome};
use crate::domain::{DocumentType, DuplicateCandidate, FieldErrors, TagList};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the patient command
#[derive(Args, Debug)]
pub struct PatientArgs {
    #[command(subcommand)]
    pub command: PatientCommand,
}

/// Patient intake subcommands
#[derive(Subcommand, Debug)]
pub enum PatientCommand {
    /// Start an empty draft with a fresh submission ID
    New(NewArgs),

    /// Change fields of a draft
    Edit(EditArgs),

    /// Upload a document and attach it to a draft
    Attach(AttachArgs),

    /// Run local validation only
    Check(DraftArgs),

    /// Validate remotely and create the patient
    Submit(DraftArgs),
}

/// The draft file to work on
#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Draft file (JSON)
    #[arg(short, long)]
    pub draft: PathBuf,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub file: DraftArgs,

    /// Replace an existing draft
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub file: DraftArgs,

    /// Set a field, e.g. `personal.firstName=Ada` (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,

    /// Append a tag, e.g. `allergies=penicillin` (repeatable)
    #[arg(long = "add-tag", value_name = "LIST=VALUE")]
    pub add_tag: Vec<String>,

    /// Remove a tag by position, e.g. `conditions=0` (repeatable)
    #[arg(long = "remove-tag", value_name = "LIST=INDEX")]
    pub remove_tag: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AttachArgs {
    #[command(flatten)]
    pub file: DraftArgs,

    /// Document to upload (pdf, png, jpg, jpeg, webp)
    #[arg(long, value_name = "PATH")]
    pub document: PathBuf,

    /// Document type (ID or REPORT)
    #[arg(long = "type", value_name = "TYPE")]
    pub doc_type: DocumentType,
}

impl PatientArgs {
    /// Execute the patient command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        match &self.command {
            PatientCommand::New(args) => args.execute(),
            PatientCommand::Edit(args) => args.execute(),
            PatientCommand::Attach(args) => args.execute(config_path).await,
            PatientCommand::Check(args) => args.check(),
            PatientCommand::Submit(args) => args.submit(config_path, shutdown_signal).await,
        }
    }
}

impl NewArgs {
    fn execute(&self) -> anyhow::Result<i32> {
        let file = DraftFile::new(&self.file.draft);
        if file.exists() && !self.force {
            println!("❌ Draft already exists: {}", file.path().display());
            println!("   Use --force to start over");
            return Ok(exit_code::BLOCKED);
        }

        let form = FormModel::new();
        file.save(&form)?;
        println!("📝 New draft: {}", file.path().display());
        println!("  Submission ID: {}", form.submission_id());
        Ok(exit_code::OK)
    }
}

impl EditArgs {
    fn execute(&self) -> anyhow::Result<i32> {
        let file = DraftFile::new(&self.file.draft);
        let mut form = file.load()?;
        let mut rejected = 0;

        for pair in &self.set {
            let result = split_pair(pair).and_then(|(path, value)| {
                form.edit(path, value).map_err(|e| e.to_string())
            });
            if let Err(message) = result {
                println!("❌ {message}");
                rejected += 1;
            }
        }

        for pair in &self.add_tag {
            let result = split_pair(pair)
                .and_then(|(list, value)| Ok((list.parse::<TagList>()?, value)))
                .and_then(|(list, value)| form.add_tag(list, value).map_err(|e| e.to_string()));
            if let Err(message) = result {
                println!("❌ {message}");
                rejected += 1;
            }
        }

        for pair in &self.remove_tag {
            match parse_removal(pair) {
                Ok((list, index)) => {
                    if form.remove_tag(list, index).is_none() {
                        println!("⚠️  No {list} tag at position {index}");
                    }
                }
                Err(message) => {
                    println!("❌ {message}");
                    rejected += 1;
                }
            }
        }

        file.save(&form)?;
        if rejected > 0 {
            println!("⚠️  {rejected} change(s) rejected; other changes were saved");
            Ok(exit_code::BLOCKED)
        } else {
            println!("✅ Draft updated");
            Ok(exit_code::OK)
        }
    }
}

impl AttachArgs {
    async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };
        let file = DraftFile::new(&self.file.draft);
        let mut form = file.load()?;

        let document = match DocumentFile::from_path(&self.document).await {
            Ok(document) => document,
            Err(e) => return Ok(app.fail(&e)),
        };

        println!("📎 Uploading {} ({} bytes)", document.file_name(), document.len());
        let mut coordinator = SubmissionCoordinator::from_client(app.client.clone());
        match coordinator
            .attach_upload(&mut form, &document, self.doc_type)
            .await
        {
            Ok(uploaded) => {
                file.save(&form)?;
                println!("✅ Attached {} document: {}", uploaded.doc_type, uploaded.url);
                Ok(exit_code::OK)
            }
            Err(e) => Ok(app.fail(&e)),
        }
    }
}

impl DraftArgs {
    fn check(&self) -> anyhow::Result<i32> {
        let form = DraftFile::new(&self.draft).load()?;
        let result = form.validate_local();

        if result.is_valid() {
            println!("✅ Draft is complete");
            Ok(exit_code::OK)
        } else {
            print_field_errors(&result.errors);
            Ok(exit_code::BLOCKED)
        }
    }

    async fn submit(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };
        let file = DraftFile::new(&self.draft);
        let mut form = file.load()?;
        let mut coordinator = SubmissionCoordinator::from_client(app.client.clone());

        println!("📤 Submitting draft {}", file.path().display());
        println!("  Submission ID: {}", form.submission_id());

        let result = tokio::select! {
            result = coordinator.submit(&mut form) => result,
            _ = interrupted(shutdown_signal) => {
                tracing::warn!("Submit abandoned by signal");
                println!("⚠️  Submit abandoned; the draft was left unchanged");
                return Ok(exit_code::INTERRUPTED);
            }
        };

        match result {
            Ok(SubmitOutcome::Created(created)) => {
                file.save(&form)?;
                println!("✅ Patient {}: {}", created.kind, created.patient_id);
                println!("  The draft now holds a new empty form");
                Ok(exit_code::OK)
            }
            Ok(SubmitOutcome::Blocked(errors)) => {
                println!("❌ The draft is incomplete");
                print_field_errors(&errors);
                Ok(exit_code::BLOCKED)
            }
            Ok(SubmitOutcome::Rejected(errors)) => {
                println!("❌ The backend rejected some fields");
                print_field_errors(&errors);
                Ok(exit_code::BLOCKED)
            }
            Ok(SubmitOutcome::Duplicates(candidates)) => {
                print_duplicates(&candidates);
                Ok(exit_code::BLOCKED)
            }
            Err(e) => Ok(app.fail(&e)),
        }
    }
}

/// Resolves once a shutdown has been requested
async fn interrupted(mut shutdown_signal: watch::Receiver<bool>) {
    if shutdown_signal.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str), String> {
    pair.split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{pair}'"))
}

fn parse_removal(pair: &str) -> Result<(TagList, usize), String> {
    let (list, index) = split_pair(pair)?;
    let list = list.parse::<TagList>()?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Tag position must be a number, got '{index}'"))?;
    Ok((list, index))
}

fn print_field_errors(errors: &FieldErrors) {
    for (address, message) in errors.iter() {
        println!("  {address}: {message}");
    }
    for error in errors.unmapped() {
        println!("  {}: {}", error.path, error.message);
    }
}

fn print_duplicates(candidates: &[DuplicateCandidate]) {
    println!("⚠️  Possible duplicate patients found:");
    for candidate in candidates {
        println!("  • {}", candidate.summary());
    }
    println!("  Review the matches before submitting again");
}
