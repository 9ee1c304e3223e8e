//! Contact desk: a command-line stand-in for the site's contact form. It keeps a draft
//! in a directory-backed store under the key `anand_contact_draft`, validates it with the
//! same rules as the web form (required fields, email/phone patterns, minimum message
//! length, honeypot) and runs a simulated submission.
//!
//! Usage example (CLI):
//! ```bash
//! contact_form --kind quick set name=Test email=test@example.com phone=+919876543210
//! contact_form --kind quick set subject=Hi "message=This is a test message."
//! contact_form --kind quick submit --delay-ms 1200
//! ```
//!
//! `edit` reads `field=value` lines from stdin and autosaves them after a 600 ms pause,
//! the way the page saves drafts while the visitor types.
#![warn(missing_docs)]
mod args;
mod model;

use crate::args::{Action, Args};
use crate::model::draft::{DRAFT_DEBOUNCE, DraftStore};
use crate::model::form::Field;
use crate::model::submission::{ContactSession, SUCCESS_RESET, SimulatedTransport, SubmitOutcome};
use crate::model::validation::validate;
use broker_common::BrokerError;
use broker_common::Result;
use broker_common::paths::normalize_path;
use broker_common::storage::FileStore;
use clap::Parser;
use log::{error, info, warn};
use std::io::{self, BufRead};
use std::time::Duration;

fn main() -> Result<(), BrokerError> {
    init_logger();
    let args = Args::parse();

    let store = FileStore::open(normalize_path(&args.store_dir))?;
    let draft = DraftStore::shared(store);
    let mut session = ContactSession::open(args.kind, draft)?.with_success_reset(SUCCESS_RESET);

    match args.command {
        Action::Show => show(&session),
        Action::Set { assignments } => {
            for raw in &assignments {
                let (field, value) = parse_assignment(raw)?;
                session.update_field(field, &value)?;
            }
            session.save_draft()?;
            info!("Draft saved ({} field(s) updated)", assignments.len());
            Ok(())
        }
        Action::Edit => edit(session),
        Action::Submit {
            delay_ms,
            failure_rate,
        } => {
            let transport = SimulatedTransport {
                delay: Duration::from_millis(delay_ms),
                failure_rate,
            };
            match session.submit(&transport)? {
                SubmitOutcome::Sent => {
                    info!("Status: {}. Thank you, we will get back to you shortly.", session.state());
                    Ok(())
                }
                SubmitOutcome::Invalid { focus } => {
                    for (field, message) in session.errors().iter() {
                        warn!("{}: {}", field, message);
                    }
                    Err(BrokerError::Format(format!("Please fix {} first", focus)))
                }
                SubmitOutcome::Failed(reason) => {
                    error!("Status: {}. Your draft is kept; try again later.", session.state());
                    Err(BrokerError::Submission(reason))
                }
            }
        }
        Action::Clear => {
            session.discard_draft()?;
            info!("Draft cleared");
            Ok(())
        }
    }
}

fn show(session: &ContactSession<FileStore>) -> Result<(), BrokerError> {
    if !session.has_saved_draft()? {
        println!("(no saved draft)");
    }
    let form = session.form();
    for field in Field::visible() {
        let value = form.get(field);
        match field.options() {
            Some(options) if value.is_empty() => {
                println!("{:<13} (choose one of: {})", field.to_string(), options.join(", "))
            }
            _ => println!("{:<13} {}", field.to_string(), value),
        }
    }

    let errors = validate(form, session.kind());
    if errors.is_empty() {
        println!("\nReady to submit.");
    } else {
        println!();
        for (field, message) in errors.iter() {
            println!("! {}: {}", field, message);
        }
    }
    Ok(())
}

fn edit(session: ContactSession<FileStore>) -> Result<(), BrokerError> {
    let mut session = session.with_autosave(DRAFT_DEBOUNCE)?;
    info!("Enter field=value lines; an empty line or EOF finishes.");

    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        match parse_assignment(trimmed) {
            Ok((field, value)) => session.update_field(field, &value)?,
            Err(e) => warn!("{}", e),
        }
    }
    // Dropping the session stops the autosaver, which writes any pending edit.
    drop(session);
    info!("Draft saved");
    Ok(())
}

/// Split `field=value`, resolving the field name and stripping matching quotes.
fn parse_assignment(raw: &str) -> Result<(Field, String), BrokerError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| BrokerError::Format(format!("expected field=value, got {:?}", raw)))?;
    let field = name
        .trim()
        .parse::<Field>()
        .map_err(|_| BrokerError::Format(format!("unknown field {:?}", name.trim())))?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(value);
    Ok((field, value.to_string()))
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
