//! Best-effort auto-naming for freshly created notes.
//!
//! # Responsibility
//! - Ask an external suggester for a short label off the caller's thread.
//! - Apply the label through the operation queue only if the note survives.
//!
//! # Invariants
//! - Naming starts only after the note is persisted and never blocks create.
//! - Any failure keeps the locally generated default name. No retry.
//! - A note deleted before the answer arrives is left deleted.

use crate::model::note::NoteId;
use crate::service::queue::NoteQueue;
use crate::store::StoreGateway;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Upper bound for applied labels, in chars.
pub const MAX_SUGGESTED_NAME_CHARS: usize = 40;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static LABEL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(name|title)\s*:\s*").expect("valid label prefix regex"));

/// Remote naming failure. Always recovered locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Service could not be reached or refused the request.
    Unavailable(String),
    /// Service answered with something that is not a usable label.
    UnexpectedShape(String),
}

impl Display for NamingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "naming service unavailable: {message}"),
            Self::UnexpectedShape(message) => {
                write!(f, "naming service returned unexpected shape: {message}")
            }
        }
    }
}

impl Error for NamingError {}

/// External label generator, typically a remote model call.
pub trait NameSuggester: Send + Sync {
    fn suggest_name(&self, text: &str, api_key: Option<&str>) -> Result<String, NamingError>;
}

/// Normalizes a raw suggestion into a single-line label.
///
/// Collapses whitespace, strips wrapping quotes and a `Name:` style prefix,
/// and caps the result at [`MAX_SUGGESTED_NAME_CHARS`].
pub fn sanitize_suggested_name(raw: &str) -> Result<String, NamingError> {
    let collapsed = WHITESPACE_RE.replace_all(raw, " ");
    let unprefixed = LABEL_PREFIX_RE.replace(collapsed.trim(), "");
    let unquoted = unprefixed
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '“' | '”'))
        .trim_end_matches('.')
        .trim();
    if unquoted.is_empty() {
        return Err(NamingError::UnexpectedShape("empty label".to_string()));
    }
    let capped: String = unquoted.chars().take(MAX_SUGGESTED_NAME_CHARS).collect();
    Ok(capped.trim_end().to_string())
}

/// Requests a label for `id` on a worker thread.
///
/// The handle yields whether the note was renamed.
pub fn spawn_auto_name<S>(
    queue: NoteQueue<S>,
    id: NoteId,
    text: String,
    api_key: Option<String>,
    suggester: Arc<dyn NameSuggester>,
) -> JoinHandle<bool>
where
    S: StoreGateway + Send + 'static,
{
    thread::spawn(move || {
        let suggestion = suggester
            .suggest_name(text.as_str(), api_key.as_deref())
            .and_then(|raw| sanitize_suggested_name(raw.as_str()));
        let name = match suggestion {
            Ok(name) => name,
            Err(err) => {
                warn!("event=note_autoname module=naming status=fallback id={id} error={err}");
                return false;
            }
        };

        match queue.run(|service| service.patch_name_if_present(id, name.as_str())) {
            Ok(renamed) => {
                info!("event=note_autoname module=naming status=ok id={id} renamed={renamed}");
                renamed
            }
            Err(err) => {
                warn!("event=note_autoname module=naming status=error id={id} error={err}");
                false
            }
        }
    })
}
