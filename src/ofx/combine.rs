//! Merge several downloaded statements into one document
//!
//! The bodies of each message group are pulled out of every statement in
//! input order and re-wrapped under a single root, behind a freshly
//! generated sign-on block. Extraction takes the shortest match between an
//! opening and closing tag, ignoring case, so nested or sloppy documents
//! behave the same way they always have.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use super::render::{aggregate, date_time_str, field, SGML_HEADER};
use crate::error::{VaultError, VaultResult};

/// Organization reported in the synthesized sign-on block
pub const SIGNON_ORG: &str = "OFXVAULT";

const MAX_NAME_ATTEMPTS: usize = 100;

/// Message groups carried over into a combined document, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageGroup {
    Bank,
    CreditCard,
    Investment,
    SecurityList,
}

impl MessageGroup {
    pub const ALL: [MessageGroup; 4] = [
        Self::Bank,
        Self::CreditCard,
        Self::Investment,
        Self::SecurityList,
    ];

    /// Tag whose inner content is extracted
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bank => "BANKMSGSRSV1",
            Self::CreditCard => "CREDITCARDMSGSRSV1",
            Self::Investment => "INVSTMTMSGSRSV1",
            Self::SecurityList => "SECLIST",
        }
    }

    fn pattern(&self) -> VaultResult<Regex> {
        let tag = regex::escape(self.tag());
        RegexBuilder::new(&format!("<{tag}>(.*?)</{tag}>"))
            .case_insensitive(true)
            .build()
            .map_err(|e| VaultError::Config(format!("Invalid pattern for {}: {}", self.tag(), e)))
    }

    /// Re-wrap concatenated bodies for output
    fn wrap(&self, body: &str) -> String {
        match self {
            Self::SecurityList => aggregate("SECLISTMSGSRSV1", &[aggregate("SECLIST", &[body])]),
            other => aggregate(other.tag(), &[body]),
        }
    }
}

/// Sign-on block reporting success at `server_time`
fn signon_block(server_time: &str) -> String {
    let version = "102";
    [
        "<SIGNONMSGSRSV1><SONRS>".to_string(),
        format!(
            "<STATUS>{}{}{}</STATUS>",
            field("CODE", "0", version),
            field("SEVERITY", "INFO", version),
            field("MESSAGE", "Successful Sign On", version)
        ),
        field("DTSERVER", server_time, version),
        format!(
            "{}{}",
            field("LANGUAGE", "ENG", version),
            field("DTPROFUP", "20010101010000", version)
        ),
        format!(
            "<FI>{}</FI></SONRS></SIGNONMSGSRSV1>",
            field("ORG", SIGNON_ORG, version)
        ),
    ]
    .join("\n")
}

/// Combine statements into one document using the current local time
pub fn combine<S: AsRef<str>>(fragments: &[S]) -> VaultResult<String> {
    combine_at(fragments, &date_time_str(false, false))
}

/// Combine statements into one document with a fixed server timestamp
pub fn combine_at<S: AsRef<str>>(fragments: &[S], server_time: &str) -> VaultResult<String> {
    let mut patterns = Vec::with_capacity(MessageGroup::ALL.len());
    for group in MessageGroup::ALL {
        patterns.push((group, group.pattern()?));
    }

    let mut bodies = vec![String::new(); patterns.len()];

    for fragment in fragments {
        let flat: String = fragment
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n'))
            .collect();

        for ((group, pattern), body) in patterns.iter().zip(bodies.iter_mut()) {
            let found = pattern
                .captures_iter(&flat)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("\n");

            if !found.is_empty() {
                debug!(group = group.tag(), "Extracted message group");
                body.push('\n');
                body.push_str(&found);
            }
        }
    }

    let mut sections = vec!["<OFX>".to_string(), signon_block(server_time)];
    for ((group, _), body) in patterns.iter().zip(&bodies) {
        if !body.is_empty() {
            sections.push(group.wrap(body));
        }
    }
    sections.push("</OFX>".to_string());

    let mut document = String::from(SGML_HEADER);
    for line in sections.join("\n").lines() {
        if !line.is_empty() {
            document.push_str(line);
            document.push('\n');
        }
    }

    Ok(document)
}

/// Combine statements and write the result to a new file in `out_dir`
///
/// The file is named `combined<NNNNNN>.ofx` with a random six-digit suffix
/// chosen so it does not overwrite an existing file.
pub fn combine_to_file<S: AsRef<str>>(fragments: &[S], out_dir: &Path) -> VaultResult<PathBuf> {
    let document = combine(fragments)?;

    fs::create_dir_all(out_dir).map_err(|e| {
        VaultError::Io(format!(
            "Failed to create directory {}: {}",
            out_dir.display(),
            e
        ))
    })?;

    let (path, mut file) = create_output_file(out_dir, random_suffix)?;
    file.write_all(document.as_bytes())
        .map_err(|e| VaultError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), statements = fragments.len(), "Combined OFX created");
    Ok(path)
}

/// Combine statement files; files that no longer exist are skipped
pub fn combine_files<P: AsRef<Path>>(files: &[P], out_dir: &Path) -> VaultResult<PathBuf> {
    let mut fragments = Vec::with_capacity(files.len());

    for file in files {
        let file = file.as_ref();
        if !file.exists() {
            warn!(path = %file.display(), "Statement file missing, skipping");
            continue;
        }
        let text = fs::read_to_string(file)
            .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", file.display(), e)))?;
        fragments.push(text);
    }

    combine_to_file(&fragments, out_dir)
}

fn random_suffix() -> u32 {
    100_000 + OsRng.next_u32() % 900_000
}

/// Create a new `combined<suffix>.ofx`, never reusing an existing file
fn create_output_file(
    out_dir: &Path,
    mut next_suffix: impl FnMut() -> u32,
) -> VaultResult<(PathBuf, File)> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = out_dir.join(format!("combined{}.ofx", next_suffix()));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %candidate.display(), "Combined file name taken, retrying");
            }
            Err(e) => {
                return Err(VaultError::Io(format!(
                    "Failed to create {}: {}",
                    candidate.display(),
                    e
                )))
            }
        }
    }
    Err(VaultError::Io(format!(
        "Could not find a free combined file name in {}",
        out_dir.display()
    )))
}
