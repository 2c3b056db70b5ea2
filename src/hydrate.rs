//! Capsule rehydration: merge a manifest with its canonical payload.
//!
//! A capsule directory bundles a `manifest.json` and a canonical JSON payload
//! referenced by `canonical.path` (default `canonical.json`). Rehydration
//! computes a streamed SHA-256 digest of the payload bytes, stamps the
//! manifest's `canonical` section with digest and timestamp, optionally
//! rewrites the manifest in place, and writes a self-contained hydrated
//! artifact combining manifest sections with the payload body.
//!
//! The pipeline is single-shot and synchronous. Concurrent invocations
//! against the same capsule directory race on the manifest file; there is no
//! locking.

use crate::digest::sha256_file;
use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const DEFAULT_CANONICAL_FILE: &str = "canonical.json";
const DEFAULT_OUT_DIR: &str = ".out";

/// Missing manifest or canonical payload.
///
/// Carried inside `anyhow::Error`; the CLI boundary downcasts to this type
/// to print a clean user-facing message instead of a context chain.
#[derive(Debug)]
pub struct NotFound {
    kind: MissingFile,
    path: PathBuf,
}

#[derive(Debug)]
enum MissingFile {
    Manifest,
    CanonicalPayload,
}

impl NotFound {
    fn manifest(path: PathBuf) -> Self {
        Self {
            kind: MissingFile::Manifest,
            path,
        }
    }

    fn canonical(path: PathBuf) -> Self {
        Self {
            kind: MissingFile::CanonicalPayload,
            path,
        }
    }

    /// The path that was expected to exist.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MissingFile::Manifest => write!(f, "Manifest not found: {}", self.path.display()),
            MissingFile::CanonicalPayload => {
                write!(f, "Canonical payload not found: {}", self.path.display())
            }
        }
    }
}

impl std::error::Error for NotFound {}

/// Knobs for a single rehydration run.
#[derive(Debug, Clone)]
pub struct HydrateOptions {
    /// Explicit output path; defaults to `.out/<sanitized-id>.hydrated.json`.
    pub out_path: Option<PathBuf>,
    /// Timestamp override; defaults to current UTC truncated to whole seconds.
    pub timestamp: Option<String>,
    /// Rewrite the manifest in place with the stamped `canonical` section.
    pub update_manifest: bool,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            out_path: None,
            timestamp: None,
            update_manifest: true,
        }
    }
}

/// Rehydrate the capsule at `capsule_dir` and return the output path.
///
/// Fails with [`NotFound`] when the manifest or the resolved canonical
/// payload file is absent; malformed JSON and I/O failures propagate with
/// their native detail.
pub fn rehydrate_capsule(capsule_dir: &Path, options: &HydrateOptions) -> Result<PathBuf> {
    let manifest_path = capsule_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(NotFound::manifest(manifest_path).into());
    }
    let mut manifest = read_json_object(&manifest_path, "manifest")?;

    let mut canonical_info = match manifest.get("canonical") {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => bail!(
            "manifest field 'canonical' must be an object, got {} in {}",
            json_type_name(other),
            manifest_path.display()
        ),
        None => Map::new(),
    };

    let canonical_rel = match canonical_info.get("path") {
        Some(Value::String(rel)) => rel.as_str(),
        Some(other) => bail!(
            "manifest field 'canonical.path' must be a string, got {} in {}",
            json_type_name(other),
            manifest_path.display()
        ),
        None => DEFAULT_CANONICAL_FILE,
    };
    let canonical_path = capsule_dir.join(canonical_rel);
    if !canonical_path.is_file() {
        return Err(NotFound::canonical(canonical_path).into());
    }

    let body: Value = serde_json::from_reader(
        File::open(&canonical_path)
            .with_context(|| format!("opening canonical payload {}", canonical_path.display()))?,
    )
    .with_context(|| format!("parsing canonical payload {}", canonical_path.display()))?;

    let digest = sha256_file(&canonical_path)?;
    let stamp = match &options.timestamp {
        Some(stamp) => stamp.clone(),
        None => utc_timestamp(),
    };

    canonical_info.insert("body_digest".to_string(), Value::String(digest));
    canonical_info.insert("last_hydrated".to_string(), Value::String(stamp));
    manifest.insert("canonical".to_string(), Value::Object(canonical_info));

    if options.update_manifest {
        write_pretty_json(&manifest_path, &Value::Object(manifest.clone()))
            .with_context(|| format!("rewriting manifest {}", manifest_path.display()))?;
    }

    let out_path = resolve_out_path(capsule_dir, &manifest, options.out_path.as_deref())?;

    let mut hydrated = Map::new();
    for section in ["metadata", "attestation", "ledger", "canonical"] {
        let value = manifest
            .get(section)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        hydrated.insert(section.to_string(), value);
    }
    hydrated.insert("body".to_string(), body);
    if let Some(summary) = manifest.get("summary") {
        if is_truthy(summary) {
            hydrated.insert("summary".to_string(), summary.clone());
        }
    }

    write_pretty_json(&out_path, &Value::Object(hydrated))
        .with_context(|| format!("writing hydrated artifact {}", out_path.display()))?;

    Ok(out_path)
}

/// Current UTC time as ISO-8601 with whole seconds and a literal `Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Replace path separators in a capsule id so it is usable as a filename.
pub fn sanitize_capsule_id(capsule_id: &str) -> String {
    capsule_id.replace(['/', '\\'], "_")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn read_json_object(path: &Path, what: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_reader(
        File::open(path).with_context(|| format!("opening {what} {}", path.display()))?,
    )
    .with_context(|| format!("parsing {what} {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{what} {} must be a JSON object, got {}",
            path.display(),
            json_type_name(&other)
        ),
    }
}

fn resolve_out_path(
    capsule_dir: &Path,
    manifest: &Map<String, Value>,
    explicit: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("creating output directory {}", parent.display())
                })?;
            }
        }
        return Ok(path.to_path_buf());
    }

    let capsule_id = manifest
        .get("metadata")
        .and_then(|meta| meta.get("capsule_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_capsule_id(capsule_dir));

    let out_dir = PathBuf::from(DEFAULT_OUT_DIR);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    Ok(out_dir.join(format!("{}.hydrated.json", sanitize_capsule_id(&capsule_id))))
}

fn fallback_capsule_id(capsule_dir: &Path) -> String {
    capsule_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capsule".to_string())
}

/// Truthiness matching the upstream pipeline's conventions: null, false,
/// zero, and empty strings/arrays/objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Pretty-print with sorted keys and a trailing newline.
///
/// Key ordering falls out of serde_json's BTreeMap-backed object type, so
/// every document this crate writes is byte-deterministic for a given input.
fn write_pretty_json(path: &Path, value: &Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
