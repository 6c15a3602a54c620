//! Loading span files and persona configurations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::TextSpan;

/// One document's spans as handed over by the extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanDocument {
    /// Document identifier (usually the source file name)
    pub name: String,
    /// Title supplied by the caller, used when none is detected
    pub title: Option<String>,
    /// Spans in any order
    pub spans: Vec<TextSpan>,
    /// Span records that could not be parsed
    pub malformed_records: usize,
}

impl SpanDocument {
    /// Create a document from spans.
    pub fn new(name: impl Into<String>, spans: Vec<TextSpan>) -> Self {
        Self {
            name: name.into(),
            title: None,
            spans,
            malformed_records: 0,
        }
    }

    /// Set the caller-supplied title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanFile {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        document: Option<String>,
        #[serde(default)]
        title: Option<String>,
        spans: Vec<Value>,
    },
}

/// Parse span JSON: either an array of spans or `{document, spans}`.
///
/// Records that do not deserialize as spans are skipped and counted.
pub fn parse_spans(json: &str, default_name: &str) -> Result<SpanDocument> {
    let value: Value = serde_json::from_str(json)?;
    let file: SpanFile = serde_json::from_value(value).map_err(|_| {
        Error::InvalidInput("expected an array of spans or an object with a \"spans\" array".into())
    })?;

    let (document, title, records) = match file {
        SpanFile::Bare(records) => (None, None, records),
        SpanFile::Wrapped {
            document,
            title,
            spans,
        } => (document, title, spans),
    };

    let mut spans = Vec::with_capacity(records.len());
    let mut malformed_records = 0;
    for record in records {
        match serde_json::from_value::<TextSpan>(record) {
            Ok(span) => spans.push(span),
            Err(e) => {
                malformed_records += 1;
                log::debug!("Skipping malformed span record: {}", e);
            }
        }
    }
    if malformed_records > 0 {
        log::warn!("{}: skipped {} malformed span records", default_name, malformed_records);
    }

    Ok(SpanDocument {
        name: document.unwrap_or_else(|| default_name.to_string()),
        title,
        spans,
        malformed_records,
    })
}

/// Load a span file; the document name defaults to the file stem plus `.pdf`.
pub fn load_spans<P: AsRef<Path>>(path: P) -> Result<SpanDocument> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    parse_spans(&json, &default_document_name(path))
}

fn default_document_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.pdf", stem)
}

/// A document listed in a persona configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// File name of the source document
    pub filename: String,
    /// Optional title supplied by the configuration
    pub title: Option<String>,
}

/// Persona configuration: who is reading, what for, and which documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPersonaConfig")]
pub struct PersonaConfig {
    /// Persona role
    pub persona: String,
    /// Task description
    pub job_to_be_done: String,
    /// Documents in the collection
    pub documents: Vec<DocumentRef>,
}

impl PersonaConfig {
    /// Create a configuration.
    pub fn new(persona: impl Into<String>, job_to_be_done: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
            documents: vec![],
        }
    }

    /// Add a document.
    pub fn with_document(mut self, filename: impl Into<String>) -> Self {
        self.documents.push(DocumentRef {
            filename: filename.into(),
            title: None,
        });
        self
    }

    /// Whether both persona and task are present.
    pub fn is_complete(&self) -> bool {
        !self.persona.trim().is_empty() && !self.job_to_be_done.trim().is_empty()
    }

    /// Document file names in configuration order.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleField {
    Text(String),
    Object { role: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskField {
    Text(String),
    Object { task: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentField {
    Name(String),
    Object {
        filename: String,
        #[serde(default)]
        title: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawPersonaConfig {
    #[serde(default)]
    persona: Option<RoleField>,
    #[serde(default)]
    job_to_be_done: Option<TaskField>,
    #[serde(default)]
    documents: Vec<DocumentField>,
}

impl From<RawPersonaConfig> for PersonaConfig {
    fn from(raw: RawPersonaConfig) -> Self {
        let persona = match raw.persona {
            Some(RoleField::Text(text)) | Some(RoleField::Object { role: text }) => text,
            None => String::new(),
        };
        let job_to_be_done = match raw.job_to_be_done {
            Some(TaskField::Text(text)) | Some(TaskField::Object { task: text }) => text,
            None => String::new(),
        };
        let documents = raw
            .documents
            .into_iter()
            .map(|d| match d {
                DocumentField::Name(filename) => DocumentRef {
                    filename,
                    title: None,
                },
                DocumentField::Object { filename, title } => DocumentRef { filename, title },
            })
            .collect();

        Self {
            persona,
            job_to_be_done,
            documents,
        }
    }
}

/// Parse a persona configuration.
pub fn parse_persona_config(json: &str) -> Result<PersonaConfig> {
    serde_json::from_str(json).map_err(|e| Error::ConfigInvalid(e.to_string()))
}

/// Load a persona configuration file.
pub fn load_persona_config<P: AsRef<Path>>(path: P) -> Result<PersonaConfig> {
    let json = fs::read_to_string(path)?;
    parse_persona_config(&json)
}

/// Locate the span file for a configured document inside `spans_dir`.
///
/// Tries `<name>.json` and `<stem>.json`.
pub fn span_path_for(spans_dir: &Path, filename: &str) -> Option<PathBuf> {
    let direct = spans_dir.join(format!("{}.json", filename));
    if direct.is_file() {
        return Some(direct);
    }
    let stem = Path::new(filename).file_stem()?;
    let by_stem = spans_dir.join(format!("{}.json", stem.to_string_lossy()));
    by_stem.is_file().then_some(by_stem)
}

/// Load span files for every configured document.
///
/// Missing documents are logged and skipped; it is an error only when none
/// can be found.
pub fn load_collection(config: &PersonaConfig, spans_dir: &Path) -> Result<Vec<SpanDocument>> {
    let mut documents = Vec::with_capacity(config.documents.len());
    let mut missing = Vec::new();

    for doc in &config.documents {
        match span_path_for(spans_dir, &doc.filename) {
            Some(path) => {
                let mut loaded = load_spans(&path)?;
                loaded.name = doc.filename.clone();
                if doc.title.is_some() {
                    loaded.title = doc.title.clone();
                }
                documents.push(loaded);
            }
            None => {
                log::warn!("No span file for {} in {}", doc.filename, spans_dir.display());
                missing.push(doc.filename.clone());
            }
        }
    }

    if documents.is_empty() && !config.documents.is_empty() {
        return Err(Error::MissingDocument(missing.join(", ")));
    }
    Ok(documents)
}
