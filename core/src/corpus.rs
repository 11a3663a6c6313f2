//! Documents and the corpus capability.
//!
//! A document is a bag of named JSON-valued fields. [`InMemoryCorpus`] keeps
//! documents in a vector and assigns ids in insertion order; it can load
//! `.txt`, `.tsv`, `.json`/`.jsonl` files or whole directories of them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::DocId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn new(doc_id: DocId, fields: HashMap<String, Value>) -> Self {
        Self { doc_id, fields }
    }

    pub fn from_pairs<K, V, I>(doc_id: DocId, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { doc_id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field value as indexable text. Missing and null fields are empty,
    /// non-string scalars are rendered, arrays are joined with spaces.
    pub fn text_field(&self, name: &str) -> Cow<'_, str> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Array(items)) => Cow::Owned(
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    /// Field value as a number, accepting numeric strings.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// Read access to a document collection.
pub trait Corpus {
    fn size(&self) -> usize;

    fn get_document(&self, doc_id: DocId) -> Option<&Document>;

    /// Documents in increasing id order.
    fn iter(&self) -> Box<dyn Iterator<Item = &Document> + '_>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCorpus {
    documents: Vec<Document>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single file, or every supported file below a directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut corpus = Self::new();
        let path = path.as_ref();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && format_of(p).is_some() {
                    corpus.load_file(p)?;
                }
            }
        } else {
            corpus.load_file(path)?;
        }
        tracing::info!(path = %path.display(), documents = corpus.size(), "loaded corpus");
        Ok(corpus)
    }

    /// The document's id must equal the current corpus size.
    pub fn add_document(&mut self, document: Document) -> Result<&mut Self> {
        let expected = self.documents.len() as DocId;
        if document.doc_id != expected {
            return Err(Error::DocumentIdMismatch { expected, got: document.doc_id });
        }
        self.documents.push(document);
        Ok(self)
    }

    /// Append a document built from `fields`, assigning the next id.
    pub fn push_fields(&mut self, fields: HashMap<String, Value>) -> DocId {
        let doc_id = self.documents.len() as DocId;
        self.documents.push(Document::new(doc_id, fields));
        doc_id
    }

    /// Append the documents in `path`, continuing the id sequence.
    /// Returns the number of documents added.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let before = self.documents.len();
        let format = format_of(path)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        let reader = BufReader::new(File::open(path)?);
        match format {
            Format::Text => self.load_text(reader)?,
            Format::Tsv => self.load_tsv(reader)?,
            Format::JsonLines => self.load_json_lines(reader)?,
        }
        let added = self.documents.len() - before;
        tracing::debug!(path = %path.display(), added, "loaded corpus file");
        Ok(added)
    }

    // One document per line: body, then an optional tab-separated meta field.
    fn load_text<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split('\t');
            let mut fields = HashMap::new();
            if let Some(body) = parts.next() {
                fields.insert("body".to_string(), Value::String(body.to_string()));
            }
            if let Some(meta) = parts.next() {
                fields.insert("meta".to_string(), Value::String(meta.to_string()));
            }
            self.push_fields(fields);
        }
        Ok(())
    }

    fn load_tsv<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        let header: Vec<String> = match lines.next() {
            Some(line) => line?.trim_end_matches(['\r', '\n']).split('\t').map(str::to_string).collect(),
            None => return Ok(()),
        };
        for line in lines {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let fields = header
                .iter()
                .zip(line.split('\t'))
                .map(|(name, value)| (name.clone(), Value::String(value.to_string())))
                .collect();
            self.push_fields(fields);
        }
        Ok(())
    }

    // One JSON object per line; other lines are skipped.
    fn load_json_lines<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !(line.starts_with('{') && line.ends_with('}')) {
                continue;
            }
            let fields: HashMap<String, Value> = serde_json::from_str(line)?;
            self.push_fields(fields);
        }
        Ok(())
    }
}

impl Corpus for InMemoryCorpus {
    fn size(&self) -> usize {
        self.documents.len()
    }

    fn get_document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id as usize)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Document> + '_> {
        Box::new(self.documents.iter())
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Text,
    Tsv,
    JsonLines,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension().and_then(|s| s.to_str())? {
        "txt" => Some(Format::Text),
        "tsv" => Some(Format::Tsv),
        "json" | "jsonl" => Some(Format::JsonLines),
        _ => None,
    }
}
