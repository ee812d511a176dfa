//! FileOutput - appends events to a JSON lines file

use contracts::{ContractError, Event, Output};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for FileOutput
#[derive(Debug, Clone)]
pub struct FileOutputConfig {
    /// Directory holding `<name>.jsonl`
    pub base_path: PathBuf,
}

impl FileOutputConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Event body as written to the file
///
/// UTF-8 payloads are written as a JSON string, anything else as an array of bytes.
#[derive(Serialize)]
#[serde(untagged)]
enum PayloadRecord<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

impl<'a> PayloadRecord<'a> {
    fn new(payload: &'a [u8]) -> Self {
        match std::str::from_utf8(payload) {
            Ok(text) => Self::Text(text),
            Err(_) => Self::Binary(payload),
        }
    }
}

/// One line of the output file
#[derive(Serialize)]
struct EventRecord<'a> {
    batch_id: u64,
    sequence: u64,
    timestamp_ms: u64,
    payload: PayloadRecord<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a HashMap<String, String>>,
}

impl<'a> EventRecord<'a> {
    fn new(batch_id: u64, event: &'a Event) -> Self {
        Self {
            batch_id,
            sequence: event.sequence,
            timestamp_ms: event.timestamp_ms,
            payload: PayloadRecord::new(&event.payload),
            fields: (!event.fields.is_empty()).then_some(&event.fields),
        }
    }
}

/// Output that appends every event as one JSON line
pub struct FileOutput {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileOutput {
    /// Create a new FileOutput, creating the directory if needed
    pub fn new(name: impl Into<String>, config: FileOutputConfig) -> std::io::Result<Self> {
        let name = name.into();
        fs::create_dir_all(&config.base_path)?;

        let path = config.base_path.join(format!("{name}.jsonl"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            name,
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        Self::new(name, FileOutputConfig::from_params(params))
    }

    /// Path of the file being written
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn append_chunk(&mut self, batch_id: u64, events: &[Event]) -> std::io::Result<()> {
        for event in events {
            serde_json::to_writer(&mut self.writer, &EventRecord::new(batch_id, event))
                .map_err(std::io::Error::other)?;
            self.writer.write_all(b"\n")?;
        }
        // A chunk is only acknowledged once it reached the file.
        self.writer.flush()
    }

    fn persist_chunk(&mut self, batch_id: u64, events: &[Event]) -> Result<(), ContractError> {
        self.append_chunk(batch_id, events).map_err(|e| {
            error!(output = %self.name, batch_id, error = %e, "Write failed");
            ContractError::output_write(&self.name, e.to_string())
        })
    }
}

impl Output for FileOutput {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_output_write",
        skip(self, events),
        fields(output = %self.name, events = events.len())
    )]
    async fn write(&mut self, batch_id: u64, events: &[Event]) -> Result<(), ContractError> {
        self.persist_chunk(batch_id, events)
    }

    #[instrument(name = "file_output_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.writer.flush()?;
        Ok(())
    }

    #[instrument(name = "file_output_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.writer.flush()?;
        debug!(output = %self.name, path = %self.path.display(), "FileOutput closed");
        Ok(())
    }
}
