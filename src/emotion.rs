// File: src/emotion.rs
//! Emotion classification of dialogue blobs.
//!
//! The classifier is an external model. Its label/score output is relayed
//! as-is; nothing here interprets the labels.

use crate::error::{AnalysisError, Result};
use crate::table::ScriptTable;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

pub trait EmotionClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>>;
}

// Text-classification pipelines print either a flat list or one list per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierOutput {
    Flat(Vec<EmotionScore>),
    Batched(Vec<Vec<EmotionScore>>),
}

/// Runs an external program per request: the text goes to its stdin and a
/// JSON array of `{"label", "score"}` objects is read from its stdout.
#[derive(Debug, Clone)]
pub struct ProcessClassifier {
    program: String,
    args: Vec<String>,
}

impl ProcessClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Builds from a `[program, args...]` command line.
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| AnalysisError::Config("emotion command is empty".to_string()))?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }
}

impl EmotionClassifier for ProcessClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        log::debug!("Running classifier '{}' on {} bytes", self.program, text.len());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AnalysisError::Classifier(format!("cannot start '{}': {}", self.program, e))
            })?;

        // stdin is fed from its own thread; the child may fill stdout before reading all input.
        let stdin = child.stdin.take();
        let input = text.to_owned();
        let writer = thread::spawn(move || feed_stdin(stdin, &input));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| AnalysisError::Classifier("stdin writer panicked".to_string()))?;
        if !output.status.success() {
            return Err(AnalysisError::Classifier(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        written?;

        let parsed: ClassifierOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| AnalysisError::Classifier(format!("unreadable output: {}", e)))?;
        Ok(match parsed {
            ClassifierOutput::Flat(scores) => scores,
            ClassifierOutput::Batched(batches) => batches.into_iter().flatten().collect(),
        })
    }
}

// A child that stops reading early has taken all the input it wants.
fn feed_stdin(stdin: Option<std::process::ChildStdin>, input: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input.as_bytes()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Classifies one blob. An empty blob yields no labels and never reaches the classifier.
pub fn classify_blob(classifier: &dyn EmotionClassifier, blob: &str) -> Result<Vec<EmotionScore>> {
    if blob.trim().is_empty() {
        log::warn!("No dialogue to classify");
        return Ok(Vec::new());
    }
    classifier.classify(blob)
}

/// Emotions over the whole script's dialogue.
pub fn script_emotions(
    table: &ScriptTable,
    classifier: &dyn EmotionClassifier,
) -> Result<Vec<EmotionScore>> {
    classify_blob(classifier, &table.dialogue_blob())
}

/// Emotions over the dialogue of scenes featuring `name`.
pub fn character_emotions(
    table: &ScriptTable,
    name: &str,
    classifier: &dyn EmotionClassifier,
) -> Result<Vec<EmotionScore>> {
    classify_blob(classifier, &table.character_dialogue_blob(name))
}
