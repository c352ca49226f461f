use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use laserfall_engine::GameConfig;
use serde::{Serialize, de::DeserializeOwned};

/// Destination for command output: a file, or stdout when no path is given.
pub struct Output {
    writer: Box<dyn Write>,
    name: String,
}

impl Output {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                name: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            name: path.display().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes `value` as indented JSON followed by a newline.
    pub fn write_json_pretty<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.newline()
    }

    /// Writes `value` as a single compact JSON line.
    pub fn write_json_line<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.newline()
    }

    /// Flushes buffered data, reporting errors that a plain drop would swallow.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.name))
    }

    fn newline(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer).with_context(|| format!("Failed to write to {}", self.name))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads and validates a game configuration file.
///
/// Missing fields take their default values.
pub fn read_config_file<P>(path: P) -> anyhow::Result<GameConfig>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let config: GameConfig = read_json_file("config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}
