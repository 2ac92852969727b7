//! Publishing step.
//!
//! Publishing is the terminal action of a run; publishers emit no events.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

/// Trait for publishing approved documentation.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the approved `document` for `product_name`.
    async fn publish(&self, product_name: &str, document: &str) -> anyhow::Result<()>;

    /// Get the publisher name.
    fn name(&self) -> &str;
}

/// Console stream a [`ConsolePublisher`] writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    /// Keeps stdout free for machine-readable output
    Stderr,
}

/// Writes documentation to the console.
#[derive(Debug, Default)]
pub struct ConsolePublisher {
    stream: ConsoleStream,
}

impl ConsolePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_stderr() -> Self {
        Self { stream: ConsoleStream::Stderr }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

#[async_trait]
impl Publisher for ConsolePublisher {
    async fn publish(&self, product_name: &str, document: &str) -> anyhow::Result<()> {
        tracing::info!(step = "publish", product = %product_name, "Publishing product documentation");

        match self.stream {
            ConsoleStream::Stdout => write_document(&mut std::io::stdout().lock(), document)?,
            ConsoleStream::Stderr => write_document(&mut std::io::stderr().lock(), document)?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

fn write_document(out: &mut impl Write, document: &str) -> std::io::Result<()> {
    writeln!(out, "{}", document)?;
    out.flush()
}

/// Stores documentation as `<output_dir>/<slug>.md`.
#[derive(Debug, Clone)]
pub struct FilePublisher {
    output_dir: PathBuf,
}

impl FilePublisher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// Path the document for `product_name` is written to.
    pub fn path_for(&self, product_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.md", slugify(product_name)))
    }
}

#[async_trait]
impl Publisher for FilePublisher {
    async fn publish(&self, product_name: &str, document: &str) -> anyhow::Result<()> {
        let path = self.path_for(product_name);
        tracing::info!(step = "publish", path = %path.display(), "Publishing product documentation");

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            anyhow::anyhow!("Could not create {}: {}", self.output_dir.display(), e)
        })?;
        tokio::fs::write(&path, document)
            .await
            .map_err(|e| anyhow::anyhow!("Could not write {}: {}", path.display(), e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Lowercase, dash-separated file stem for a product name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "product".to_string()
    } else {
        slug.to_string()
    }
}
