use std::{collections::HashMap, fmt, sync::Mutex};

use crate::error::TransferError;

pub const UPLOAD_CAPTION: &str = "File successfully uploaded! Your file is accessible at";
pub const DOWNLOAD_FAILED_ALERT: &str =
    "Something went wrong, this is likely because the file doesn't exist";

/// One output area per kind of transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Upload,
    Download,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    Link {
        caption: String,
        href: String,
        text: String,
    },
    Alert(String),
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Text(text) | Rendered::Alert(text) => write!(f, "{}", text),
            Rendered::Link {
                caption,
                href,
                text,
            } => {
                write!(f, "{} {}", caption, text)?;
                if href != text {
                    write!(f, " ({})", href)?;
                }
                Ok(())
            }
        }
    }
}

pub fn render_upload(outcome: &Result<String, TransferError>) -> Rendered {
    match outcome {
        Ok(url) => Rendered::Link {
            caption: UPLOAD_CAPTION.to_owned(),
            href: url.clone(),
            text: url.clone(),
        },
        Err(TransferError::Rejected(message)) => Rendered::Text(message.clone()),
        Err(e) => Rendered::Text(format!("Upload failed: {}", e)),
    }
}

pub fn render_download<T>(id: &str, outcome: &Result<T, TransferError>) -> Rendered {
    match outcome {
        Ok(_) => Rendered::Text(format!("Successfully downloaded file '{}'", id)),
        Err(_) => Rendered::Alert(DOWNLOAD_FAILED_ALERT.to_owned()),
    }
}

pub fn render_delete<T>(id: &str, outcome: &Result<T, TransferError>) -> Rendered {
    match outcome {
        Ok(_) => Rendered::Text(format!("Successfully deleted file '{}'", id)),
        Err(e) => Rendered::Text(format!("Failed to delete file '{}': {}", id, e)),
    }
}

pub trait StatusSink: Send + Sync {
    fn show(&self, region: Region, rendered: Rendered);
}

pub struct TerminalSink;

impl StatusSink for TerminalSink {
    fn show(&self, _region: Region, rendered: Rendered) {
        match rendered {
            Rendered::Alert(_) => eprintln!("{}", rendered),
            _ => println!("{}", rendered),
        }
    }
}

/// Keeps the latest output of each region. Newer outcomes replace older ones.
#[derive(Default)]
pub struct MemorySink {
    regions: Mutex<HashMap<Region, Rendered>>,
}

impl MemorySink {
    pub fn get(&self, region: Region) -> Option<Rendered> {
        self.regions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&region)
            .cloned()
    }
}

impl StatusSink for MemorySink {
    fn show(&self, region: Region, rendered: Rendered) {
        self.regions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(region, rendered);
    }
}
