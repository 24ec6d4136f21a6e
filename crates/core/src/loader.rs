use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{Result, TreemapError};
use crate::model::DataNode;

#[derive(Debug, Clone)]
pub enum LoadMsg {
    Started { path: PathBuf },
    Loaded(DataNode),
    Error(String),
}

pub fn parse_str(text: &str) -> Result<DataNode> {
    let data: DataNode = serde_json::from_str(text)?;
    // Surface bad leaf values at load time rather than at layout time.
    validate(&data)?;
    Ok(data)
}

fn validate(node: &DataNode) -> Result<()> {
    node.own_value()?;
    node.children.iter().try_for_each(validate)
}

pub fn load_file(path: &Path) -> Result<DataNode> {
    let text = std::fs::read_to_string(path).map_err(|source| TreemapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_str(&text)?;
    tracing::info!(path = %path.display(), root = %data.name, "dataset loaded");
    Ok(data)
}

/// Reads a dataset off the calling thread's critical path and reports
/// through a channel. A raised cancel flag drops the result.
pub struct Loader {
    cancel: Arc<AtomicBool>,
}

impl Loader {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    pub fn load(&self, path: PathBuf, tx: Sender<LoadMsg>) {
        let _ = tx.send(LoadMsg::Started { path: path.clone() });
        let result = load_file(&path);
        if self.cancel.load(Ordering::Relaxed) {
            tracing::debug!(path = %path.display(), "load cancelled");
            return;
        }
        let msg = match result {
            Ok(data) => LoadMsg::Loaded(data),
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed");
                LoadMsg::Error(e.to_string())
            }
        };
        let _ = tx.send(msg);
    }
}
