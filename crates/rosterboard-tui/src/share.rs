//! Share roster images by handing them to an external program.
//!
//! The image is written to the export directory and the configured command
//! is run with its path as the last argument (e.g. `xdg-open`, `open`, or a
//! script that uploads somewhere). A non-zero exit is treated as the user
//! backing out, which sends the export to the preview instead.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use rosterboard_core::export::{ExportFile, ShareError, ShareRequest, ShareTarget};
use tracing::info;

#[derive(Debug, Clone)]
pub struct CommandShareTarget {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
}

impl CommandShareTarget {
    /// Build from `[program, args...]`. Returns `None` for an empty command.
    pub fn from_command(command: &[String], dir: PathBuf) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            dir,
        })
    }
}

impl ShareTarget for CommandShareTarget {
    fn can_share(&self, files: &[ExportFile]) -> bool {
        !files.is_empty() && files.iter().all(|f| f.mime_type.starts_with("image/"))
    }

    fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ShareError::Failed(e.to_string()))?;

        let mut paths = Vec::with_capacity(request.files.len());
        for file in &request.files {
            let path = self.dir.join(&file.name);
            std::fs::write(&path, &file.bytes).map_err(|e| ShareError::Failed(e.to_string()))?;
            paths.push(path);
        }

        info!(program = %self.program, files = paths.len(), title = %request.title, "Sharing roster image");
        let status = Command::new(&self.program)
            .args(&self.args)
            .args(&paths)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ShareError::Unsupported,
                _ => ShareError::Failed(e.to_string()),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Cancelled)
        }
    }
}
