//! Result rendering

use iid_core::{Decision, DecisionError};
use iid_metadata::UpdateObject;
use serde::Serialize;
use std::error::Error;
use std::io::{self, Write};

/// One evaluated object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Object label
    pub object: String,
    /// Install mode
    pub mode: String,
    /// `install`, `skip` or `error`
    pub action: &'static str,
    /// Stable reason or error code
    pub reason: &'static str,
    /// Human readable explanation
    pub message: String,
}

impl Row {
    /// Summarize an evaluation result
    #[must_use]
    pub fn new(object: &UpdateObject, result: &Result<Decision, DecisionError>) -> Self {
        let (action, reason, message) = match result {
            Ok(decision) => {
                let message = match decision {
                    Decision::Install(reason) => reason.to_string(),
                    Decision::Skip(reason) => reason.to_string(),
                };
                (decision.action(), decision.code(), message)
            }
            Err(e) => ("error", e.kind().code(), chain(e)),
        };
        Self {
            object: object.label().to_string(),
            mode: object.mode.clone(),
            action,
            reason,
            message,
        }
    }

    /// Whether evaluation failed
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.action == "error"
    }
}

fn chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(crate) fn write_text(rows: &[Row], out: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            row.object, row.mode, row.action, row.message
        )?;
    }
    Ok(())
}

pub(crate) fn write_json(rows: &[Row], out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iid_core::{InstallReason, Operation, SkipReason};
    use std::path::PathBuf;

    #[test]
    fn row_from_decision() {
        let object = UpdateObject::new("raw").with_filename("rootfs.img");
        let row = Row::new(&object, &Ok(Decision::Skip(SkipReason::DigestMatch)));
        assert_eq!(row.action, "skip");
        assert_eq!(row.reason, "digest-match");
        assert!(!row.is_error());

        let row = Row::new(&object, &Ok(Decision::Install(InstallReason::NoTargetSupport)));
        assert_eq!(row.message, "mode does not support install-if-different");
    }

    #[test]
    fn row_from_error_includes_cause() {
        let object = UpdateObject::new("raw").with_filename("rootfs.img");
        let err = DecisionError::TargetUnreadable {
            object: "rootfs.img".to_string(),
            mode: "raw".to_string(),
            target: PathBuf::from("/dev/sda1"),
            operation: Operation::Digest,
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let row = Row::new(&object, &Err(err));
        assert!(row.is_error());
        assert_eq!(row.reason, "target-unreadable");
        assert_eq!(
            row.message,
            "object 'rootfs.img' (raw): failed to compute digest of '/dev/sda1': no such file"
        );
    }

    #[test]
    fn text_lines_are_tab_separated() {
        let object = UpdateObject::new("copy").with_filename("app.conf");
        let rows = vec![Row::new(
            &object,
            &Ok(Decision::Install(InstallReason::NoTargetSupport)),
        )];
        let mut out = Vec::new();
        write_text(&rows, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "app.conf\tcopy\tinstall\tmode does not support install-if-different\n"
        );
    }
}
