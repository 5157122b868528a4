use super::operation_reader::OperationType;
use crate::error::{ErrorKind, Result};
use serde::Serialize;
use std::io::Write;

/// What happened to one journal row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub line: u64,
    pub op: OperationType,
    pub success: bool,
    /// Set only on failure.
    pub kind: Option<ErrorKind>,
    pub message: String,
    /// Transaction id or a JSON payload, depending on the operation.
    pub detail: Option<String>,
}

/// Writes outcomes as CSV with a `line,op,success,kind,message,detail` header.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write(&mut self, outcome: &Outcome) -> Result<()> {
        self.writer.serialize(outcome)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_output() {
        let mut buffer = Vec::new();
        {
            let mut writer = OutcomeWriter::new(&mut buffer);
            writer
                .write(&Outcome {
                    line: 2,
                    op: OperationType::Borrow,
                    success: true,
                    kind: None,
                    message: "Successfully borrowed \"Dune\". Due date: 2024-01-15.".to_string(),
                    detail: None,
                })
                .unwrap();
            writer
                .write(&Outcome {
                    line: 3,
                    op: OperationType::PayFees,
                    success: false,
                    kind: Some(ErrorKind::State),
                    message: "No late fees to pay for this book.".to_string(),
                    detail: None,
                })
                .unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "line,op,success,kind,message,detail");
        assert_eq!(
            lines[1],
            "2,borrow,true,,\"Successfully borrowed \"\"Dune\"\". Due date: 2024-01-15.\","
        );
        assert_eq!(lines[2], "3,pay_fees,false,state,No late fees to pay for this book.,");
    }
}
