use crate::messages::{Message, LIST_END};

/// Line-oriented notification channel, separate from the diff output.
///
/// `info` carries the normal transcript (missing columns and records, the
/// final status); `error` carries failure notes.
pub trait Reporter {
    fn info(&mut self, line: &str);
    fn error(&mut self, line: &str);

    fn message(&mut self, msg: &Message) {
        self.info(&msg.to_string());
    }

    /// Heading, one line per item, then the `<end>` sentinel.
    fn list(&mut self, heading: &Message, items: &[&str]) {
        self.message(heading);
        for item in items {
            self.info(item);
        }
        self.info(LIST_END);
    }
}

/// Collects every line; used by tests and by callers that post-process the
/// transcript.
#[derive(Debug, Default, Clone)]
pub struct BufferReporter {
    pub info: Vec<String>,
    pub errors: Vec<String>,
}

impl BufferReporter {
    /// Info lines joined with trailing newlines, as they would be printed.
    pub fn info_text(&self) -> String {
        self.info.iter().map(|l| format!("{l}\n")).collect()
    }
}

impl Reporter for BufferReporter {
    fn info(&mut self, line: &str) {
        self.info.push(line.to_string());
    }

    fn error(&mut self, line: &str) {
        self.errors.push(line.to_string());
    }
}
