//! Go source text writer.

/// Accumulates generated Go source.
#[derive(Debug, Default)]
pub struct GoWriter {
    buffer: String,
}

impl GoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `package <name>` followed by a blank line.
    pub fn package(&mut self, name: &str) {
        self.buffer.push_str("package ");
        self.buffer.push_str(name);
        self.buffer.push_str("\n\n");
    }

    /// A method on `receiver`. Body lines are tab-indented.
    pub fn function(&mut self, receiver: &str, signature: &str, body: &str) {
        self.buffer.push_str("func ");
        if !receiver.is_empty() {
            self.buffer.push_str(receiver);
            self.buffer.push(' ');
        }
        self.buffer.push_str(signature);
        self.buffer.push_str(" {\n");
        for line in body.lines() {
            self.indented(line);
        }
        self.buffer.push_str("}\n\n");
    }

    /// An interface declaration listing `signatures` in the given order.
    pub fn interface(&mut self, name: &str, signatures: &[String]) {
        self.buffer.push_str("type ");
        self.buffer.push_str(name);
        self.buffer.push_str(" interface {\n");
        for signature in signatures {
            self.indented(signature);
        }
        self.buffer.push_str("}\n\n");
    }

    fn indented(&mut self, line: &str) {
        if !line.is_empty() {
            self.buffer.push('\t');
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
