/// Splits a byte stream into `\n`-terminated lines.
///
/// Bytes after the last terminator are carried over to the next [`push`](Self::push),
/// so chunk boundaries may fall anywhere: mid-line, mid-prefix, or inside a
/// multi-byte UTF-8 sequence. A trailing `\r` is stripped from each line.
#[derive(Debug)]
pub struct FrameDecoder {
    carry: Vec<u8>,
    max_line_bytes: usize,
    /// Set while skipping the remainder of an over-long line.
    discarding: bool,
}

impl FrameDecoder {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            carry: Vec::new(),
            max_line_bytes,
            discarding: false,
        }
    }

    /// Feed one chunk and return every line it completes, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            if self.discarding {
                self.discarding = false;
                self.carry.clear();
            } else {
                self.carry.extend_from_slice(head);
                if let Some(line) = self.take_line() {
                    lines.push(line);
                }
            }
            rest = &tail[1..];
        }

        if !self.discarding {
            self.carry.extend_from_slice(rest);
            // One extra byte of slack for a `\r` that will be stripped.
            if self.carry.len() > self.max_line_bytes.saturating_add(1) {
                log::warn!(
                    "Dropping over-long frame (>{} bytes without a line terminator)",
                    self.max_line_bytes
                );
                self.carry.clear();
                self.discarding = true;
            }
        }

        lines
    }

    /// Bytes held back waiting for a terminator.
    pub fn pending_bytes(&self) -> usize {
        self.carry.len()
    }

    /// End of input: hand back the unterminated tail, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.discarding = false;
        if self.carry.is_empty() {
            return None;
        }
        let tail = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        Some(tail)
    }

    fn take_line(&mut self) -> Option<String> {
        if self.carry.last() == Some(&b'\r') {
            self.carry.pop();
        }
        let line = if self.carry.len() > self.max_line_bytes {
            log::warn!("Dropping over-long frame ({} bytes)", self.carry.len());
            None
        } else {
            Some(String::from_utf8_lossy(&self.carry).into_owned())
        };
        self.carry.clear();
        line
    }
}
