use std::io::BufRead;

/// Streaming splitter for flat files made of sequential records, where each
/// record starts with a line carrying a fixed sentinel prefix (".I" in the
/// corpus file, "<top>" in the topic file). A sentinel line closes the block
/// accumulated so far unless that block is still empty; the trailing block is
/// yielded unconditionally at end of input.
pub struct Blocks<R> {
    reader: R,
    sentinel: &'static str,
    buf: String,
    done: bool,
}

impl<R: BufRead> Blocks<R> {
    pub fn new(reader: R, sentinel: &'static str) -> Self {
        Self { reader, sentinel, buf: String::new(), done: false }
    }
}

impl<R: BufRead> Iterator for Blocks<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    if self.buf.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buf)));
                }
                Ok(_) => {
                    if line.starts_with(self.sentinel) && !self.buf.is_empty() {
                        let block = std::mem::take(&mut self.buf);
                        self.buf.push_str(&line);
                        return Some(Ok(block));
                    }
                    self.buf.push_str(&line);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &str, sentinel: &'static str) -> Vec<String> {
        Blocks::new(Cursor::new(input), sentinel)
            .map(|b| b.unwrap())
            .collect()
    }

    #[test]
    fn splits_on_sentinel_and_keeps_trailing_block() {
        let blocks = collect(".I 1\n.T\na\n.I 2\n.T\nb\n", ".I");
        assert_eq!(blocks, vec![".I 1\n.T\na\n", ".I 2\n.T\nb\n"]);
    }

    #[test]
    fn first_block_may_lack_the_sentinel() {
        let blocks = collect("preamble\n.I 1\nx\n", ".I");
        assert_eq!(blocks, vec!["preamble\n", ".I 1\nx\n"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect("", ".I").is_empty());
    }

    #[test]
    fn topic_sentinel() {
        let blocks = collect("<top>\n<num> : 1\n<top>\n<num> : 2\n", "<top>");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].contains(": 2"));
    }
}
