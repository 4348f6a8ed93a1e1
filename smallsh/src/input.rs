use std::io::{self, BufRead};

/// Source of command lines for the read-eval loop.
pub trait LineSource {
    /// Blocks until a full line is available. `None` means end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        // read_until retries reads interrupted by a signal handler
        if self.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
