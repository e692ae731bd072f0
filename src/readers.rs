use anyhow::Result;
use crossbeam_channel::Receiver;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::thread;

/// A channel-based stdin reader that is Send-compatible.
///
/// Stdin is read on a dedicated thread and handed over line by line, so the
/// producer thread can own a `BufRead` without holding the stdin lock. Read
/// failures travel through the channel too: a mid-stream error must surface
/// to the caller as an error, never as a quiet end-of-stream.
pub struct ChannelStdinReader {
    receiver: Receiver<io::Result<String>>,
    current_line: Option<String>,
    current_pos: usize,
    eof: bool,
}

impl ChannelStdinReader {
    pub fn new() -> Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded();

        thread::spawn(move || {
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            let mut line = String::new();

            loop {
                match lock.read_line(&mut line) {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        if sender.send(Ok(line.clone())).is_err() {
                            break; // Receiver dropped
                        }
                        line.clear();
                    }
                    Err(e) => {
                        let _ = sender.send(Err(e));
                        break;
                    }
                }
            }
        });

        Ok(Self::with_receiver(receiver))
    }

    fn with_receiver(receiver: Receiver<io::Result<String>>) -> Self {
        Self {
            receiver,
            current_line: None,
            current_pos: 0,
            eof: false,
        }
    }

    fn ensure_current_line(&mut self) -> io::Result<()> {
        if self.current_line.is_none() && !self.eof {
            match self.receiver.recv() {
                Ok(Ok(line)) => {
                    self.current_line = Some(line);
                    self.current_pos = 0;
                }
                Ok(Err(e)) => {
                    self.eof = true;
                    return Err(e);
                }
                Err(_) => {
                    self.eof = true;
                }
            }
        }
        Ok(())
    }
}

impl io::Read for ChannelStdinReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_current_line()?;

        if let Some(ref line) = self.current_line {
            let remaining = &line.as_bytes()[self.current_pos..];
            let to_copy = std::cmp::min(buf.len(), remaining.len());

            if to_copy > 0 {
                buf[..to_copy].copy_from_slice(&remaining[..to_copy]);
                self.current_pos += to_copy;
                if self.current_pos >= line.len() {
                    self.current_line = None;
                    self.current_pos = 0;
                }
                Ok(to_copy)
            } else {
                Ok(0)
            }
        } else {
            Ok(0) // EOF
        }
    }
}

impl io::BufRead for ChannelStdinReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_current_line()?;

        if let Some(ref line) = self.current_line {
            Ok(&line.as_bytes()[self.current_pos..])
        } else {
            Ok(&[])
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(ref line) = self.current_line {
            self.current_pos = std::cmp::min(self.current_pos + amt, line.len());
            if self.current_pos >= line.len() {
                self.current_line = None;
                self.current_pos = 0;
            }
        }
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.ensure_current_line()?;

        if let Some(line) = self.current_line.take() {
            let len = line.len();
            buf.push_str(&line);
            self.current_pos = 0;
            Ok(len)
        } else {
            Ok(0) // EOF
        }
    }
}

/// Streams a list of files sequentially as one lazy line sequence.
///
/// The sequence is finite and not restartable: reading drains it. A failure
/// to open any file is an error (the run must not silently aggregate over a
/// partial input set), and a mid-read I/O error surfaces to the caller
/// distinct from end-of-stream.
pub struct MultiFileReader {
    files: Vec<String>,
    current_file_idx: usize,
    current_reader: Option<Box<dyn BufRead + Send>>,
    buffer_size: usize,
}

impl MultiFileReader {
    /// Default buffer size is 256KB for better throughput on large inputs.
    pub fn new(files: Vec<String>) -> Result<Self> {
        Self::with_buffer_size(files, 256 * 1024)
    }

    pub fn with_buffer_size(files: Vec<String>, buffer_size: usize) -> Result<Self> {
        Ok(Self {
            files,
            current_file_idx: 0,
            current_reader: None,
            buffer_size,
        })
    }

    fn ensure_current_reader(&mut self) -> io::Result<bool> {
        if self.current_reader.is_none() && self.current_file_idx < self.files.len() {
            let file_path = &self.files[self.current_file_idx];

            if file_path == "-" {
                let stdin_reader = ChannelStdinReader::new()
                    .map_err(|e| io::Error::other(format!("stdin setup failed: {}", e)))?;
                self.current_reader = Some(Box::new(stdin_reader));
            } else {
                let file = File::open(file_path).map_err(|e| {
                    io::Error::new(e.kind(), format!("failed to open '{}': {}", file_path, e))
                })?;
                self.current_reader =
                    Some(Box::new(BufReader::with_capacity(self.buffer_size, file)));
            }
        }

        Ok(self.current_reader.is_some())
    }

    fn advance_to_next_file(&mut self) {
        self.current_reader = None;
        self.current_file_idx += 1;
    }

    /// The filename currently being read, for error context.
    pub fn current_filename(&self) -> Option<&str> {
        if self.current_file_idx < self.files.len() {
            Some(&self.files[self.current_file_idx])
        } else {
            None
        }
    }
}

impl io::Read for MultiFileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if !self.ensure_current_reader()? {
                return Ok(0); // No more files
            }

            if let Some(ref mut reader) = self.current_reader {
                match reader.read(buf) {
                    Ok(0) => {
                        self.advance_to_next_file();
                        continue;
                    }
                    Ok(n) => return Ok(n),
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

impl io::BufRead for MultiFileReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if !self.ensure_current_reader()? {
            return Ok(&[]);
        }

        if let Some(ref mut reader) = self.current_reader {
            reader.fill_buf()
        } else {
            Ok(&[])
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(ref mut reader) = self.current_reader {
            reader.consume(amt);
        }
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        loop {
            if !self.ensure_current_reader()? {
                return Ok(0); // No more files
            }

            if let Some(ref mut reader) = self.current_reader {
                match reader.read_line(buf) {
                    Ok(0) => {
                        self.advance_to_next_file();

                        // Add newline between files if the previous file didn't end with one
                        if !buf.is_empty() && !buf.ends_with('\n') {
                            buf.push('\n');
                            return Ok(1);
                        }
                        continue;
                    }
                    Ok(n) => return Ok(n),
                    Err(e) => return Err(e),
                }
            }
        }
    }
}
