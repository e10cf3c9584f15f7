use crate::network::protocol::Protocol;
use alloc::vec;
use alloc::vec::Vec;
use bytes::Bytes;

/// Memory limits of the response buffer
///
/// Exceeding a limit fails with [BufferOverflow](crate::network::CommandErrors::BufferOverflow).
/// While subscribed, push messages are read one frame at a time, so only the buffer size limits
/// the size of a single message.
#[derive(Clone, Debug)]
pub struct MemoryParameters {
    /// Max. number of unparsed bytes (incomplete frames)
    pub buffer_size: usize,

    /// Max. number of parsed but not yet taken frames
    pub frame_capacity: usize,
}

impl Default for MemoryParameters {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            frame_capacity: 64,
        }
    }
}

/// Buffer for unparsed/incomplete + parsed/complete frames
pub(crate) struct ResponseBuffer<P: Protocol> {
    decoder: P,

    memory: MemoryParameters,

    /// Unparsed data buffer
    buffer: Vec<u8>,

    /// Parsed frames, None once taken
    frames: Vec<Option<P::FrameType>>,

    /// Number of non taken frames in frame vector
    frame_count: usize,

    /// Frame index offset on external access (e.g. is_complete() or take_frame())
    /// So each frame gets an unique external index, while the frame vector gets drained once
    /// all frames are taken
    frame_offset: usize,

    /// Received data violating the protocol
    faulty: bool,
}

impl<P: Protocol> ResponseBuffer<P> {
    pub fn new(protocol: P, memory: MemoryParameters) -> ResponseBuffer<P> {
        Self {
            decoder: protocol,
            memory,
            buffer: vec![],
            frames: vec![],
            frame_count: 0,
            frame_offset: 0,
            faulty: false,
        }
    }

    /// Appends data to buffer
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.parse_frames();
    }

    /// Takes the frame at the given external index
    pub fn take_frame(&mut self, index: usize) -> Option<P::FrameType> {
        // Invalid index given
        if index < self.frame_offset {
            return None;
        }

        let frame = self.frames.get_mut(index - self.frame_offset)?.take();
        if frame.is_some() {
            self.frame_count -= 1;
        }

        if self.frame_count == 0 {
            self.frame_offset += self.frames.len();
            self.frames.clear();
        }

        frame
    }

    /// Takes the oldest frame which was not taken yet
    pub fn take_next_frame(&mut self) -> Option<P::FrameType> {
        let position = self.frames.iter().position(Option::is_some)?;
        self.take_frame(self.frame_offset + position)
    }

    /// Parses buffer and extracts frames
    /// Buffer is drained to only contain non-complete frames
    fn parse_frames(&mut self) {
        let mut start = 0;

        while !self.faulty {
            match self.parse_frame(start) {
                Some(end) => start = end,
                None => break,
            }
        }

        if start == 0 {
            return;
        }

        if start >= self.buffer.len() {
            return self.buffer.clear();
        }

        self.buffer.drain(..start);
    }

    /// Parses the next frame starting at the given position
    ///
    /// returns: Option<usize> Position following the parsed frame, None if no complete frame was found
    fn parse_frame(&mut self, start: usize) -> Option<usize> {
        if start >= self.buffer.len() {
            return None;
        }

        let bytes = Bytes::from(self.buffer[start..].to_vec());

        match self.decoder.decode(&bytes) {
            Ok(Some((frame, size))) => {
                self.frames.push(Some(frame));
                self.frame_count += 1;
                Some(start + size)
            }
            Ok(None) => None,
            Err(_) => {
                self.faulty = true;
                None
            }
        }
    }

    /// Is the frame at the given external index complete
    pub fn is_complete(&self, index: usize) -> bool {
        if index < self.frame_offset {
            return false;
        }

        self.frames.len() > index - self.frame_offset
    }

    /// External index the next parsed frame is going to get
    pub fn next_index(&self) -> usize {
        self.frame_offset + self.frames.len()
    }

    /// Number of parsed but not yet taken frames
    pub fn pending_frame_count(&self) -> usize {
        self.frame_count
    }

    /// If true, an protocol violation was detected
    /// Since the cause (e.g. Redis bug, network fault, etc.) is unclear, this is a fatal problem.
    /// The mapping of frame indexes can no longer be guaranteed from this point on.
    pub fn is_faulty(&self) -> bool {
        self.faulty
    }

    /// True if the memory limits are reached
    pub fn is_full(&self) -> bool {
        self.buffer.len() > self.memory.buffer_size || self.frame_count > self.memory.frame_capacity
    }

    /// True if the unparsed data of incomplete frames exceeds the buffer size
    pub fn is_partial_full(&self) -> bool {
        self.buffer.len() > self.memory.buffer_size
    }

    /// Resets the buffer in case of fatal error
    pub fn clear(&mut self) {
        self.frames.clear();
        self.buffer.clear();
        self.frame_offset = 0;
        self.frame_count = 0;
        self.faulty = false;
    }

    #[cfg(test)]
    pub fn frame_offset(&self) -> usize {
        self.frame_offset
    }
}
