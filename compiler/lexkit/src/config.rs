//! Lexer configuration.

/// Default number of items a state function may emit before yielding.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2;

/// Default number of units reserved up front by a streamed buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Configuration for a [`Lexer`](crate::Lexer).
///
/// Both values are sizes, not limits on the input: the streamed buffer keeps
/// growing past `buffer_capacity` as units are pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexerConfig {
    /// Slots in the emission queue. A state function that emits more items
    /// than this in a single step faults with
    /// [`LexError::QueueOverflow`](crate::LexError::QueueOverflow).
    /// Zero is treated as one.
    pub queue_capacity: usize,

    /// Units reserved by a streamed buffer before the first pull.
    pub buffer_capacity: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl LexerConfig {
    /// Create a config with the specified queue capacity.
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            queue_capacity,
            ..Default::default()
        }
    }

    /// Create a config with the specified streamed buffer reservation.
    pub fn with_buffer_capacity(buffer_capacity: usize) -> Self {
        Self {
            buffer_capacity,
            ..Default::default()
        }
    }

    /// Queue capacity actually used, never below one.
    #[inline]
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}
