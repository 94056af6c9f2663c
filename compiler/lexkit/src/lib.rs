//! State-function lexer engine.
//!
//! `lexkit` turns an ordered sequence of units (chars, bytes, or any
//! `Clone` symbol) into classified spans called [`Item`]s. It owns no
//! grammar: a grammar is a graph of plain functions, each one moving the
//! cursor, emitting items, and returning the next [`Step`].
//!
//! # Layers
//!
//! - [`Buffer`]: where units live. [`FixedBuffer`] holds fully known input;
//!   [`StreamBuffer`] pulls units lazily from a [`Source`] and keeps every
//!   unit it has pulled, so backward navigation stays valid.
//! - [`Cursor`]: the `(start, pos)` pair over a buffer plus the navigation
//!   primitives. End of input is `None`, never a sentinel unit.
//! - [`Lexer`]: the trampoline. [`Lexer::next_item`] runs state functions
//!   until an item is queued or the machine stops.
//!
//! # Example
//!
//! ```
//! use lexkit::{Buffer, Lexer, Step, TokenKind};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Tok {
//!     Eof,
//!     Word,
//!     Space,
//! }
//!
//! impl TokenKind for Tok {
//!     const EOF: Self = Tok::Eof;
//! }
//!
//! fn words<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
//!     if l.accept_run(|c| *c == ' ') > 0 {
//!         l.emit(Tok::Space);
//!     } else if l.accept_run(|c| *c != ' ') > 0 {
//!         l.emit(Tok::Word);
//!     } else {
//!         return Step::Done;
//!     }
//!     Step::Next(words)
//! }
//!
//! let chars: Vec<char> = "hello lexer".chars().collect();
//! let mut lexer = Lexer::materialized(words, chars).expect("input is not empty");
//! let kinds: Vec<Tok> = lexer.items().map(|item| item.kind()).collect();
//! assert_eq!(kinds, [Tok::Word, Tok::Space, Tok::Word]);
//! ```

mod buffer;
mod config;
mod cursor;
mod error;
mod item;
mod lexer;
mod queue;
mod source;
mod state;

pub use buffer::{Buffer, FixedBuffer, StreamBuffer};
pub use config::{LexerConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_QUEUE_CAPACITY};
pub use cursor::Cursor;
pub use error::{LexError, SourceError};
pub use item::{Item, TokenKind};
pub use lexer::{IntoItems, Items, Lexer, MaterializedLexer, StreamedLexer};
pub use queue::{ItemQueue, QueueError};
pub use source::{ByteSource, CharSource, IterSource, Source};
pub use state::{StateFn, Step};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for lexer debug output.
///
/// Safe to call multiple times; only the first call installs a subscriber.
/// Nothing is installed unless `LEXKIT_LOG` (or `RUST_LOG`) is set, e.g.
/// `LEXKIT_LOG=lexkit=trace`. Set `LEXKIT_LOG_TREE=1` for indented,
/// span-aware output instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = match std::env::var("LEXKIT_LOG").or_else(|_| std::env::var("RUST_LOG")) {
            Ok(directives) => directives,
            Err(_) => return,
        };
        let filter = EnvFilter::new(directives);

        let installed = if std::env::var_os("LEXKIT_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
        };
        // Fails if the host already set a global subscriber.
        if let Err(err) = installed {
            tracing::debug!(error = %err, "tracing subscriber already set");
        }
    });
}
