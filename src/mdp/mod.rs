//! Machine Dialog Protocol (MDP) core.
//!
//! The installer writes newline-terminated directives on its stdout and
//! reads replies on its stdin. Submodules, leaves first:
//!
//! - `options`: escaped `|`-separated option lists.
//! - `tokenizer`: byte stream → logical lines.
//! - `event`: typed events and reply values.
//! - `patterns`: the ordered directive table.
//! - `classifier`: matched line → [`Event`].
//! - `encoder`: [`ReplyRequest`] → wire reply.
//! - `dialog`: [`MachineDialog`], composing all of the above.

pub mod classifier;
pub mod dialog;
pub mod encoder;
pub mod event;
pub mod options;
pub mod patterns;
pub mod tokenizer;

pub use dialog::MachineDialog;
pub use encoder::{encode_response, ReplyRequest};
pub use event::{Event, EventKind, ReplyValue, ValueType};
pub use options::split_valid_options;
pub use tokenizer::LineReader;
