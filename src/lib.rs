// ── Safety policy ─────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `ffi`     – libscintilla entry points and the raw notification layout
//   • `widget`  – widget hosting and the notify trampoline
//   • `lexilla` – liblexilla FFI
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Rust bindings for the [Scintilla] editing control hosted as a GTK widget.
//!
//! The native control addresses its document in byte offsets and reports
//! every event through one polymorphic notification record. This crate keeps
//! an incremental line offset index over the live document, translates byte
//! offsets into the character positions the API exposes, and demultiplexes
//! the notification record into typed events.
//!
//! ```no_run
//! use scintilla_gtk::ScintillaEdit;
//!
//! # fn main() -> scintilla_gtk::Result<()> {
//! let edit = ScintillaEdit::new()?;
//! edit.events().on_char_added(|e| println!("typed {:?}", e.ch));
//! edit.events().on_insert(|e| println!("inserted {:?} at {}", e.text, e.position));
//! edit.set_text("fn main() {}\n")?;
//! // Pack edit.widget_ptr() into a GTK container and run the main loop.
//! # Ok(())
//! # }
//! ```
//!
//! [Scintilla]: https://www.scintilla.org/

mod collections;
mod color;
mod error;
mod events;
mod ffi;
pub mod keys;
mod lexilla;
mod lines;
pub mod messages;
pub mod notify;
mod position;
mod widget;

pub use collections::{
    Indicator, Indicators, Line, Lines, Margin, MarginType, Margins, Marker, Markers, Selection,
    Selections, Style, Styles,
};
pub use color::Rgb;
pub use error::{Result, SciError};
pub use events::{
    AutoCSelectionEvent, BeforeModificationEvent, CallTipClickEvent, ChangeAnnotationEvent,
    CharAddedEvent, DoubleClickEvent, DwellEvent, Events, HotspotClickEvent, IndicatorClickEvent,
    IndicatorReleaseEvent, InsertCheckEvent, MarginClickEvent, ModificationEvent, NeedShownEvent,
    StyleNeededEvent, UpdateUiEvent,
};
pub use lexilla::{LexerLibrary, Lexilla, NoLexers};
pub use notify::{
    CallTipArrow, KeyMod, ListCompletionMethod, ModificationSource, ModificationType, Notification,
    UpdateChange,
};
pub use widget::{EolMode, ScintillaEdit};
