// ── Scintilla widget hosting ──────────────────────────────────────────────────
//
// This is one of exactly three modules where `unsafe` is permitted (with
// `ffi` and `lexilla`). Every `unsafe` block MUST carry a `// SAFETY:`
// comment.
//
// ── Callback lifetime model ───────────────────────────────────────────────────
//
// The shared state (`Inner`) lives behind an `Rc`. Connecting `"sci-notify"`
// hands one strong reference to GLib as the handler's user data together
// with a destroy-notify that releases it, so the state outlives every native
// callback no matter when the embedding drops its own handles. The raw
// notification pointer is only valid during the signal emission; the
// trampoline copies every field of interest into an owned snapshot before
// dispatching.

#![allow(unsafe_code)]

use std::cell::Ref;
use std::ffi::CString;
use std::rc::Rc;

use glib_sys::gpointer;
use gobject_sys::{g_signal_connect_data, GClosure, GObject};
use gtk_sys::GtkWidget;
use libc::{c_char, c_int, c_void};

use crate::collections::{Indicators, Lines, Margins, Markers, Selections, Styles};
use crate::error::{Result, SciError};
use crate::events::{Core, Events};
use crate::ffi::{self, RawNotification};
use crate::keys::translate_keyval;
use crate::lexilla::{LexerLibrary, Lexilla};
use crate::lines::LineIndex;
use crate::messages::*;
use crate::notify::{KeyMod, Notification, SCN_MODIFIED};
use crate::position::{DocumentRead, PositionTranslator};

// ── End-of-line mode ──────────────────────────────────────────────────────────

/// The line-ending style used for new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolMode {
    /// Windows `\r\n`.
    Crlf,
    /// Unix `\n`.
    Lf,
    /// Old Mac `\r`.
    Cr,
}

impl EolMode {
    fn to_sci(self) -> isize {
        match self {
            Self::Crlf => SC_EOL_CRLF,
            Self::Lf => SC_EOL_LF,
            Self::Cr => SC_EOL_CR,
        }
    }

    fn from_sci(mode: isize) -> Self {
        match mode {
            x if x == SC_EOL_LF => Self::Lf,
            x if x == SC_EOL_CR => Self::Cr,
            _ => Self::Crlf,
        }
    }
}

// ── Shared state ──────────────────────────────────────────────────────────────

pub(crate) struct Inner {
    widget: *mut GtkWidget,
    sci: *mut c_void,
    core: Core,
    lexilla: Box<dyn LexerLibrary>,
}

impl Inner {
    pub(crate) fn send(&self, msg: u32, wparam: usize, lparam: isize) -> isize {
        // SAFETY: sci is the pointer returned by scintilla_new and stays
        // valid while GLib holds the strong reference passed at connect time.
        unsafe { ffi::scintilla_send_message(self.sci, msg, wparam, lparam) }
    }
}

impl DocumentRead for Inner {
    fn byte_length(&self) -> usize {
        self.send(SCI_GETLENGTH, 0, 0).max(0) as usize
    }

    fn read_bytes(&self, start: usize, end: usize, buf: &mut Vec<u8>) {
        buf.clear();
        let limit = self.byte_length();
        let start = start.min(limit);
        let end = end.clamp(start, limit);
        if end == start {
            return;
        }
        let ptr = self.send(SCI_GETRANGEPOINTER, start, (end - start) as isize) as *const u8;
        if ptr.is_null() {
            return;
        }
        // SAFETY: SCI_GETRANGEPOINTER returns a pointer to (end - start)
        // contiguous document bytes, valid until the next modification; the
        // bytes are copied out before this call returns.
        unsafe {
            buf.extend_from_slice(std::slice::from_raw_parts(ptr, end - start));
        }
    }

    fn tab_width(&self) -> usize {
        self.send(SCI_GETTABWIDTH, 0, 0).max(1) as usize
    }
}

// ── Notification plumbing ─────────────────────────────────────────────────────

/// Copy every field of interest out of the raw record. Insert/delete records
/// carry `length` text bytes; the other kinds carry a null-terminated string.
fn snapshot_notification(raw: &RawNotification) -> Notification {
    let code = raw.nmhdr.code;
    let text = if raw.text.is_null() {
        None
    } else if code == SCN_MODIFIED {
        let len = raw.length.max(0) as usize;
        // SAFETY: for modified records the control guarantees `length` valid
        // bytes at `text` for the duration of the callback.
        Some(unsafe { std::slice::from_raw_parts(raw.text as *const u8, len) }.to_vec())
    } else {
        // SAFETY: for every other record kind a non-null text pointer is a
        // null-terminated string valid for the duration of the callback.
        Some(unsafe { std::ffi::CStr::from_ptr(raw.text) }.to_bytes().to_vec())
    };
    Notification {
        code,
        position: raw.position,
        ch: raw.ch,
        modifiers: raw.modifiers,
        modification_type: raw.modification_type as u32,
        text,
        length: raw.length,
        lines_added: raw.lines_added,
        line: raw.line,
        margin: raw.margin,
        x: raw.x,
        y: raw.y,
        updated: raw.updated as u32,
        list_completion_method: raw.list_completion_method,
    }
}

// SAFETY: registered for "sci-notify"; GLib guarantees the arguments are
// valid for the duration of this call. `data` is the Inner pointer produced
// by Rc::into_raw at connect time and released by release_inner, so it is
// alive whenever the signal can still fire.
unsafe extern "C" fn sci_notify_trampoline(
    _widget: *mut GtkWidget,
    _reserved: c_int,
    raw: *mut RawNotification,
    data: gpointer,
) {
    if raw.is_null() || data.is_null() {
        return;
    }
    let inner = &*(data as *const Inner);
    let scn = snapshot_notification(&*raw);
    inner.core.process(&scn, inner);
}

// SAFETY: called by GLib exactly once when the signal handler is destroyed
// (widget destruction or disconnect); reclaims the strong reference handed
// over at connect time.
unsafe extern "C" fn release_inner(data: gpointer, _closure: *mut GClosure) {
    if !data.is_null() {
        drop(Rc::from_raw(data as *const Inner));
    }
}

// ── ScintillaEdit ─────────────────────────────────────────────────────────────

/// A Scintilla editor widget.
///
/// Positions in this API are character offsets; the translation to the
/// control's byte offsets happens internally against the live offset index.
/// Handles are cheap to clone and all refer to the same widget.
#[derive(Clone)]
pub struct ScintillaEdit {
    inner: Rc<Inner>,
}

impl ScintillaEdit {
    /// Create a Scintilla widget wired to the stock Lexilla lexer library.
    pub fn new() -> Result<Self> {
        Self::with_lexer_library(Box::new(Lexilla))
    }

    /// Create a Scintilla widget with an injected lexer library.
    pub fn with_lexer_library(lexilla: Box<dyn LexerLibrary>) -> Result<Self> {
        // SAFETY: scintilla_new has no preconditions; a null return is
        // handled below.
        let widget = unsafe { ffi::scintilla_new() };
        if widget.is_null() {
            return Err(SciError::WidgetCreate);
        }

        let inner = Rc::new(Inner {
            widget,
            sci: widget as *mut c_void,
            core: Core::new(),
            lexilla,
        });

        // The document is addressed as UTF-8 throughout this crate.
        inner.send(SCI_SETCODEPAGE, SC_CP_UTF8, 0);

        let data = Rc::into_raw(Rc::clone(&inner)) as gpointer;
        // SAFETY: widget is a live GObject; the handler signature matches the
        // "sci-notify" signal; data is a strong Inner reference owned by the
        // connection and released by release_inner when GLib drops the
        // closure.
        unsafe {
            let handler: ffi::SciNotifyHandler = sci_notify_trampoline;
            g_signal_connect_data(
                widget as *mut GObject,
                c"sci-notify".as_ptr() as *const c_char,
                Some(std::mem::transmute::<
                    ffi::SciNotifyHandler,
                    unsafe extern "C" fn(),
                >(handler)),
                data,
                Some(release_inner),
                0,
            );
        }

        Ok(Self { inner })
    }

    // ── Raw access ────────────────────────────────────────────────────────────

    /// The underlying GtkWidget, for packing into a container.
    pub fn widget_ptr(&self) -> *mut GtkWidget {
        self.inner.widget
    }

    /// Send any documented Scintilla message. Escape hatch for messages this
    /// crate has no wrapper for; positions here are raw byte offsets.
    pub fn direct_message(&self, msg: u32, wparam: usize, lparam: isize) -> isize {
        self.inner.send(msg, wparam, lparam)
    }

    /// Explicitly destroy the widget. After this call the handle must not be
    /// used; GLib releases the notification state during destruction.
    pub fn destroy(&self) {
        // SAFETY: widget is valid until destroyed; destroying a widget twice
        // is the embedding's error, same as any other GTK widget.
        unsafe {
            gtk_sys::gtk_widget_destroy(self.inner.widget);
        }
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    pub(crate) fn send(&self, msg: u32, wparam: usize, lparam: isize) -> isize {
        self.inner.send(msg, wparam, lparam)
    }

    pub(crate) fn lines_ref(&self) -> Ref<'_, LineIndex> {
        self.inner.core.lines.borrow()
    }

    pub(crate) fn with_translator<R>(&self, f: impl FnOnce(&PositionTranslator<'_>) -> R) -> R {
        let lines = self.inner.core.lines.borrow();
        let translator = PositionTranslator::new(&lines, &*self.inner);
        f(&translator)
    }

    pub(crate) fn to_char(&self, byte_pos: usize) -> usize {
        self.with_translator(|t| t.byte_to_char(byte_pos))
    }

    pub(crate) fn to_byte(&self, char_pos: usize) -> usize {
        self.with_translator(|t| t.char_to_byte(char_pos))
    }

    pub(crate) fn read_range(&self, start: usize, end: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        self.inner.read_bytes(start, end, &mut buf);
        buf
    }

    // ── Events ────────────────────────────────────────────────────────────────

    /// The typed event registry.
    pub fn events(&self) -> &Events {
        &self.inner.core.events
    }

    // ── Document content ──────────────────────────────────────────────────────

    /// Replace all document text.
    pub fn set_text(&self, text: &str) -> Result<()> {
        let text = CString::new(text)?;
        self.send(SCI_SETTEXT, 0, text.as_ptr() as isize);
        Ok(())
    }

    /// The full document text.
    pub fn text(&self) -> String {
        let len = self.byte_length();
        let mut buf = vec![0u8; len + 1];
        self.send(SCI_GETTEXT, len + 1, buf.as_mut_ptr() as isize);
        buf.truncate(len);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Append text at the end of the document without moving the caret.
    pub fn append_text(&self, text: &str) {
        self.send(SCI_APPENDTEXT, text.len(), text.as_ptr() as isize);
    }

    /// Insert text at a character position.
    pub fn insert_text(&self, position: usize, text: &str) -> Result<()> {
        let limit = self.char_length();
        if position > limit {
            return Err(SciError::InvalidRange {
                position,
                length: 0,
                limit,
            });
        }
        let byte_pos = self.to_byte(position);
        let text = CString::new(text)?;
        self.send(SCI_INSERTTEXT, byte_pos, text.as_ptr() as isize);
        Ok(())
    }

    /// Delete a character range.
    pub fn delete_range(&self, position: usize, length: usize) -> Result<()> {
        let limit = self.char_length();
        if position.checked_add(length).map_or(true, |end| end > limit) {
            return Err(SciError::InvalidRange {
                position,
                length,
                limit,
            });
        }
        let start = self.to_byte(position);
        let end = self.to_byte(position + length);
        self.send(SCI_DELETERANGE, start, (end - start) as isize);
        Ok(())
    }

    /// Delete all document text.
    pub fn clear_all(&self) {
        self.send(SCI_CLEARALL, 0, 0);
    }

    /// Replace the pending insertion during an insert-check event. Passing an
    /// empty string makes the pending insertion a no-op, which is how an
    /// embedding turns the advisory veto into a real one.
    pub fn change_insertion(&self, text: &str) -> Result<()> {
        let text = CString::new(text)?;
        self.send(
            SCI_CHANGEINSERTION,
            text.as_bytes().len(),
            text.as_ptr() as isize,
        );
        Ok(())
    }

    // ── Measures ──────────────────────────────────────────────────────────────

    /// Total byte length of the document.
    pub fn byte_length(&self) -> usize {
        self.send(SCI_GETLENGTH, 0, 0).max(0) as usize
    }

    /// Total character count of the document.
    pub fn char_length(&self) -> usize {
        self.with_translator(|t| t.char_length())
    }

    /// Number of lines in the document (always ≥ 1).
    pub fn line_count(&self) -> usize {
        self.lines_ref().count()
    }

    /// Character at a character position, or `'\0'` past the end.
    pub fn char_at(&self, position: usize) -> char {
        self.with_translator(|t| t.char_at(position))
    }

    /// Visible column of a character position, expanding tabs.
    pub fn column(&self, position: usize) -> usize {
        self.with_translator(|t| {
            let byte = t.char_to_byte(position);
            t.column(byte)
        })
    }

    /// The line containing a character position.
    pub fn line_from_position(&self, position: usize) -> usize {
        self.with_translator(|t| t.line_from_char(position))
    }

    // ── Caret / selection ─────────────────────────────────────────────────────

    /// Character position of the caret.
    pub fn current_position(&self) -> usize {
        let byte = self.send(SCI_GETCURRENTPOS, 0, 0).max(0) as usize;
        self.to_char(byte)
    }

    /// Move the caret to a character position and scroll it into view.
    pub fn goto_position(&self, position: usize) {
        let byte = self.to_byte(position);
        self.send(SCI_GOTOPOS, byte, 0);
    }

    /// Set the selection anchor and caret (character positions) and scroll
    /// the caret into view.
    pub fn set_selection(&self, anchor: usize, caret: usize) {
        let anchor = self.to_byte(anchor);
        let caret = self.to_byte(caret);
        self.send(SCI_SETSEL, anchor, caret as isize);
    }

    /// The selection as `(start, end)` character positions, start ≤ end.
    pub fn selection(&self) -> (usize, usize) {
        let start = self.send(SCI_GETSELECTIONSTART, 0, 0).max(0) as usize;
        let end = self.send(SCI_GETSELECTIONEND, 0, 0).max(0) as usize;
        (self.to_char(start), self.to_char(end))
    }

    /// Select all document text.
    pub fn select_all(&self) {
        self.send(SCI_SELECTALL, 0, 0);
    }

    /// Scroll to make the caret visible.
    pub fn scroll_caret(&self) {
        self.send(SCI_SCROLLCARET, 0, 0);
    }

    // ── Undo / redo ───────────────────────────────────────────────────────────

    /// Undo the last action.
    pub fn undo(&self) {
        self.send(SCI_UNDO, 0, 0);
    }

    /// Redo the last undone action.
    pub fn redo(&self) {
        self.send(SCI_REDO, 0, 0);
    }

    /// Whether there is an action to undo.
    pub fn can_undo(&self) -> bool {
        self.send(SCI_CANUNDO, 0, 0) != 0
    }

    /// Whether there is an action to redo.
    pub fn can_redo(&self) -> bool {
        self.send(SCI_CANREDO, 0, 0) != 0
    }

    /// Discard the undo history.
    pub fn empty_undo_buffer(&self) {
        self.send(SCI_EMPTYUNDOBUFFER, 0, 0);
    }

    /// Begin a compound undo action (multiple edits become one undo step).
    pub fn begin_undo_action(&self) {
        self.send(SCI_BEGINUNDOACTION, 0, 0);
    }

    /// End the compound undo action started by `begin_undo_action`.
    pub fn end_undo_action(&self) {
        self.send(SCI_ENDUNDOACTION, 0, 0);
    }

    // ── Save point / modified state ───────────────────────────────────────────

    /// Mark the current state as the save point.
    pub fn set_save_point(&self) {
        self.send(SCI_SETSAVEPOINT, 0, 0);
    }

    /// Whether the document differs from its save point.
    pub fn modified(&self) -> bool {
        self.send(SCI_GETMODIFY, 0, 0) != 0
    }

    // ── Read-only ─────────────────────────────────────────────────────────────

    /// Whether the document is read-only.
    pub fn read_only(&self) -> bool {
        self.send(SCI_GETREADONLY, 0, 0) != 0
    }

    /// Set the document read-only state.
    pub fn set_read_only(&self, read_only: bool) {
        self.send(SCI_SETREADONLY, read_only as usize, 0);
    }

    // ── View settings ─────────────────────────────────────────────────────────

    /// The zoom level in points (may be negative).
    pub fn zoom(&self) -> i32 {
        self.send(SCI_GETZOOM, 0, 0) as i32
    }

    /// Set the zoom level.
    pub fn set_zoom(&self, zoom: i32) {
        self.send(SCI_SETZOOM, zoom as usize, 0);
    }

    /// The visible width of a tab in space-character units.
    pub fn tab_width(&self) -> usize {
        self.send(SCI_GETTABWIDTH, 0, 0).max(1) as usize
    }

    /// Set the visible width of a tab.
    pub fn set_tab_width(&self, width: usize) {
        self.send(SCI_SETTABWIDTH, width, 0);
    }

    /// Current EOL mode for new lines.
    pub fn eol_mode(&self) -> EolMode {
        EolMode::from_sci(self.send(SCI_GETEOLMODE, 0, 0))
    }

    /// Set the EOL mode for new lines.
    pub fn set_eol_mode(&self, eol: EolMode) {
        self.send(SCI_SETEOLMODE, eol.to_sci() as usize, 0);
    }

    /// Convert all existing EOL sequences in the document to `eol`.
    ///
    /// This modifies the document content (the save point is left).
    /// Call `set_eol_mode` afterwards so new keystrokes match.
    pub fn convert_eols(&self, eol: EolMode) {
        self.send(SCI_CONVERTEOLS, eol.to_sci() as usize, 0);
    }

    // ── Lexing ────────────────────────────────────────────────────────────────

    /// Install the named lexer from the injected lexer library.
    pub fn set_lexer_language(&self, name: &str) -> Result<()> {
        let lexer = self.inner.lexilla.create_lexer(name);
        if lexer.is_null() {
            return Err(SciError::LexerNotFound(name.to_owned()));
        }
        self.send(SCI_SETILEXER, 0, lexer as isize);
        Ok(())
    }

    /// The injected lexer library.
    pub fn lexer_library(&self) -> &dyn LexerLibrary {
        self.inner.lexilla.as_ref()
    }

    // ── Key bindings ──────────────────────────────────────────────────────────

    /// Bind a GDK keyval plus modifiers to a Scintilla command message.
    pub fn assign_cmd_key(&self, keyval: u32, modifiers: KeyMod, command: u32) {
        let definition = translate_keyval(keyval) | (modifiers.bits() << 16);
        self.send(SCI_ASSIGNCMDKEY, definition as usize, command as isize);
    }

    /// Remove the binding for a GDK keyval plus modifiers.
    pub fn clear_cmd_key(&self, keyval: u32, modifiers: KeyMod) {
        let definition = translate_keyval(keyval) | (modifiers.bits() << 16);
        self.send(SCI_CLEARCMDKEY, definition as usize, 0);
    }

    // ── Find / replace ────────────────────────────────────────────────────────

    /// Set the target range (character positions) for `search_in_target`.
    ///
    /// Pass `start > end` for a backward search.
    pub fn set_target_range(&self, start: usize, end: usize) {
        let start = self.to_byte(start);
        let end = self.to_byte(end);
        self.send(SCI_SETTARGETSTART, start, 0);
        self.send(SCI_SETTARGETEND, end, 0);
    }

    /// Search for `text` in the current target range.
    ///
    /// Returns the character position of the match start, or `None` if not
    /// found. On success the target range is updated to the match extent.
    pub fn search_in_target(&self, text: &str, flags: u32) -> Option<usize> {
        self.send(SCI_SETSEARCHFLAGS, flags as usize, 0);
        let result = self.send(SCI_SEARCHINTARGET, text.len(), text.as_ptr() as isize);
        if result < 0 {
            None
        } else {
            Some(self.to_char(result as usize))
        }
    }

    /// Replace the current target range. Returns the byte length of the
    /// replacement.
    pub fn replace_target(&self, text: &str) -> usize {
        self.send(SCI_REPLACETARGET, text.len(), text.as_ptr() as isize)
            .max(0) as usize
    }

    /// Find `text` from the current selection, wrapping around.
    ///
    /// Returns `true` if a match was found and selected.
    /// For backward search pass `forward = false`.
    pub fn find_next(&self, text: &str, flags: u32, forward: bool) -> bool {
        let doc_len = self.byte_length();
        let sel_start = self.send(SCI_GETSELECTIONSTART, 0, 0).max(0) as usize;
        let sel_end = self.send(SCI_GETSELECTIONEND, 0, 0).max(0) as usize;

        let try_range = |from: usize, to: usize| -> bool {
            self.send(SCI_SETTARGETSTART, from, 0);
            self.send(SCI_SETTARGETEND, to, 0);
            self.send(SCI_SETSEARCHFLAGS, flags as usize, 0);
            let pos = self.send(SCI_SEARCHINTARGET, text.len(), text.as_ptr() as isize);
            if pos < 0 {
                return false;
            }
            let end = self.send(SCI_GETTARGETEND, 0, 0).max(0) as usize;
            self.send(SCI_SETSEL, pos as usize, end as isize);
            self.scroll_caret();
            true
        };

        if forward {
            // Primary: from end of selection to end of document, then wrap.
            if try_range(sel_end, doc_len) {
                return true;
            }
            if sel_start > 0 && try_range(0, sel_start) {
                return true;
            }
        } else {
            // Reversed target (start > end) searches backward.
            if sel_start > 0 && try_range(sel_start, 0) {
                return true;
            }
            if sel_end < doc_len && try_range(doc_len, sel_end) {
                return true;
            }
        }
        false
    }

    /// Replace every occurrence of `find` with `replacement` in one undo
    /// action. Returns the number of replacements made.
    pub fn replace_all(&self, find: &str, replacement: &str, flags: u32) -> usize {
        let mut count = 0usize;
        let mut pos = 0usize;
        self.begin_undo_action();
        loop {
            let doc_len = self.byte_length(); // changes after each replacement
            self.send(SCI_SETTARGETSTART, pos, 0);
            self.send(SCI_SETTARGETEND, doc_len, 0);
            self.send(SCI_SETSEARCHFLAGS, flags as usize, 0);
            let found = self.send(SCI_SEARCHINTARGET, find.len(), find.as_ptr() as isize);
            if found < 0 {
                break;
            }
            let replaced = self.replace_target(replacement);
            pos = found as usize + replaced;
            count += 1;
        }
        self.end_undo_action();
        count
    }

    // ── Collections ───────────────────────────────────────────────────────────

    /// The document's lines.
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self)
    }

    /// The widget's margins.
    pub fn margins(&self) -> Margins<'_> {
        Margins::new(self)
    }

    /// The widget's markers.
    pub fn markers(&self) -> Markers<'_> {
        Markers::new(self)
    }

    /// The widget's styles.
    pub fn styles(&self) -> Styles<'_> {
        Styles::new(self)
    }

    /// The widget's indicators.
    pub fn indicators(&self) -> Indicators<'_> {
        Indicators::new(self)
    }

    /// The active selections.
    pub fn selections(&self) -> Selections<'_> {
        Selections::new(self)
    }
}
