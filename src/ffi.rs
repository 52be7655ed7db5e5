// ── libscintilla FFI ──────────────────────────────────────────────────────────
//
// This is one of exactly three modules where `unsafe` is permitted (with
// `widget` and `lexilla`).  Every `unsafe` block MUST carry a `// SAFETY:`
// comment.
//
// The GTK port of Scintilla exports exactly two entry points of interest:
// `scintilla_new`, which creates the editor as a plain GtkWidget, and
// `scintilla_send_message`, the sole channel for every command and query.
// Events come back over the `"sci-notify"` GObject signal carrying a pointer
// to the fixed-layout notification record below; that pointer is only valid
// for the duration of the signal emission.

#![allow(unsafe_code)]

use glib_sys::gpointer;
use gtk_sys::GtkWidget;
use libc::{c_char, c_int, c_uint, c_void};

// ── Notification record layout ────────────────────────────────────────────────

/// `Sci_NotifyHeader` from Scintilla.h.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // layout must match the C struct; not every field is read
pub(crate) struct SciNotifyHeader {
    /// The widget that sent the notification.
    pub hwnd_from: *mut c_void,
    /// The control's identifier.
    pub id_from: usize,
    /// The SCN_* notification code.
    pub code: c_uint,
}

/// `SCNotification` from Scintilla.h: the single polymorphic record the
/// control uses to report every event kind. Which fields are meaningful
/// depends on `nmhdr.code`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // layout must match the C struct; not every field is read
pub(crate) struct RawNotification {
    pub nmhdr: SciNotifyHeader,
    /// Byte position (Sci_Position; signed native word).
    pub position: isize,
    /// Character value for char-added / key / auto-completion records.
    pub ch: c_int,
    /// SCMOD_* modifier mask.
    pub modifiers: c_int,
    /// SC_MOD_* bit mask for modified records.
    pub modification_type: c_int,
    /// Text pointer; may be null, valid only during the callback.
    pub text: *const c_char,
    /// Byte length of the affected range.
    pub length: isize,
    /// Line delta caused by a modification.
    pub lines_added: isize,
    /// Message id for macro-record notifications.
    pub message: c_int,
    pub w_param: usize,
    pub l_param: isize,
    /// Line index for margin/annotation records.
    pub line: isize,
    pub fold_level_now: c_int,
    pub fold_level_prev: c_int,
    /// Margin index for margin-click records.
    pub margin: c_int,
    /// List type for user-list records.
    pub list_type: c_int,
    /// Window x coordinate for dwell records.
    pub x: c_int,
    /// Window y coordinate for dwell records.
    pub y: c_int,
    pub token: c_int,
    pub annotation_lines_added: isize,
    /// SC_UPDATE_* mask for update-UI records.
    pub updated: c_int,
    /// SC_AC_* value for auto-completion records.
    pub list_completion_method: c_int,
    pub character_source: c_int,
}

/// Signature of the `"sci-notify"` signal handler:
/// `(widget, reserved, notification, user_data)`.
pub(crate) type SciNotifyHandler =
    unsafe extern "C" fn(*mut GtkWidget, c_int, *mut RawNotification, gpointer);

// ── Entry points ──────────────────────────────────────────────────────────────

#[link(name = "scintilla")]
extern "C" {
    /// Create a new Scintilla widget. The returned pointer can be added to a
    /// container and displayed like any other widget.
    pub(crate) fn scintilla_new() -> *mut GtkWidget;

    /// The main entry point: send any documented Scintilla message.
    pub(crate) fn scintilla_send_message(
        sci: *mut c_void,
        i_message: c_uint,
        w_param: usize,
        l_param: isize,
    ) -> isize;
}
