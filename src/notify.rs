// ── Notification codes and decoded notification data ──────────────────────────
//
// The native control reports every event through one polymorphic record
// (`ffi::RawNotification`). This module holds the SCN_* header codes, the
// modification-type bit masks, and the owned `Notification` snapshot that the
// rest of the crate works with. The raw record's backing memory is only valid
// for the duration of the notify callback, so every field of interest is
// copied out before dispatch (see `widget::snapshot_notification`).

use bitflags::bitflags;

// ── SCN_* header codes ────────────────────────────────────────────────────────

/// The container must style a range of text.
pub const SCN_STYLENEEDED: u32 = 2000;
/// A printable character was added to the document.
pub const SCN_CHARADDED: u32 = 2001;
/// The document returned to its save point (e.g. via undo).
pub const SCN_SAVEPOINTREACHED: u32 = 2002;
/// The document was first edited after a save point.
pub const SCN_SAVEPOINTLEFT: u32 = 2003;
/// An edit was attempted on a read-only document.
pub const SCN_MODIFYATTEMPTRO: u32 = 2004;
/// A key was pressed (GTK platforms report some keys through this code).
pub const SCN_KEY: u32 = 2005;
/// The editor surface was double-clicked.
pub const SCN_DOUBLECLICK: u32 = 2006;
/// Content, styling, selection or scroll position changed.
pub const SCN_UPDATEUI: u32 = 2007;
/// The document was or is about to be modified; see the modification-type mask.
pub const SCN_MODIFIED: u32 = 2008;
/// A recordable message was processed while macro recording is on.
pub const SCN_MACRORECORD: u32 = 2009;
/// A sensitive margin was clicked.
pub const SCN_MARGINCLICK: u32 = 2010;
/// A hidden range must be made visible.
pub const SCN_NEEDSHOWN: u32 = 2011;
/// Painting has just finished.
pub const SCN_PAINTED: u32 = 2013;
/// An item was selected in a user list.
pub const SCN_USERLISTSELECTION: u32 = 2014;
/// A URI was dropped onto the editor.
pub const SCN_URIDROPPED: u32 = 2015;
/// The mouse started dwelling at one spot.
pub const SCN_DWELLSTART: u32 = 2016;
/// The mouse dwell ended.
pub const SCN_DWELLEND: u32 = 2017;
/// The zoom level changed.
pub const SCN_ZOOM: u32 = 2018;
/// Hotspot-styled text was clicked.
pub const SCN_HOTSPOTCLICK: u32 = 2019;
/// Hotspot-styled text was double-clicked.
pub const SCN_HOTSPOTDOUBLECLICK: u32 = 2020;
/// The call tip was clicked.
pub const SCN_CALLTIPCLICK: u32 = 2021;
/// An item is about to be selected from an auto-completion list.
pub const SCN_AUTOCSELECTION: u32 = 2022;
/// Indicator-decorated text was clicked.
pub const SCN_INDICATORCLICK: u32 = 2023;
/// The mouse was released over indicator-decorated text.
pub const SCN_INDICATORRELEASE: u32 = 2024;
/// The auto-completion list was cancelled.
pub const SCN_AUTOCCANCELLED: u32 = 2025;
/// A character was deleted while the auto-completion list was active.
pub const SCN_AUTOCCHARDELETED: u32 = 2026;
/// The mouse was released over hotspot-styled text.
pub const SCN_HOTSPOTRELEASECLICK: u32 = 2027;
/// The editor gained focus.
pub const SCN_FOCUSIN: u32 = 2028;
/// The editor lost focus.
pub const SCN_FOCUSOUT: u32 = 2029;
/// An auto-completion selection was committed into the document.
pub const SCN_AUTOCCOMPLETED: u32 = 2030;
/// A sensitive margin was right-clicked.
pub const SCN_MARGINRIGHTCLICK: u32 = 2031;
/// The highlighted item in the auto-completion list changed.
pub const SCN_AUTOCSELECTIONCHANGE: u32 = 2032;

/// Highest code the decoder recognises; everything past it is dropped.
pub(crate) const SCN_LAST: u32 = SCN_AUTOCSELECTIONCHANGE;

// ── Char-added suppression ────────────────────────────────────────────────────

/// Key-reported character values at or above this are GDK virtual keyvals
/// (the 3270 block starts at 64769) misreported through the char-added
/// channel, not printable characters, and are never dispatched.
pub(crate) const VIRTUAL_KEYVAL_FLOOR: i32 = 60_000;

// ── Modification-type mask ────────────────────────────────────────────────────

bitflags! {
    /// Bit flags of a `SCN_MODIFIED` record identifying which phase(s) of a
    /// text edit are being reported. Several bits may be set in one record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModificationType: u32 {
        /// Text was inserted (fires after the edit is applied).
        const INSERT_TEXT = 0x1;
        /// Text was deleted (fires after the edit is applied).
        const DELETE_TEXT = 0x2;
        /// A style change was applied.
        const CHANGE_STYLE = 0x4;
        /// A fold level changed.
        const CHANGE_FOLD = 0x8;
        /// The change came from a direct user action.
        const PERFORMED_USER = 0x10;
        /// The change came from an undo.
        const PERFORMED_UNDO = 0x20;
        /// The change came from a redo.
        const PERFORMED_REDO = 0x40;
        /// Part of a multi-step undo/redo transaction.
        const MULTISTEP_UNDO_REDO = 0x80;
        /// Final step of an undo/redo transaction.
        const LAST_STEP_IN_UNDO_REDO = 0x100;
        /// A line marker changed.
        const CHANGE_MARKER = 0x200;
        /// Text is about to be inserted (fires before the edit).
        const BEFORE_INSERT = 0x400;
        /// Text is about to be deleted (fires before the edit).
        const BEFORE_DELETE = 0x800;
        /// Part of an undo/redo spanning multiple lines.
        const MULTILINE_UNDO_REDO = 0x1000;
        /// First step of an undo/redo transaction.
        const START_ACTION = 0x2000;
        /// An indicator changed.
        const CHANGE_INDICATOR = 0x4000;
        /// A line state value changed.
        const CHANGE_LINE_STATE = 0x8000;
        /// A line annotation changed.
        const CHANGE_ANNOTATION = 0x2_0000;
        /// A container-originated undo action was added.
        const CONTAINER = 0x4_0000;
        /// The lexer's internal state changed.
        const LEXER_STATE = 0x8_0000;
        /// A user insertion may be intercepted and changed (fires first).
        const INSERT_CHECK = 0x10_0000;
        /// Explicit tab stops changed.
        const CHANGE_TAB_STOPS = 0x20_0000;
    }
}

impl ModificationType {
    /// Mask isolating the source-of-change bits.
    pub const SOURCE_MASK: ModificationType = ModificationType::PERFORMED_USER
        .union(ModificationType::PERFORMED_UNDO)
        .union(ModificationType::PERFORMED_REDO);
}

// ── Source of change ──────────────────────────────────────────────────────────

/// Where a modification originated, decoded from the source bits of the
/// modification-type mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationSource {
    /// A direct user edit.
    User,
    /// Replayed by the undo machinery.
    Undo,
    /// Replayed by the redo machinery.
    Redo,
}

impl ModificationSource {
    /// Decode the source bits of a raw modification-type value.
    pub fn from_mask(modification_type: u32) -> Self {
        let mt = ModificationType::from_bits_retain(modification_type)
            .intersection(ModificationType::SOURCE_MASK);
        if mt.contains(ModificationType::PERFORMED_UNDO) {
            Self::Undo
        } else if mt.contains(ModificationType::PERFORMED_REDO) {
            Self::Redo
        } else {
            Self::User
        }
    }
}

// ── Modifier keys ─────────────────────────────────────────────────────────────

bitflags! {
    /// Modifier keys held during a mouse notification (SCMOD_* values).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyMod: u32 {
        /// Shift key.
        const SHIFT = 1;
        /// Control key.
        const CTRL = 2;
        /// Alt key.
        const ALT = 4;
        /// Super (windows/command) key.
        const SUPER = 8;
        /// Meta key.
        const META = 16;
    }
}

// ── Update-UI change mask ─────────────────────────────────────────────────────

bitflags! {
    /// What changed, as reported by an update-UI notification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UpdateChange: u32 {
        /// Document content changed.
        const CONTENT = 0x1;
        /// Selection changed (including a caret move).
        const SELECTION = 0x2;
        /// Scrolled vertically.
        const V_SCROLL = 0x4;
        /// Scrolled horizontally.
        const H_SCROLL = 0x8;
    }
}

// ── Auto-completion ───────────────────────────────────────────────────────────

/// How an auto-completion selection was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCompletionMethod {
    /// A fill-up character was typed.
    FillUp,
    /// The list item was double-clicked.
    DoubleClick,
    /// Tab was pressed.
    Tab,
    /// Enter was pressed.
    Newline,
    /// A container command committed the selection.
    Command,
    /// A value this crate does not know about.
    Other(i32),
}

impl ListCompletionMethod {
    pub(crate) fn from_raw(value: i32) -> Self {
        match value {
            1 => Self::FillUp,
            2 => Self::DoubleClick,
            3 => Self::Tab,
            4 => Self::Newline,
            5 => Self::Command,
            other => Self::Other(other),
        }
    }
}

// ── Call tips ─────────────────────────────────────────────────────────────────

/// Which part of the call tip was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTipArrow {
    /// Neither arrow.
    Elsewhere,
    /// The up arrow.
    Up,
    /// The down arrow.
    Down,
}

impl CallTipArrow {
    pub(crate) fn from_position(position: isize) -> Self {
        match position {
            1 => Self::Up,
            2 => Self::Down,
            _ => Self::Elsewhere,
        }
    }
}

// ── Owned notification snapshot ───────────────────────────────────────────────

/// An owned copy of one native notification record.
///
/// Built inside the notify callback; the raw record's text pointer is copied
/// into `text` (insert/delete records carry `length` bytes, the rest carry a
/// null-terminated string) and never retained.
#[derive(Debug, Clone, Default)]
pub struct Notification {
    /// The SCN_* header code.
    pub code: u32,
    /// Byte position, or `INVALID_POSITION` when not applicable.
    pub position: isize,
    /// Character value for char-added and auto-completion records.
    pub ch: i32,
    /// SCMOD_* modifier mask for mouse records.
    pub modifiers: i32,
    /// Raw modification-type bits for `SCN_MODIFIED` records.
    pub modification_type: u32,
    /// Copied text bytes, when the record carried a text pointer.
    pub text: Option<Vec<u8>>,
    /// Byte length of the affected range.
    pub length: isize,
    /// Line delta caused by the modification.
    pub lines_added: isize,
    /// Line index for margin/annotation records.
    pub line: isize,
    /// Margin index for margin-click records.
    pub margin: i32,
    /// Pixel x for dwell records.
    pub x: i32,
    /// Pixel y for dwell records.
    pub y: i32,
    /// UpdateChange bits for update-UI records.
    pub updated: u32,
    /// Raw list-completion-method value for auto-completion records.
    pub list_completion_method: i32,
}

impl Notification {
    /// The record's text decoded as UTF-8, degrading to an empty string when
    /// absent or undecodable. Dispatch for one notification never aborts over
    /// bad text.
    pub fn decoded_text(&self) -> String {
        self.text
            .as_ref()
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
            .unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
