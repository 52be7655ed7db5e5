// ── Line / margin / marker / style / indicator / selection accessors ──────────
//
// Thin views over the native control, addressed by zero-based index. None of
// them hold state: each accessor is created per access and forwards to the
// message channel (and, for lines, the offset index). Out-of-range indexes
// are clamped into range rather than rejected; this mirrors the control's own
// behavior and keeps the UI-facing API panic-free.

use std::ffi::CString;

use crate::color::Rgb;
use crate::error::Result;
use crate::messages::*;
use crate::widget::ScintillaEdit;

// ── Lines ─────────────────────────────────────────────────────────────────────

/// The document's lines.
pub struct Lines<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// Number of lines in the document (always ≥ 1).
    pub fn count(&self) -> usize {
        self.edit.lines_ref().count()
    }

    /// The line at `index`, clamped into range.
    pub fn get(&self, index: usize) -> Line<'a> {
        Line {
            edit: self.edit,
            index: index.min(self.count() - 1),
        }
    }
}

/// One line of text, derived on demand from the offset index; never cached
/// beyond a single access.
pub struct Line<'a> {
    edit: &'a ScintillaEdit,
    index: usize,
}

impl Line<'_> {
    /// The zero-based line index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Starting byte offset within the document.
    pub fn byte_start(&self) -> usize {
        self.edit.lines_ref().line_start(self.index)
    }

    /// Byte offset just past the end of the line (including EOL bytes).
    pub fn byte_end(&self) -> usize {
        self.edit.lines_ref().line_end(self.index)
    }

    /// Byte length including EOL bytes.
    pub fn byte_length(&self) -> usize {
        self.edit.lines_ref().line_byte_length(self.index)
    }

    /// Starting character position within the document.
    pub fn position(&self) -> usize {
        self.edit
            .with_translator(|t| t.char_position_of_line(self.index))
    }

    /// Character length including EOL characters.
    pub fn char_length(&self) -> usize {
        let (start, end) = {
            let lines = self.edit.lines_ref();
            (lines.line_start(self.index), lines.line_end(self.index))
        };
        self.edit
            .with_translator(|t| t.byte_to_char(end) - t.byte_to_char(start))
    }

    /// Character position just past the end of the line.
    pub fn end_position(&self) -> usize {
        self.position() + self.char_length()
    }

    /// The line's text, including EOL characters.
    pub fn text(&self) -> String {
        let bytes = self.edit.read_range(self.byte_start(), self.byte_end());
        String::from_utf8(bytes).unwrap_or_default()
    }

    /// Move the caret to the start of this line.
    pub fn goto(&self) {
        self.edit.send(SCI_GOTOLINE, self.index, 0);
    }

    // ── Markers ───────────────────────────────────────────────────────────────

    /// Add a marker to this line. Returns a handle (-1 on failure).
    pub fn marker_add(&self, marker: usize) -> isize {
        self.edit
            .send(SCI_MARKERADD, self.index, marker.min(MARKER_MAX) as isize)
    }

    /// Remove a marker from this line.
    pub fn marker_delete(&self, marker: usize) {
        self.edit
            .send(SCI_MARKERDELETE, self.index, marker.min(MARKER_MAX) as isize);
    }

    /// Bit mask of the markers present on this line.
    pub fn marker_mask(&self) -> u32 {
        self.edit.send(SCI_MARKERGET, self.index, 0) as u32
    }

    // ── Annotations ───────────────────────────────────────────────────────────

    /// Attach annotation text below this line (empty clears it).
    pub fn set_annotation_text(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            self.edit.send(SCI_ANNOTATIONSETTEXT, self.index, 0);
            return Ok(());
        }
        let text = CString::new(text)?;
        self.edit
            .send(SCI_ANNOTATIONSETTEXT, self.index, text.as_ptr() as isize);
        Ok(())
    }

    /// The annotation text attached to this line.
    pub fn annotation_text(&self) -> String {
        let len = self.edit.send(SCI_ANNOTATIONGETTEXT, self.index, 0).max(0) as usize;
        if len == 0 {
            return String::new();
        }
        let mut buf = vec![0u8; len];
        self.edit
            .send(SCI_ANNOTATIONGETTEXT, self.index, buf.as_mut_ptr() as isize);
        String::from_utf8(buf).unwrap_or_default()
    }

    /// Number of annotation display lines attached to this line.
    pub fn annotation_lines(&self) -> usize {
        self.edit.send(SCI_ANNOTATIONGETLINES, self.index, 0).max(0) as usize
    }
}

// ── Margins ───────────────────────────────────────────────────────────────────

/// What a margin displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginType {
    /// Marker symbols.
    Symbol,
    /// Line numbers.
    Number,
    /// Default background color.
    Back,
    /// Default foreground color.
    Fore,
    /// Styled text.
    Text,
    /// Right-justified styled text.
    RText,
    /// Solid color.
    Colour,
}

impl MarginType {
    fn to_sci(self) -> isize {
        match self {
            Self::Symbol => SC_MARGIN_SYMBOL,
            Self::Number => SC_MARGIN_NUMBER,
            Self::Back => SC_MARGIN_BACK,
            Self::Fore => SC_MARGIN_FORE,
            Self::Text => SC_MARGIN_TEXT,
            Self::RText => SC_MARGIN_RTEXT,
            Self::Colour => SC_MARGIN_COLOUR,
        }
    }

    fn from_sci(value: isize) -> Self {
        match value {
            SC_MARGIN_NUMBER => Self::Number,
            SC_MARGIN_BACK => Self::Back,
            SC_MARGIN_FORE => Self::Fore,
            SC_MARGIN_TEXT => Self::Text,
            SC_MARGIN_RTEXT => Self::RText,
            SC_MARGIN_COLOUR => Self::Colour,
            _ => Self::Symbol,
        }
    }
}

/// The widget's margins.
pub struct Margins<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Margins<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// Number of margins.
    pub fn count(&self) -> usize {
        self.edit.send(SCI_GETMARGINS, 0, 0).max(1) as usize
    }

    /// The margin at `index`, clamped into range.
    pub fn get(&self, index: usize) -> Margin<'a> {
        Margin {
            edit: self.edit,
            index: index.min(self.count() - 1),
        }
    }
}

/// One margin of the widget.
pub struct Margin<'a> {
    edit: &'a ScintillaEdit,
    index: usize,
}

impl Margin<'_> {
    /// The zero-based margin index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pixel width of the margin.
    pub fn width(&self) -> i32 {
        self.edit.send(SCI_GETMARGINWIDTHN, self.index, 0) as i32
    }

    /// Set the pixel width (0 hides the margin).
    pub fn set_width(&self, pixels: i32) {
        self.edit
            .send(SCI_SETMARGINWIDTHN, self.index, pixels.max(0) as isize);
    }

    /// What the margin displays.
    pub fn margin_type(&self) -> MarginType {
        MarginType::from_sci(self.edit.send(SCI_GETMARGINTYPEN, self.index, 0))
    }

    /// Set what the margin displays.
    pub fn set_margin_type(&self, margin_type: MarginType) {
        self.edit
            .send(SCI_SETMARGINTYPEN, self.index, margin_type.to_sci());
    }

    /// Whether the margin reports clicks through the margin-click events.
    pub fn sensitive(&self) -> bool {
        self.edit.send(SCI_GETMARGINSENSITIVEN, self.index, 0) != 0
    }

    /// Set whether the margin reports clicks.
    pub fn set_sensitive(&self, sensitive: bool) {
        self.edit
            .send(SCI_SETMARGINSENSITIVEN, self.index, sensitive as isize);
    }

    /// Marker mask deciding which markers show in this margin.
    pub fn mask(&self) -> u32 {
        self.edit.send(SCI_GETMARGINMASKN, self.index, 0) as u32
    }

    /// Set the marker mask.
    pub fn set_mask(&self, mask: u32) {
        self.edit.send(SCI_SETMARGINMASKN, self.index, mask as isize);
    }
}

// ── Markers ───────────────────────────────────────────────────────────────────

/// The widget's markers.
pub struct Markers<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Markers<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// The marker at `number`, clamped into range.
    pub fn get(&self, number: usize) -> Marker<'a> {
        Marker {
            edit: self.edit,
            number: number.min(MARKER_MAX),
        }
    }

    /// The next line at or after `start_line` carrying a marker in `mask`,
    /// or `None` when there is none.
    pub fn next_marked_line(&self, start_line: usize, mask: u32) -> Option<usize> {
        let line = self.edit.send(SCI_MARKERNEXT, start_line, mask as isize);
        if line < 0 {
            None
        } else {
            Some(line as usize)
        }
    }
}

/// One marker definition.
pub struct Marker<'a> {
    edit: &'a ScintillaEdit,
    number: usize,
}

impl Marker<'_> {
    /// The marker number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Associate a `SC_MARK_*` symbol with this marker.
    pub fn define(&self, symbol: usize) {
        self.edit.send(SCI_MARKERDEFINE, self.number, symbol as isize);
    }

    /// Set the foreground color.
    pub fn set_fore(&self, color: Rgb) {
        self.edit.send(SCI_MARKERSETFORE, self.number, color.to_sci());
    }

    /// Set the background color.
    pub fn set_back(&self, color: Rgb) {
        self.edit.send(SCI_MARKERSETBACK, self.number, color.to_sci());
    }

    /// Remove this marker from every line.
    pub fn delete_all(&self) {
        self.edit.send(SCI_MARKERDELETEALL, self.number, 0);
    }
}

// ── Styles ────────────────────────────────────────────────────────────────────

/// The widget's styles.
pub struct Styles<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Styles<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// The style at `index`, clamped into range.
    pub fn get(&self, index: usize) -> Style<'a> {
        Style {
            edit: self.edit,
            index: index.min(STYLE_MAX),
        }
    }

    /// Reset all styles to the attributes of `STYLE_DEFAULT`.
    pub fn clear_all(&self) {
        self.edit.send(SCI_STYLECLEARALL, 0, 0);
    }

    /// Style number in effect at a character position.
    pub fn at_position(&self, position: usize) -> usize {
        let byte = self.edit.to_byte(position);
        self.edit.send(SCI_GETSTYLEAT, byte, 0).max(0) as usize
    }
}

/// One style definition.
pub struct Style<'a> {
    edit: &'a ScintillaEdit,
    index: usize,
}

impl Style<'_> {
    /// The style number.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Set the foreground color.
    pub fn set_fore(&self, color: Rgb) {
        self.edit.send(SCI_STYLESETFORE, self.index, color.to_sci());
    }

    /// Set the background color.
    pub fn set_back(&self, color: Rgb) {
        self.edit.send(SCI_STYLESETBACK, self.index, color.to_sci());
    }

    /// Set the bold attribute.
    pub fn set_bold(&self, bold: bool) {
        self.edit.send(SCI_STYLESETBOLD, self.index, bold as isize);
    }

    /// Set the italic attribute.
    pub fn set_italic(&self, italic: bool) {
        self.edit.send(SCI_STYLESETITALIC, self.index, italic as isize);
    }

    /// Set the point size.
    pub fn set_size(&self, points: usize) {
        self.edit.send(SCI_STYLESETSIZE, self.index, points as isize);
    }

    /// Set the font name.
    pub fn set_font(&self, name: &str) -> Result<()> {
        let name = CString::new(name)?;
        self.edit
            .send(SCI_STYLESETFONT, self.index, name.as_ptr() as isize);
        Ok(())
    }
}

// ── Indicators ────────────────────────────────────────────────────────────────

/// The widget's indicators.
pub struct Indicators<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Indicators<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// The indicator at `number`, clamped into range.
    pub fn get(&self, number: usize) -> Indicator<'a> {
        Indicator {
            edit: self.edit,
            number: number.min(INDICATOR_MAX),
        }
    }
}

/// One indicator definition.
pub struct Indicator<'a> {
    edit: &'a ScintillaEdit,
    number: usize,
}

impl Indicator<'_> {
    /// The indicator number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Set the `INDIC_*` drawing style.
    pub fn set_style(&self, style: isize) {
        self.edit.send(SCI_INDICSETSTYLE, self.number, style);
    }

    /// The `INDIC_*` drawing style.
    pub fn style(&self) -> isize {
        self.edit.send(SCI_INDICGETSTYLE, self.number, 0)
    }

    /// Set the foreground color.
    pub fn set_fore(&self, color: Rgb) {
        self.edit.send(SCI_INDICSETFORE, self.number, color.to_sci());
    }

    /// The foreground color.
    pub fn fore(&self) -> Rgb {
        Rgb::from_sci(self.edit.send(SCI_INDICGETFORE, self.number, 0))
    }
}

// ── Selections ────────────────────────────────────────────────────────────────

/// The active selections (multiple selection aware).
pub struct Selections<'a> {
    edit: &'a ScintillaEdit,
}

impl<'a> Selections<'a> {
    pub(crate) fn new(edit: &'a ScintillaEdit) -> Self {
        Self { edit }
    }

    /// Number of active selections (always ≥ 1).
    pub fn count(&self) -> usize {
        self.edit.send(SCI_GETSELECTIONS, 0, 0).max(1) as usize
    }

    /// Whether every active selection is empty.
    pub fn is_empty(&self) -> bool {
        self.edit.send(SCI_GETSELECTIONEMPTY, 0, 0) != 0
    }

    /// Index of the main selection.
    pub fn main_index(&self) -> usize {
        self.edit.send(SCI_GETMAINSELECTION, 0, 0).max(0) as usize
    }

    /// Make `index` the main selection.
    pub fn set_main_index(&self, index: usize) {
        self.edit
            .send(SCI_SETMAINSELECTION, index.min(self.count() - 1), 0);
    }

    /// The selection at `index`, clamped into range.
    pub fn get(&self, index: usize) -> Selection<'a> {
        Selection {
            edit: self.edit,
            index: index.min(self.count() - 1),
        }
    }
}

/// One of the active selections.
pub struct Selection<'a> {
    edit: &'a ScintillaEdit,
    index: usize,
}

impl Selection<'_> {
    /// The selection index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Character position of this selection's caret.
    pub fn caret(&self) -> usize {
        let byte = self.edit.send(SCI_GETSELECTIONNCARET, self.index, 0).max(0) as usize;
        self.edit.to_char(byte)
    }

    /// Character position of this selection's anchor.
    pub fn anchor(&self) -> usize {
        let byte = self
            .edit
            .send(SCI_GETSELECTIONNANCHOR, self.index, 0)
            .max(0) as usize;
        self.edit.to_char(byte)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
