// ── Byte ⇄ character position translation ─────────────────────────────────────
//
// The native control addresses the document in bytes of its storage encoding;
// the API this crate exposes is addressed in characters. With the document in
// UTF-8 (the widget sets SC_CP_UTF8 at creation) the two only agree for pure
// ASCII, so conversion has to read the actual text bytes — it cannot be done
// by arithmetic alone. Reads go line-chunk by line-chunk using the offset
// index, and every operation here is a pure read: the translator never
// mutates the index or the document.

use crate::lines::LineIndex;

// ── Document collaborator ─────────────────────────────────────────────────────

/// Read-only view of the native document consulted by position translation.
///
/// Implemented by the widget over `SCI_GETLENGTH` / `SCI_GETRANGEPOINTER` /
/// `SCI_GETTABWIDTH`, and by an in-memory fake in tests.
pub(crate) trait DocumentRead {
    /// Total byte length of the document.
    fn byte_length(&self) -> usize;

    /// Replace `buf` with the document bytes in `[start, end)`, clamped to
    /// the document.
    fn read_bytes(&self, start: usize, end: usize, buf: &mut Vec<u8>);

    /// Visible width of a tab in space-character units. Always ≥ 1.
    fn tab_width(&self) -> usize;
}

/// Count the characters in a UTF-8 byte run (continuation bytes don't count).
fn count_utf8_chars(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| (**b & 0xC0) != 0x80).count()
}

// ── Translator ────────────────────────────────────────────────────────────────

/// Byte ⇄ character conversions over one `(LineIndex, Document)` pair.
pub(crate) struct PositionTranslator<'a> {
    lines: &'a LineIndex,
    doc: &'a dyn DocumentRead,
}

impl<'a> PositionTranslator<'a> {
    pub(crate) fn new(lines: &'a LineIndex, doc: &'a dyn DocumentRead) -> Self {
        Self { lines, doc }
    }

    /// Character offset of byte offset `byte_pos` (clamped to the document).
    pub(crate) fn byte_to_char(&self, byte_pos: usize) -> usize {
        let target = byte_pos.min(self.lines.document_byte_length());
        let mut chars = 0;
        let mut buf = Vec::new();
        for line in 0..self.lines.count() {
            let start = self.lines.line_start(line);
            if start >= target {
                break;
            }
            let stop = self.lines.line_end(line).min(target);
            self.doc.read_bytes(start, stop, &mut buf);
            chars += count_utf8_chars(&buf);
            if stop == target {
                break;
            }
        }
        chars
    }

    /// Byte offset of character offset `char_pos` (clamped to the document).
    pub(crate) fn char_to_byte(&self, char_pos: usize) -> usize {
        let mut remaining = char_pos;
        let mut buf = Vec::new();
        for line in 0..self.lines.count() {
            let start = self.lines.line_start(line);
            let stop = self.lines.line_end(line);
            self.doc.read_bytes(start, stop, &mut buf);
            let line_chars = count_utf8_chars(&buf);
            if remaining > line_chars {
                remaining -= line_chars;
                continue;
            }
            // The target sits on this line; walk to its byte boundary.
            let mut seen = 0;
            for (i, b) in buf.iter().enumerate() {
                if (*b & 0xC0) != 0x80 {
                    if seen == remaining {
                        return start + i;
                    }
                    seen += 1;
                }
            }
            return stop;
        }
        self.lines.document_byte_length()
    }

    /// Visible column of byte offset `byte_pos`, expanding tabs to the
    /// configured tab width. Not equal to character-offset-minus-line-start
    /// when the line contains tabs.
    pub(crate) fn column(&self, byte_pos: usize) -> usize {
        let pos = byte_pos.min(self.lines.document_byte_length());
        let line = self.lines.line_from_byte_position(pos);
        let mut buf = Vec::new();
        self.doc.read_bytes(self.lines.line_start(line), pos, &mut buf);
        let tab = self.doc.tab_width().max(1);
        let mut col = 0;
        for b in &buf {
            if (*b & 0xC0) == 0x80 {
                continue;
            }
            if *b == b'\t' {
                col = (col / tab + 1) * tab;
            } else {
                col += 1;
            }
        }
        col
    }

    /// Character at character offset `char_pos`, or `'\0'` past the end.
    pub(crate) fn char_at(&self, char_pos: usize) -> char {
        let byte = self.char_to_byte(char_pos);
        let len = self.doc.byte_length();
        if byte >= len {
            return '\0';
        }
        let mut buf = Vec::new();
        self.doc.read_bytes(byte, (byte + 4).min(len), &mut buf);
        String::from_utf8_lossy(&buf).chars().next().unwrap_or('\0')
    }

    /// Total character count of the document.
    pub(crate) fn char_length(&self) -> usize {
        self.byte_to_char(self.lines.document_byte_length())
    }

    /// The line containing character offset `char_pos`.
    pub(crate) fn line_from_char(&self, char_pos: usize) -> usize {
        self.lines
            .line_from_byte_position(self.char_to_byte(char_pos))
    }

    /// Character offset of the first character of `line`.
    pub(crate) fn char_position_of_line(&self, line: usize) -> usize {
        self.byte_to_char(self.lines.line_start(line))
    }
}

// ── Test document ─────────────────────────────────────────────────────────────


// ── Tests ─────────────────────────────────────────────────────────────────────
