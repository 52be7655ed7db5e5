// ── Line offset index ─────────────────────────────────────────────────────────
//
// The native control addresses the document exclusively in byte offsets. This
// module keeps the authoritative mapping from line index to starting byte
// offset so the rest of the crate can answer line queries without a native
// round-trip per access. The per-line records live in a gap buffer: edits
// cluster around one spot, so inserting or removing line records near the
// previous edit is cheap while indexed access stays O(1).
//
// The record sequence always holds `line count + 1` entries; the last entry
// is a sentinel whose start equals the total document byte length. The index
// is mutated exactly once per modification notification, before any event
// observer runs (see `events::Core::process`).

use crate::notify::{ModificationType, Notification};
use crate::position::DocumentRead;

// ── Gap buffer ────────────────────────────────────────────────────────────────

const INITIAL_GAP: usize = 16;

/// A gap buffer of `Copy` records: indexed O(1) access, O(gap-distance)
/// localized insertion and removal.
///
/// Storage layout is `[pre-gap records | gap | post-gap records]`; operations
/// at the gap are O(1) amortized, and consecutive edits to nearby indexes
/// reuse the gap position.
#[derive(Debug)]
pub(crate) struct GapBuffer<T> {
    data: Vec<T>,
    gap_start: usize,
    gap_end: usize,
}

impl<T: Copy + Default> GapBuffer<T> {
    pub(crate) fn from_vec(records: Vec<T>) -> Self {
        let len = records.len();
        let mut data = records;
        data.resize(len + INITIAL_GAP, T::default());
        Self {
            data,
            gap_start: len,
            gap_end: len + INITIAL_GAP,
        }
    }

    /// Logical record count (excluding the gap).
    pub(crate) fn len(&self) -> usize {
        self.data.len() - (self.gap_end - self.gap_start)
    }

    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + (self.gap_end - self.gap_start)
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        Some(&self.data[self.physical(index)])
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let physical = self.physical(index);
        Some(&mut self.data[physical])
    }

    /// Move the gap to sit just before logical `index`.
    fn move_gap_to(&mut self, index: usize) {
        let index = index.min(self.len());
        if index < self.gap_start {
            // Shift the records in [index, gap_start) to the far side of the gap.
            let shift = self.gap_start - index;
            self.data
                .copy_within(index..self.gap_start, self.gap_end - shift);
            self.gap_start = index;
            self.gap_end -= shift;
        } else if index > self.gap_start {
            let shift = index - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Grow the gap in place so it can hold at least `min_size` records.
    /// The gap position is preserved; `insert_slice` relies on that.
    fn ensure_gap(&mut self, min_size: usize) {
        let gap = self.gap_end - self.gap_start;
        if gap >= min_size {
            return;
        }
        let growth = (min_size - gap).max(self.data.len());
        let old_len = self.data.len();
        let post_gap = old_len - self.gap_end;
        self.data.resize(old_len + growth, T::default());
        if post_gap > 0 {
            let new_post_start = self.data.len() - post_gap;
            self.data.copy_within(self.gap_end..old_len, new_post_start);
        }
        self.gap_end = self.data.len() - post_gap;
    }

    /// Insert `records` so the first lands at logical `index`.
    pub(crate) fn insert_slice(&mut self, index: usize, records: &[T]) {
        let index = index.min(self.len());
        self.move_gap_to(index);
        self.ensure_gap(records.len());
        self.data[self.gap_start..self.gap_start + records.len()].copy_from_slice(records);
        self.gap_start += records.len();
    }

    /// Remove `count` records starting at logical `index`.
    pub(crate) fn remove_range(&mut self, index: usize, count: usize) {
        let index = index.min(self.len());
        let count = count.min(self.len() - index);
        self.move_gap_to(index);
        // The removed records are absorbed into the gap.
        self.gap_end += count;
    }
}

// ── Per-line record ───────────────────────────────────────────────────────────

/// The sole persisted per-line state: the line's starting byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PerLine {
    pub(crate) start: usize,
}

// ── Line-break scanning ───────────────────────────────────────────────────────

/// Byte offsets (relative to `base`) at which a new line starts inside `text`.
/// `\r\n` counts as one break; lone `\r` and `\n` each count as one.
pub(crate) fn scan_line_starts(text: &[u8], base: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut i = 0;
    while i < text.len() {
        match text[i] {
            b'\r' => {
                i += if text.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                starts.push(base + i);
            }
            b'\n' => {
                i += 1;
                starts.push(base + i);
            }
            _ => i += 1,
        }
    }
    starts
}

// ── Line index ────────────────────────────────────────────────────────────────

/// Maps line indexes to starting byte offsets over the live document.
///
/// Always holds at least two records: one real (possibly empty) line plus the
/// terminal sentinel, and starts are monotonically non-decreasing.
#[derive(Debug)]
pub(crate) struct LineIndex {
    per_line: GapBuffer<PerLine>,
}

impl LineIndex {
    /// An index over an empty document: one empty line plus the sentinel.
    pub(crate) fn new() -> Self {
        Self {
            per_line: GapBuffer::from_vec(vec![PerLine { start: 0 }, PerLine { start: 0 }]),
        }
    }

    fn start_of(&self, index: usize) -> usize {
        self.per_line
            .get(index)
            .map(|r| r.start)
            .unwrap_or_else(|| self.document_byte_length())
    }

    /// Number of real lines (the sentinel is not counted). Always ≥ 1.
    pub(crate) fn count(&self) -> usize {
        self.per_line.len() - 1
    }

    /// Total byte length of the document, held by the terminal sentinel.
    pub(crate) fn document_byte_length(&self) -> usize {
        self.per_line
            .get(self.per_line.len() - 1)
            .map(|r| r.start)
            .unwrap_or(0)
    }

    /// Starting byte offset of `line`. Out-of-range indexes clamp to the last
    /// real line rather than failing.
    pub(crate) fn line_start(&self, line: usize) -> usize {
        self.start_of(line.min(self.count() - 1))
    }

    /// Byte offset just past the end of `line` (the start of the next line,
    /// or the document length for the last line).
    pub(crate) fn line_end(&self, line: usize) -> usize {
        self.start_of(line.min(self.count() - 1) + 1)
    }

    /// Byte length of `line`, including its end-of-line bytes.
    pub(crate) fn line_byte_length(&self, line: usize) -> usize {
        self.line_end(line) - self.line_start(line)
    }

    /// The line whose `[start, next start)` range contains `byte_pos`.
    /// Positions at or past the document end clamp to the last real line.
    pub(crate) fn line_from_byte_position(&self, byte_pos: usize) -> usize {
        // Binary search for the first record with start > byte_pos.
        let mut left = 0;
        let mut right = self.per_line.len();
        while left < right {
            let mid = (left + right) / 2;
            if self.start_of(mid) <= byte_pos {
                left = mid + 1;
            } else {
                right = mid;
            }
        }
        left.saturating_sub(1).min(self.count() - 1)
    }

    // ── Mutation (modification-notification handler only) ─────────────────────

    /// Shift the start of every record at or after `from_line` by `delta`.
    /// The sentinel shifts with them, keeping the total length current.
    pub(crate) fn adjust_line_starts(&mut self, from_line: usize, delta: isize) {
        for i in from_line..self.per_line.len() {
            if let Some(rec) = self.per_line.get_mut(i) {
                rec.start = (rec.start as isize + delta).max(0) as usize;
            }
        }
    }

    /// Insert records for new lines after `after_line`, with the given
    /// absolute starting byte offsets.
    pub(crate) fn insert_lines(&mut self, after_line: usize, starts: &[usize]) {
        let after = after_line.min(self.count() - 1);
        let records: Vec<PerLine> = starts.iter().map(|&start| PerLine { start }).collect();
        self.per_line.insert_slice(after + 1, &records);
    }

    /// Remove `count` line records starting at `first_line`. The sentinel and
    /// at least one real line always survive.
    pub(crate) fn remove_lines(&mut self, first_line: usize, count: usize) {
        let first = first_line.min(self.count());
        let max = (self.per_line.len() - 1 - first).min(self.per_line.len() - 2);
        self.per_line.remove_range(first, count.min(max));
    }

    /// Apply one modification record. Called exactly once per `SCN_MODIFIED`
    /// notification, before any event observer may query line positions.
    pub(crate) fn scn_modified(&mut self, scn: &Notification, doc: &dyn DocumentRead) {
        let mt = ModificationType::from_bits_retain(scn.modification_type);
        let position = scn.position.max(0) as usize;
        let length = scn.length.max(0) as usize;
        if mt.contains(ModificationType::INSERT_TEXT) {
            self.track_insert_text(position, length, scn.lines_added, scn.text.as_deref(), doc);
        }
        if mt.contains(ModificationType::DELETE_TEXT) {
            self.track_delete_text(position, length, -scn.lines_added);
        }
    }

    fn track_insert_text(
        &mut self,
        position: usize,
        length: usize,
        lines_added: isize,
        text: Option<&[u8]>,
        doc: &dyn DocumentRead,
    ) {
        let line = self.line_from_byte_position(position);
        self.adjust_line_starts(line + 1, length as isize);
        if lines_added <= 0 {
            return;
        }
        let starts = text
            .map(|t| scan_line_starts(t, position))
            .unwrap_or_default();
        if starts.len() == lines_added as usize {
            self.insert_lines(line, &starts);
        } else {
            // The scan disagrees with the control: either Unicode line ends
            // are enabled, or the insertion spliced into an existing CR LF
            // pair. The document itself is authoritative; rebuild.
            log::debug!(
                "line-start scan found {} breaks but the control reported {}; rebuilding index",
                starts.len(),
                lines_added
            );
            self.rebuild_from(doc);
        }
    }

    fn track_delete_text(&mut self, position: usize, length: usize, lines_removed: isize) {
        let line = self.line_from_byte_position(position);
        if lines_removed > 0 {
            self.remove_lines(line + 1, lines_removed as usize);
        }
        self.adjust_line_starts(line + 1, -(length as isize));
    }

    /// Rescan the whole document and rebuild every record.
    pub(crate) fn rebuild_from(&mut self, doc: &dyn DocumentRead) {
        let len = doc.byte_length();
        let mut bytes = Vec::new();
        doc.read_bytes(0, len, &mut bytes);
        let mut records = vec![PerLine { start: 0 }];
        records.extend(
            scan_line_starts(&bytes, 0)
                .into_iter()
                .map(|start| PerLine { start }),
        );
        records.push(PerLine { start: len }); // sentinel
        self.per_line = GapBuffer::from_vec(records);
    }

    #[cfg(test)]
    pub(crate) fn starts(&self) -> Vec<usize> {
        (0..self.per_line.len()).map(|i| self.start_of(i)).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::fake::FakeDoc;

    fn index_for(text: &str) -> (LineIndex, FakeDoc) {
        let doc = FakeDoc::new(text);
        let mut index = LineIndex::new();
        index.rebuild_from(&doc);
        (index, doc)
    }

    fn insert_record(position: usize, text: &[u8], lines_added: isize) -> Notification {
        Notification {
            code: crate::notify::SCN_MODIFIED,
            modification_type: (ModificationType::INSERT_TEXT | ModificationType::PERFORMED_USER)
                .bits(),
            position: position as isize,
            length: text.len() as isize,
            lines_added,
            text: Some(text.to_vec()),
            ..Notification::default()
        }
    }

    fn delete_record(position: usize, length: usize, lines_added: isize) -> Notification {
        Notification {
            code: crate::notify::SCN_MODIFIED,
            modification_type: (ModificationType::DELETE_TEXT | ModificationType::PERFORMED_USER)
                .bits(),
            position: position as isize,
            length: length as isize,
            lines_added,
            ..Notification::default()
        }
    }

    // ── Gap buffer ────────────────────────────────────────────────────────────

    #[test]
    fn gap_buffer_insert_and_remove() {
        let mut buf: GapBuffer<usize> = GapBuffer::from_vec(vec![0, 10, 20]);
        buf.insert_slice(1, &[4, 7]);
        assert_eq!(buf.len(), 5);
        let all: Vec<usize> = (0..buf.len()).map(|i| *buf.get(i).unwrap()).collect();
        assert_eq!(all, vec![0, 4, 7, 10, 20]);

        buf.remove_range(1, 2);
        let all: Vec<usize> = (0..buf.len()).map(|i| *buf.get(i).unwrap()).collect();
        assert_eq!(all, vec![0, 10, 20]);
    }

    #[test]
    fn gap_buffer_grows_past_initial_capacity() {
        let mut buf: GapBuffer<usize> = GapBuffer::from_vec(Vec::new());
        for i in 0..100 {
            buf.insert_slice(i, &[i]);
        }
        assert_eq!(buf.len(), 100);
        assert_eq!(*buf.get(99).unwrap(), 99);
    }

    #[test]
    fn gap_buffer_get_out_of_range() {
        let buf: GapBuffer<usize> = GapBuffer::from_vec(vec![1]);
        assert_eq!(buf.get(1), None);
    }

    // ── Line-break scanning ───────────────────────────────────────────────────

    #[test]
    fn scan_counts_crlf_as_one_break() {
        assert_eq!(scan_line_starts(b"a\r\nb\nc\rd", 0), vec![3, 5, 7]);
    }

    #[test]
    fn scan_trailing_break() {
        assert_eq!(scan_line_starts(b"ab\n", 10), vec![13]);
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn empty_document_has_one_line_and_sentinel() {
        let index = LineIndex::new();
        assert_eq!(index.count(), 1);
        assert_eq!(index.starts(), vec![0, 0]);
        assert_eq!(index.document_byte_length(), 0);
    }

    #[test]
    fn rebuild_matches_document() {
        let (index, _) = index_for("abc\ndef\r\ngh");
        assert_eq!(index.starts(), vec![0, 4, 9, 11]);
        assert_eq!(index.count(), 3);
        assert_eq!(index.document_byte_length(), 11);
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        let (index, _) = index_for("a\n");
        assert_eq!(index.starts(), vec![0, 2, 2]);
        assert_eq!(index.line_byte_length(1), 0);
    }

    // ── line_from_byte_position ───────────────────────────────────────────────

    #[test]
    fn containment_over_every_valid_offset() {
        let (index, doc) = index_for("ab\ncd\r\ne\n");
        for p in 0..=doc.bytes.len() {
            let line = index.line_from_byte_position(p);
            let start = index.line_start(line);
            let end = index.line_end(line);
            if p == doc.bytes.len() {
                // Terminal case: clamped to the last real line.
                assert_eq!(line, index.count() - 1);
                assert!(start <= p && p <= end);
            } else {
                assert!(start <= p && p < end, "offset {p} mapped to line {line}");
            }
        }
    }

    #[test]
    fn positions_past_the_end_clamp_to_last_line() {
        let (index, _) = index_for("ab\ncd");
        assert_eq!(index.line_from_byte_position(500), 1);
    }

    #[test]
    fn line_accessors_clamp_out_of_range_indexes() {
        let (index, _) = index_for("ab\ncd");
        assert_eq!(index.line_start(17), index.line_start(1));
        assert_eq!(index.line_end(17), 5);
    }

    // ── Insert tracking ───────────────────────────────────────────────────────

    #[test]
    fn insert_without_breaks_shifts_following_lines_only() {
        let (mut index, mut doc) = index_for("abc\ndef\ngh");
        assert_eq!(index.starts(), vec![0, 4, 8, 10]);

        // Insert 3 bytes inside line 1.
        doc.insert(5, "XYZ");
        index.scn_modified(&insert_record(5, b"XYZ", 0), &doc);

        assert_eq!(index.starts(), vec![0, 4, 11, 13]);
        assert_eq!(index.document_byte_length(), 13);
    }

    #[test]
    fn insert_with_breaks_grows_index_by_lines_added() {
        let (mut index, mut doc) = index_for("abc\ndef");
        let before = index.count();

        doc.insert(1, "X\nY\nZ");
        index.scn_modified(&insert_record(1, b"X\nY\nZ", 2), &doc);

        assert_eq!(index.count(), before + 2);
        assert_eq!(index.starts(), vec![0, 3, 5, 9, 12]);
        assert_eq!(index.document_byte_length(), doc.bytes.len());
    }

    #[test]
    fn insert_at_line_start() {
        let (mut index, mut doc) = index_for("abc\ndef");
        doc.insert(4, "x\n");
        index.scn_modified(&insert_record(4, b"x\n", 1), &doc);
        assert_eq!(index.starts(), vec![0, 4, 6, 9]);
    }

    #[test]
    fn insert_at_document_end() {
        let (mut index, mut doc) = index_for("ab");
        doc.insert(2, "\nc");
        index.scn_modified(&insert_record(2, b"\nc", 1), &doc);
        assert_eq!(index.starts(), vec![0, 3, 4]);
    }

    #[test]
    fn crlf_splice_with_zero_line_delta_stays_consistent() {
        // Inserting "x\r" immediately before an existing "\n" forms a CR LF
        // pair across the boundary. The line count is unchanged and the old
        // break position shifts with the following lines, so the plain
        // adjust path already lands on the right starts.
        let (mut index, mut doc) = index_for("a\nb");
        doc.insert(1, "x\r");
        index.scn_modified(&insert_record(1, b"x\r", 0), &doc);
        assert_eq!(index.starts(), vec![0, 4, 5]);
    }

    #[test]
    fn crlf_split_falls_back_to_rebuild() {
        // Inserting between the CR and LF of an existing pair turns one line
        // end into three. The control reports linesAdded == 2 but a scan of
        // the inserted bytes alone finds a single break, so the index must
        // resync from the document.
        let (mut index, mut doc) = index_for("a\r\nb");
        assert_eq!(index.starts(), vec![0, 3, 4]);
        doc.insert(2, "x\n");
        index.scn_modified(&insert_record(2, b"x\n", 2), &doc);
        assert_eq!(index.starts(), vec![0, 2, 4, 5, 6]);
    }

    // ── Delete tracking ───────────────────────────────────────────────────────

    #[test]
    fn delete_within_line_shifts_following_lines() {
        let (mut index, mut doc) = index_for("abc\ndef");
        doc.delete(1, 2);
        index.scn_modified(&delete_record(1, 2, 0), &doc);
        assert_eq!(index.starts(), vec![0, 2, 5]);
    }

    #[test]
    fn delete_spanning_lines_removes_their_records() {
        let (mut index, mut doc) = index_for("aX\nYbc\ndef");
        assert_eq!(index.starts(), vec![0, 3, 7, 10]);

        doc.delete(1, 3);
        index.scn_modified(&delete_record(1, 3, -1), &doc);

        assert_eq!(index.starts(), vec![0, 4, 7]);
    }

    #[test]
    fn delete_whole_line_at_line_start() {
        let (mut index, mut doc) = index_for("ab\ncd\nef");
        doc.delete(3, 3);
        index.scn_modified(&delete_record(3, 3, -1), &doc);
        assert_eq!(index.starts(), vec![0, 3, 5]);
    }

    #[test]
    fn delete_joining_newline_merges_lines() {
        let (mut index, mut doc) = index_for("ab\ncd");
        doc.delete(2, 1);
        index.scn_modified(&delete_record(2, 1, -1), &doc);
        assert_eq!(index.starts(), vec![0, 4]);
        assert_eq!(index.count(), 1);
    }

    #[test]
    fn delete_everything_leaves_one_empty_line() {
        let (mut index, mut doc) = index_for("ab\ncd\nef");
        let len = doc.bytes.len();
        doc.delete(0, len);
        index.scn_modified(&delete_record(0, len, -2), &doc);
        assert_eq!(index.starts(), vec![0, 0]);
        assert_eq!(index.count(), 1);
    }

    // ── Single-byte insert ────────────────────────────────────────────────────

    #[test]
    fn single_byte_insert_keeps_line_zero_start() {
        let (mut index, mut doc) = index_for("abc");
        doc.insert(1, "X");
        index.scn_modified(&insert_record(1, b"X", 0), &doc);
        assert_eq!(index.line_start(0), 0);
        assert_eq!(index.document_byte_length(), 4);
    }
}
