// ── Scintilla message constants ───────────────────────────────────────────────
//
// Source of truth: Scintilla.h (https://www.scintilla.org/ScintillaDoc.html)
// Only the subset the crate actually sends is listed here.
// All SCI_* values are sent via scintilla_send_message(sci, SCI_*, wparam, lparam).

// ── Code page ─────────────────────────────────────────────────────────────────

/// Set the code page.  Pass `SC_CP_UTF8` as wParam.
pub const SCI_SETCODEPAGE: u32 = 2037;
/// UTF-8 code page value for `SCI_SETCODEPAGE`.
pub const SC_CP_UTF8: usize = 65001;

// ── Document content ──────────────────────────────────────────────────────────

/// Append bytes at the end of the document.  wParam=length; lParam=text ptr.
pub const SCI_ADDTEXT: u32 = 2001;
/// Insert a null-terminated string at a byte position (or the caret for -1).
pub const SCI_INSERTTEXT: u32 = 2003;
/// Delete all document text.
pub const SCI_CLEARALL: u32 = 2004;
/// Return byte count of the document (excluding null terminator).
pub const SCI_GETLENGTH: u32 = 2006;
/// Return the byte at a position (0 past the end).
pub const SCI_GETCHARAT: u32 = 2007;
/// Replace all document text.  wParam=0; lParam=null-terminated UTF-8 string.
pub const SCI_SETTEXT: u32 = 2181;
/// Copy document bytes.  wParam=buffer len (incl. null); lParam=buffer ptr.
pub const SCI_GETTEXT: u32 = 2182;
/// Append a null-terminated string without moving the caret.  wParam=length.
pub const SCI_APPENDTEXT: u32 = 2282;
/// Return a pointer into the document for a byte range.  wParam=start; lParam=len.
pub const SCI_GETRANGEPOINTER: u32 = 2643;
/// Delete a byte range.  wParam=start; lParam=len.
pub const SCI_DELETERANGE: u32 = 2645;
/// Replace the pending insertion text during an insert-check notification.
pub const SCI_CHANGEINSERTION: u32 = 2672;
/// Mark the current state as the save point.
pub const SCI_SETSAVEPOINT: u32 = 2014;
/// Return 1 when the document differs from its save point.
pub const SCI_GETMODIFY: u32 = 2159;

// ── Caret / position ──────────────────────────────────────────────────────────

/// Return the byte position of the caret.
pub const SCI_GETCURRENTPOS: u32 = 2008;
/// Return the byte position of the selection anchor.
pub const SCI_GETANCHOR: u32 = 2009;
/// Move the caret to a byte position (also scrolls into view).
pub const SCI_GOTOPOS: u32 = 2025;
/// Move the caret to the start of a line.
pub const SCI_GOTOLINE: u32 = 2024;
/// Scroll to make the caret visible.
pub const SCI_SCROLLCARET: u32 = 2169;
/// Return the visible column of a byte position (tab-aware).
pub const SCI_GETCOLUMN: u32 = 2129;

// ── Lines ─────────────────────────────────────────────────────────────────────

/// Total number of lines in the document.
pub const SCI_GETLINECOUNT: u32 = 2154;
/// Convert a byte position to a 0-based line number.
pub const SCI_LINEFROMPOSITION: u32 = 2166;
/// Byte position of the first character of a line.
pub const SCI_POSITIONFROMLINE: u32 = 2167;
/// Byte length of a line including its end-of-line bytes.
pub const SCI_LINELENGTH: u32 = 2350;

// ── Tabs ──────────────────────────────────────────────────────────────────────

/// Set the visible width of a tab in space-character units.
pub const SCI_SETTABWIDTH: u32 = 2036;
/// Return the visible width of a tab.
pub const SCI_GETTABWIDTH: u32 = 2121;

// ── EOL mode ──────────────────────────────────────────────────────────────────

/// Return the current EOL mode.
pub const SCI_GETEOLMODE: u32 = 2030;
/// Set the EOL mode.  wParam = SC_EOL_*.
pub const SCI_SETEOLMODE: u32 = 2031;
/// Convert existing EOL sequences to the mode given in wParam (SC_EOL_*).
pub const SCI_CONVERTEOLS: u32 = 2029;

/// EOL mode: Windows `\r\n`.
pub const SC_EOL_CRLF: isize = 0;
/// EOL mode: Unix `\n`.
pub const SC_EOL_LF: isize = 1;
/// EOL mode: old Mac `\r`.
pub const SC_EOL_CR: isize = 2;

// ── Selection ─────────────────────────────────────────────────────────────────

/// Set the selection anchor byte position.
pub const SCI_SETSELECTIONSTART: u32 = 2142;
/// Return the smaller of anchor and caret byte positions.
pub const SCI_GETSELECTIONSTART: u32 = 2143;
/// Set the selection caret byte position.
pub const SCI_SETSELECTIONEND: u32 = 2144;
/// Return the larger of anchor and caret byte positions.
pub const SCI_GETSELECTIONEND: u32 = 2145;
/// Set the selection anchor and caret, then scroll the caret into view.
pub const SCI_SETSEL: u32 = 2160;
/// Copy the selected text.  lParam=buffer ptr; returns byte length.
pub const SCI_GETSELTEXT: u32 = 2161;
/// Select all document text.
pub const SCI_SELECTALL: u32 = 2013;
/// Number of active selections (always at least 1).
pub const SCI_GETSELECTIONS: u32 = 2570;
/// Return 1 when every active selection is empty.
pub const SCI_GETSELECTIONEMPTY: u32 = 2650;
/// Set the index of the main selection.
pub const SCI_SETMAINSELECTION: u32 = 2574;
/// Return the index of the main selection.
pub const SCI_GETMAINSELECTION: u32 = 2575;
/// Caret byte position of selection n.
pub const SCI_GETSELECTIONNCARET: u32 = 2577;
/// Anchor byte position of selection n.
pub const SCI_GETSELECTIONNANCHOR: u32 = 2579;

// ── Undo / redo ───────────────────────────────────────────────────────────────

/// Undo the last action.
pub const SCI_UNDO: u32 = 2176;
/// Redo the last undone action.
pub const SCI_REDO: u32 = 2011;
/// Return 1 when there is an action to undo.
pub const SCI_CANUNDO: u32 = 2174;
/// Return 1 when there is an action to redo.
pub const SCI_CANREDO: u32 = 2016;
/// Discard the undo history.
pub const SCI_EMPTYUNDOBUFFER: u32 = 2175;
/// Begin a compound undo action (multiple edits become one undo step).
pub const SCI_BEGINUNDOACTION: u32 = 2078;
/// End the compound undo action started by `SCI_BEGINUNDOACTION`.
pub const SCI_ENDUNDOACTION: u32 = 2079;

// ── Read-only ─────────────────────────────────────────────────────────────────

/// Set document read-only state.  wParam = 0/1.
pub const SCI_SETREADONLY: u32 = 2171;
/// Return 1 when the document is read-only.
pub const SCI_GETREADONLY: u32 = 2140;

// ── Find / replace target ─────────────────────────────────────────────────────

/// Set the target start byte position.
pub const SCI_SETTARGETSTART: u32 = 2190;
/// Return the target start byte position.
pub const SCI_GETTARGETSTART: u32 = 2191;
/// Set the target end byte position.
pub const SCI_SETTARGETEND: u32 = 2192;
/// Return the target end byte position.
pub const SCI_GETTARGETEND: u32 = 2193;
/// Replace the target range.  wParam=length; lParam=text ptr.
pub const SCI_REPLACETARGET: u32 = 2194;
/// Search the target range.  wParam=length; lParam=text ptr.
pub const SCI_SEARCHINTARGET: u32 = 2197;
/// Set the search flags used by `SCI_SEARCHINTARGET`.
pub const SCI_SETSEARCHFLAGS: u32 = 2198;
/// Return the search flags.
pub const SCI_GETSEARCHFLAGS: u32 = 2199;

/// Match only whole words.
pub const SCFIND_WHOLEWORD: u32 = 0x2;
/// Case-sensitive matching.
pub const SCFIND_MATCHCASE: u32 = 0x4;
/// Match only word starts.
pub const SCFIND_WORDSTART: u32 = 0x0010_0000;
/// Interpret the pattern as a regular expression.
pub const SCFIND_REGEXP: u32 = 0x0020_0000;

// ── Styles ────────────────────────────────────────────────────────────────────

/// Reset all styles to the default style attributes.
pub const SCI_STYLECLEARALL: u32 = 2050;
/// Set the foreground color of a style.  wParam=style; lParam=BGR int.
pub const SCI_STYLESETFORE: u32 = 2051;
/// Set the background color of a style.
pub const SCI_STYLESETBACK: u32 = 2052;
/// Set the bold attribute of a style.
pub const SCI_STYLESETBOLD: u32 = 2053;
/// Set the italic attribute of a style.
pub const SCI_STYLESETITALIC: u32 = 2054;
/// Set the point size of a style.
pub const SCI_STYLESETSIZE: u32 = 2055;
/// Set the font name of a style.  lParam=null-terminated string.
pub const SCI_STYLESETFONT: u32 = 2056;
/// Style byte at a position.
pub const SCI_GETSTYLEAT: u32 = 2010;

/// Index of the default style.
pub const STYLE_DEFAULT: usize = 32;
/// Largest addressable style index.
pub const STYLE_MAX: usize = 255;

// ── Markers ───────────────────────────────────────────────────────────────────

/// Associate a symbol with a marker number.  wParam=marker; lParam=SC_MARK_*.
pub const SCI_MARKERDEFINE: u32 = 2040;
/// Set the foreground color of a marker.
pub const SCI_MARKERSETFORE: u32 = 2041;
/// Set the background color of a marker.
pub const SCI_MARKERSETBACK: u32 = 2042;
/// Add a marker to a line.  wParam=line; lParam=marker.  Returns a handle.
pub const SCI_MARKERADD: u32 = 2043;
/// Remove a marker from a line.
pub const SCI_MARKERDELETE: u32 = 2044;
/// Remove a marker from every line.
pub const SCI_MARKERDELETEALL: u32 = 2045;
/// Return the marker mask of a line.
pub const SCI_MARKERGET: u32 = 2046;
/// Return the next line at or after wParam carrying a marker in the mask.
pub const SCI_MARKERNEXT: u32 = 2047;

/// Largest addressable marker number.
pub const MARKER_MAX: usize = 31;

/// Marker symbol: filled circle.
pub const SC_MARK_CIRCLE: usize = 0;
/// Marker symbol: arrow.
pub const SC_MARK_ARROW: usize = 2;
/// Marker symbol: small rectangle.
pub const SC_MARK_SMALLRECT: usize = 3;
/// Marker symbol: short arrow.
pub const SC_MARK_SHORTARROW: usize = 4;
/// Marker symbol: invisible (line background still drawn).
pub const SC_MARK_EMPTY: usize = 5;
/// Marker symbol: change the line background color.
pub const SC_MARK_BACKGROUND: usize = 22;

// ── Margins ───────────────────────────────────────────────────────────────────

/// Set the type of a margin.  wParam=margin; lParam=SC_MARGIN_*.
pub const SCI_SETMARGINTYPEN: u32 = 2240;
/// Return the type of a margin.
pub const SCI_GETMARGINTYPEN: u32 = 2241;
/// Set the pixel width of a margin.
pub const SCI_SETMARGINWIDTHN: u32 = 2242;
/// Return the pixel width of a margin.
pub const SCI_GETMARGINWIDTHN: u32 = 2243;
/// Set the marker mask of a margin.
pub const SCI_SETMARGINMASKN: u32 = 2244;
/// Return the marker mask of a margin.
pub const SCI_GETMARGINMASKN: u32 = 2245;
/// Set whether a margin responds to mouse clicks.
pub const SCI_SETMARGINSENSITIVEN: u32 = 2246;
/// Return whether a margin responds to mouse clicks.
pub const SCI_GETMARGINSENSITIVEN: u32 = 2247;
/// Return the number of margins.
pub const SCI_GETMARGINS: u32 = 2253;

/// Margin type: marker symbols.
pub const SC_MARGIN_SYMBOL: isize = 0;
/// Margin type: line numbers.
pub const SC_MARGIN_NUMBER: isize = 1;
/// Margin type: drawn with the default background color.
pub const SC_MARGIN_BACK: isize = 2;
/// Margin type: drawn with the default foreground color.
pub const SC_MARGIN_FORE: isize = 3;
/// Margin type: styled text.
pub const SC_MARGIN_TEXT: isize = 4;
/// Margin type: right-justified styled text.
pub const SC_MARGIN_RTEXT: isize = 5;
/// Margin type: solid color.
pub const SC_MARGIN_COLOUR: isize = 6;

// ── Indicators ────────────────────────────────────────────────────────────────

/// Set the drawing style of an indicator.  wParam=indicator; lParam=INDIC_*.
pub const SCI_INDICSETSTYLE: u32 = 2080;
/// Return the drawing style of an indicator.
pub const SCI_INDICGETSTYLE: u32 = 2081;
/// Set the foreground color of an indicator.
pub const SCI_INDICSETFORE: u32 = 2082;
/// Return the foreground color of an indicator.
pub const SCI_INDICGETFORE: u32 = 2083;

/// Indicator style: underline.
pub const INDIC_PLAIN: isize = 0;
/// Indicator style: squiggly underline.
pub const INDIC_SQUIGGLE: isize = 1;
/// Indicator style: line of small T shapes.
pub const INDIC_TT: isize = 2;
/// Indicator style: strike-through.
pub const INDIC_STRIKE: isize = 4;
/// Indicator style: rectangle outline.
pub const INDIC_BOX: isize = 6;
/// Indicator style: translucent rounded rectangle.
pub const INDIC_ROUNDBOX: isize = 7;
/// Indicator style: translucent rectangle.
pub const INDIC_STRAIGHTBOX: isize = 8;

/// Largest addressable indicator number.
pub const INDICATOR_MAX: usize = 35;

// ── Annotations ───────────────────────────────────────────────────────────────

/// Set the annotation text of a line.  wParam=line; lParam=string (null clears).
pub const SCI_ANNOTATIONSETTEXT: u32 = 2540;
/// Copy the annotation text of a line.  Returns byte length.
pub const SCI_ANNOTATIONGETTEXT: u32 = 2541;
/// Number of annotation lines attached to a line.
pub const SCI_ANNOTATIONGETLINES: u32 = 2546;
/// Remove all annotations.
pub const SCI_ANNOTATIONCLEARALL: u32 = 2547;

// ── Zoom ──────────────────────────────────────────────────────────────────────

/// Set the zoom level in points (may be negative).
pub const SCI_SETZOOM: u32 = 2373;
/// Return the zoom level.
pub const SCI_GETZOOM: u32 = 2374;

// ── Key bindings ──────────────────────────────────────────────────────────────

/// Bind a key definition to a command.  wParam=key|mods<<16; lParam=SCI_* command.
pub const SCI_ASSIGNCMDKEY: u32 = 2070;
/// Remove the binding for a key definition.
pub const SCI_CLEARCMDKEY: u32 = 2071;

// ── Lexing ────────────────────────────────────────────────────────────────────

/// Install an ILexer5 instance created by the lexer library (null for none).
pub const SCI_SETILEXER: u32 = 4033;

// ── Misc ──────────────────────────────────────────────────────────────────────

/// Position value meaning "no position".
pub const INVALID_POSITION: isize = -1;
