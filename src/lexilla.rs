// ── Lexilla lexer library ─────────────────────────────────────────────────────
//
// Scintilla 5 moved lexing into the separate Lexilla library; installing a
// lexer means asking Lexilla for an ILexer5 instance and handing the pointer
// to SCI_SETILEXER. The library is a collaborator injected into the widget at
// construction time, so embeddings can substitute their own lexer source (or
// none) without a process-global singleton.

#![allow(unsafe_code)]

use libc::{c_char, c_int, c_uint, c_void};
use std::ffi::{CStr, CString};

/// Source of native lexer instances for `ScintillaEdit::set_lexer_language`.
pub trait LexerLibrary {
    /// Number of lexers the library provides.
    fn lexer_count(&self) -> usize;

    /// Name of the lexer at `index`, or an empty string out of range.
    fn lexer_name(&self, index: usize) -> String;

    /// A new ILexer5 instance for `name`, or null when unknown.
    fn create_lexer(&self, name: &str) -> *mut c_void;
}

#[link(name = "lexilla")]
extern "C" {
    fn CreateLexer(name: *const c_char) -> *mut c_void;
    fn GetLexerCount() -> c_int;
    fn GetLexerName(index: c_uint, name: *mut c_char, buf_length: c_int);
}

/// The stock `liblexilla` shipped alongside Scintilla.
#[derive(Debug, Default)]
pub struct Lexilla;

impl LexerLibrary for Lexilla {
    fn lexer_count(&self) -> usize {
        // SAFETY: GetLexerCount takes no arguments and only reads the
        // library's static lexer catalogue.
        let count = unsafe { GetLexerCount() };
        count.max(0) as usize
    }

    fn lexer_name(&self, index: usize) -> String {
        let mut buf = [0 as c_char; 1024];
        // SAFETY: buf is a writable 1024-byte buffer and its length is passed
        // alongside; Lexilla null-terminates within the given length and
        // writes nothing for an out-of-range index (buf stays zeroed).
        unsafe {
            GetLexerName(index as c_uint, buf.as_mut_ptr(), buf.len() as c_int);
        }
        // SAFETY: buf is null-terminated (written by Lexilla or still zeroed).
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        name.to_string_lossy().into_owned()
    }

    fn create_lexer(&self, name: &str) -> *mut c_void {
        let Ok(name) = CString::new(name) else {
            return std::ptr::null_mut();
        };
        // SAFETY: name is a valid null-terminated string that outlives the
        // call; CreateLexer returns null for unknown names.
        unsafe { CreateLexer(name.as_ptr()) }
    }
}

/// A lexer library with no lexers; useful for embeddings that style text
/// themselves through the style-needed event.
#[derive(Debug, Default)]
pub struct NoLexers;

impl LexerLibrary for NoLexers {
    fn lexer_count(&self) -> usize {
        0
    }

    fn lexer_name(&self, _index: usize) -> String {
        String::new()
    }

    fn create_lexer(&self, _name: &str) -> *mut c_void {
        std::ptr::null_mut()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_lexers_is_empty() {
        let lib = NoLexers;
        assert_eq!(lib.lexer_count(), 0);
        assert_eq!(lib.lexer_name(0), "");
        assert!(lib.create_lexer("cpp").is_null());
    }
}
