// ── GDK keyval → Scintilla key code translation ───────────────────────────────
//
// Scintilla's key-binding messages use their own SCK_* codes for the keys
// where GDK keyvals differ; everything else passes through unchanged.

/// Scintilla key code: Down arrow.
pub const SCK_DOWN: u32 = 300;
/// Scintilla key code: Up arrow.
pub const SCK_UP: u32 = 301;
/// Scintilla key code: Left arrow.
pub const SCK_LEFT: u32 = 302;
/// Scintilla key code: Right arrow.
pub const SCK_RIGHT: u32 = 303;
/// Scintilla key code: Home.
pub const SCK_HOME: u32 = 304;
/// Scintilla key code: End.
pub const SCK_END: u32 = 305;
/// Scintilla key code: Page Up.
pub const SCK_PRIOR: u32 = 306;
/// Scintilla key code: Page Down.
pub const SCK_NEXT: u32 = 307;
/// Scintilla key code: Delete.
pub const SCK_DELETE: u32 = 308;
/// Scintilla key code: Insert.
pub const SCK_INSERT: u32 = 309;
/// Scintilla key code: Escape.
pub const SCK_ESCAPE: u32 = 7;
/// Scintilla key code: Backspace.
pub const SCK_BACK: u32 = 8;
/// Scintilla key code: Tab.
pub const SCK_TAB: u32 = 9;
/// Scintilla key code: Return.
pub const SCK_RETURN: u32 = 13;
/// Scintilla key code: keypad plus.
pub const SCK_ADD: u32 = 310;
/// Scintilla key code: keypad minus.
pub const SCK_SUBTRACT: u32 = 311;
/// Scintilla key code: keypad divide.
pub const SCK_DIVIDE: u32 = 312;
/// Scintilla key code: left Super/Windows key.
pub const SCK_WIN: u32 = 313;
/// Scintilla key code: right Super/Windows key.
pub const SCK_RWIN: u32 = 314;
/// Scintilla key code: Menu key.
pub const SCK_MENU: u32 = 315;

// GDK keyvals for the keys above (gdk/gdkkeysyms.h).
const GDK_KEY_DOWN: u32 = 0xFF54;
const GDK_KEY_UP: u32 = 0xFF52;
const GDK_KEY_LEFT: u32 = 0xFF51;
const GDK_KEY_RIGHT: u32 = 0xFF53;
const GDK_KEY_HOME: u32 = 0xFF50;
const GDK_KEY_END: u32 = 0xFF57;
const GDK_KEY_PRIOR: u32 = 0xFF55;
const GDK_KEY_NEXT: u32 = 0xFF56;
const GDK_KEY_DELETE: u32 = 0xFFFF;
const GDK_KEY_INSERT: u32 = 0xFF63;
const GDK_KEY_ESCAPE: u32 = 0xFF1B;
const GDK_KEY_BACKSPACE: u32 = 0xFF08;
const GDK_KEY_TAB: u32 = 0xFF09;
const GDK_KEY_RETURN: u32 = 0xFF0D;
const GDK_KEY_KP_ADD: u32 = 0xFFAB;
const GDK_KEY_KP_SUBTRACT: u32 = 0xFFAD;
const GDK_KEY_KP_DIVIDE: u32 = 0xFFAF;
const GDK_KEY_META_L: u32 = 0xFFE7;
const GDK_KEY_META_R: u32 = 0xFFE8;
const GDK_KEY_MENU: u32 = 0xFF67;

/// Translate a GDK keyval to the code Scintilla's key-binding messages use.
/// Keys without a dedicated SCK_* value pass through unchanged.
pub fn translate_keyval(keyval: u32) -> u32 {
    match keyval {
        GDK_KEY_DOWN => SCK_DOWN,
        GDK_KEY_UP => SCK_UP,
        GDK_KEY_LEFT => SCK_LEFT,
        GDK_KEY_RIGHT => SCK_RIGHT,
        GDK_KEY_HOME => SCK_HOME,
        GDK_KEY_END => SCK_END,
        GDK_KEY_PRIOR => SCK_PRIOR,
        GDK_KEY_NEXT => SCK_NEXT,
        GDK_KEY_DELETE => SCK_DELETE,
        GDK_KEY_INSERT => SCK_INSERT,
        GDK_KEY_ESCAPE => SCK_ESCAPE,
        GDK_KEY_BACKSPACE => SCK_BACK,
        GDK_KEY_TAB => SCK_TAB,
        GDK_KEY_RETURN => SCK_RETURN,
        GDK_KEY_KP_ADD => SCK_ADD,
        GDK_KEY_KP_SUBTRACT => SCK_SUBTRACT,
        GDK_KEY_KP_DIVIDE => SCK_DIVIDE,
        GDK_KEY_META_L => SCK_WIN,
        GDK_KEY_META_R => SCK_RWIN,
        GDK_KEY_MENU => SCK_MENU,
        other => other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_translate() {
        assert_eq!(translate_keyval(GDK_KEY_DOWN), SCK_DOWN);
        assert_eq!(translate_keyval(GDK_KEY_UP), SCK_UP);
        assert_eq!(translate_keyval(GDK_KEY_LEFT), SCK_LEFT);
        assert_eq!(translate_keyval(GDK_KEY_RIGHT), SCK_RIGHT);
    }

    #[test]
    fn editing_keys_translate() {
        assert_eq!(translate_keyval(GDK_KEY_BACKSPACE), SCK_BACK);
        assert_eq!(translate_keyval(GDK_KEY_DELETE), SCK_DELETE);
        assert_eq!(translate_keyval(GDK_KEY_RETURN), SCK_RETURN);
        assert_eq!(translate_keyval(GDK_KEY_TAB), SCK_TAB);
    }

    #[test]
    fn plain_characters_pass_through() {
        assert_eq!(translate_keyval('a' as u32), 'a' as u32);
        assert_eq!(translate_keyval('/' as u32), '/' as u32);
    }
}
