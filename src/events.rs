// ── Typed event decoding and dispatch ─────────────────────────────────────────
//
// The native control reports everything through one polymorphic record; this
// module demultiplexes it into one typed event per notification kind and
// invokes the registered subscribers. Dispatch is synchronous and
// single-threaded: the control calls in on its own GTK main-loop thread, and
// everything here is call-and-return translation at a point the control
// chooses.
//
// The insert-check, before-insert/delete and insert/delete phases of a single
// edit all need the same byte-to-char conversion and text decoding. That work
// is done once, cached in `PendingEdit`, carried between the phases, and
// cleared unconditionally when the insert/delete phase fires — whether or not
// anything consumed it. A kind with zero subscribers still runs the full
// decode so those cache side effects happen; only the invoke loop is empty.

use std::cell::{Cell, RefCell};

use crate::lines::LineIndex;
use crate::notify::{
    CallTipArrow, KeyMod, ListCompletionMethod, ModificationSource, ModificationType,
    Notification, UpdateChange, SCN_AUTOCCANCELLED, SCN_AUTOCCHARDELETED, SCN_AUTOCCOMPLETED,
    SCN_AUTOCSELECTION, SCN_CALLTIPCLICK, SCN_CHARADDED, SCN_DOUBLECLICK, SCN_DWELLEND,
    SCN_DWELLSTART, SCN_HOTSPOTCLICK, SCN_HOTSPOTDOUBLECLICK, SCN_HOTSPOTRELEASECLICK,
    SCN_INDICATORCLICK, SCN_INDICATORRELEASE, SCN_KEY, SCN_LAST, SCN_MARGINCLICK,
    SCN_MARGINRIGHTCLICK, SCN_MODIFIED, SCN_MODIFYATTEMPTRO, SCN_NEEDSHOWN, SCN_PAINTED,
    SCN_SAVEPOINTLEFT, SCN_SAVEPOINTREACHED, SCN_STYLENEEDED, SCN_UPDATEUI, SCN_ZOOM,
    VIRTUAL_KEYVAL_FLOOR,
};
use crate::position::{DocumentRead, PositionTranslator};

// ── Event payloads ────────────────────────────────────────────────────────────
//
// Every payload is built fresh per dispatch, carries already-translated
// character positions, and is dropped when the dispatch returns.

/// A user insertion is about to happen and may be inspected.
///
/// Clearing `accept` is advisory: the dispatcher records the veto for the
/// embedding application to read back but does not abort the native edit.
/// A handler that wants a hard veto calls `ScintillaEdit::change_insertion`
/// (or undoes the edit) itself.
#[derive(Debug)]
pub struct InsertCheckEvent {
    /// Character position of the pending insertion.
    pub position: usize,
    /// Text about to be inserted.
    pub text: String,
    /// Set to `false` to signal a veto to the embedding application.
    pub accept: bool,
}

impl InsertCheckEvent {
    /// Convenience for `self.accept = false`.
    pub fn reject(&mut self) {
        self.accept = false;
    }
}

/// Text is about to be inserted into or deleted from the document.
#[derive(Debug)]
pub struct BeforeModificationEvent {
    /// Where the change originated.
    pub source: ModificationSource,
    /// Character position of the change.
    pub position: usize,
    /// Text being inserted or deleted.
    pub text: String,
}

/// Text was inserted into or deleted from the document.
#[derive(Debug)]
pub struct ModificationEvent {
    /// Where the change originated.
    pub source: ModificationSource,
    /// Character position of the change.
    pub position: usize,
    /// Text that was inserted or deleted.
    pub text: String,
    /// Number of lines added (negative for deletions).
    pub lines_added: isize,
}

/// A line annotation changed.
#[derive(Debug)]
pub struct ChangeAnnotationEvent {
    /// The annotated line.
    pub line: usize,
}

/// A printable character was added to the document.
#[derive(Debug)]
pub struct CharAddedEvent {
    /// The character typed.
    pub ch: char,
}

/// A sensitive margin was clicked.
#[derive(Debug)]
pub struct MarginClickEvent {
    /// Modifier keys held during the click.
    pub modifiers: KeyMod,
    /// Character position where the clicked line starts.
    pub position: usize,
    /// Index of the clicked margin.
    pub margin: usize,
}

/// The editor surface was double-clicked.
#[derive(Debug)]
pub struct DoubleClickEvent {
    /// Modifier keys held during the click.
    pub modifiers: KeyMod,
    /// Character position of the click.
    pub position: usize,
    /// Line that was clicked.
    pub line: usize,
}

/// Hotspot-styled text was clicked, double-clicked or released.
#[derive(Debug)]
pub struct HotspotClickEvent {
    /// Modifier keys held during the click.
    pub modifiers: KeyMod,
    /// Character position of the click.
    pub position: usize,
}

/// Indicator-decorated text was clicked.
#[derive(Debug)]
pub struct IndicatorClickEvent {
    /// Modifier keys held during the click.
    pub modifiers: KeyMod,
    /// Character position of the click.
    pub position: usize,
}

/// The mouse was released over indicator-decorated text.
#[derive(Debug)]
pub struct IndicatorReleaseEvent {
    /// Character position of the release.
    pub position: usize,
}

/// The mouse started or stopped dwelling at one spot.
#[derive(Debug)]
pub struct DwellEvent {
    /// Character position near the pointer, or `None` when not over text.
    pub position: Option<usize>,
    /// Window x coordinate of the pointer.
    pub x: i32,
    /// Window y coordinate of the pointer.
    pub y: i32,
}

/// An auto-completion item was selected or committed.
#[derive(Debug)]
pub struct AutoCSelectionEvent {
    /// Character position where the completion started.
    pub position: usize,
    /// Text of the selected item.
    pub text: String,
    /// The fill-up character that triggered the completion, if any.
    pub ch: Option<char>,
    /// How the selection was committed.
    pub method: ListCompletionMethod,
}

/// Content, styling, selection or scroll position changed.
#[derive(Debug)]
pub struct UpdateUiEvent {
    /// What changed.
    pub change: UpdateChange,
}

/// The container must style a range of text.
#[derive(Debug)]
pub struct StyleNeededEvent {
    /// Character position up to which styling is needed.
    pub position: usize,
}

/// A hidden range must be made visible.
#[derive(Debug)]
pub struct NeedShownEvent {
    /// Character position of the start of the range.
    pub position: usize,
    /// Character length of the range.
    pub length: usize,
}

/// The call tip was clicked.
#[derive(Debug)]
pub struct CallTipClickEvent {
    /// Which arrow, if any, was clicked.
    pub arrow: CallTipArrow,
}

// ── Pending-edit cache ────────────────────────────────────────────────────────

/// Conversion results shared between the phases of one logical edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingEdit {
    pub(crate) position: usize,
    pub(crate) text: String,
}

// ── Subscriber registry ───────────────────────────────────────────────────────

type HandlerList<E> = RefCell<Vec<Box<dyn FnMut(&mut E)>>>;
type UnitHandlerList = RefCell<Vec<Box<dyn FnMut()>>>;
type RawHandlerList = RefCell<Vec<Box<dyn FnMut(&Notification)>>>;

/// Invoke every handler in registration order.
///
/// The list is swapped out while running so a handler may register further
/// handlers; anything added mid-dispatch is appended after the existing list
/// and first fires on the next dispatch.
fn raise<E>(list: &HandlerList<E>, ev: &mut E) {
    let mut handlers = list.take();
    for handler in handlers.iter_mut() {
        handler(ev);
    }
    let mut added = list.take();
    handlers.append(&mut added);
    list.replace(handlers);
}

fn raise_unit(list: &UnitHandlerList) {
    let mut handlers = list.take();
    for handler in handlers.iter_mut() {
        handler();
    }
    let mut added = list.take();
    handlers.append(&mut added);
    list.replace(handlers);
}

fn raise_raw(list: &RawHandlerList, scn: &Notification) {
    let mut handlers = list.take();
    for handler in handlers.iter_mut() {
        handler(scn);
    }
    let mut added = list.take();
    handlers.append(&mut added);
    list.replace(handlers);
}

/// Per-kind subscriber lists plus the cross-event state the dispatcher owns.
///
/// Unbounded observers, invoked in registration order, no priority.
#[derive(Default)]
pub struct Events {
    notification: RawHandlerList,
    insert_check: HandlerList<InsertCheckEvent>,
    before_insert: HandlerList<BeforeModificationEvent>,
    before_delete: HandlerList<BeforeModificationEvent>,
    insert: HandlerList<ModificationEvent>,
    delete: HandlerList<ModificationEvent>,
    change_annotation: HandlerList<ChangeAnnotationEvent>,
    char_added: HandlerList<CharAddedEvent>,
    margin_click: HandlerList<MarginClickEvent>,
    margin_right_click: HandlerList<MarginClickEvent>,
    double_click: HandlerList<DoubleClickEvent>,
    hotspot_click: HandlerList<HotspotClickEvent>,
    hotspot_double_click: HandlerList<HotspotClickEvent>,
    hotspot_release_click: HandlerList<HotspotClickEvent>,
    indicator_click: HandlerList<IndicatorClickEvent>,
    indicator_release: HandlerList<IndicatorReleaseEvent>,
    dwell_start: HandlerList<DwellEvent>,
    dwell_end: HandlerList<DwellEvent>,
    autoc_selection: HandlerList<AutoCSelectionEvent>,
    autoc_completed: HandlerList<AutoCSelectionEvent>,
    autoc_cancelled: UnitHandlerList,
    autoc_char_deleted: UnitHandlerList,
    update_ui: HandlerList<UpdateUiEvent>,
    style_needed: HandlerList<StyleNeededEvent>,
    needs_shown: HandlerList<NeedShownEvent>,
    call_tip_click: HandlerList<CallTipClickEvent>,
    save_point_reached: UnitHandlerList,
    save_point_left: UnitHandlerList,
    modify_attempt: UnitHandlerList,
    zoom_changed: UnitHandlerList,
    painted: UnitHandlerList,

    pending: RefCell<Option<PendingEdit>>,
    insert_check_rejected: Cell<bool>,
}

impl Events {
    /// Subscribe to every recognised notification, receiving the raw decoded
    /// snapshot before the typed event fires.
    pub fn on_notification(&self, f: impl FnMut(&Notification) + 'static) {
        self.notification.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to insert-check (a user insertion may be inspected).
    pub fn on_insert_check(&self, f: impl FnMut(&mut InsertCheckEvent) + 'static) {
        self.insert_check.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to before-insert.
    pub fn on_before_insert(&self, f: impl FnMut(&mut BeforeModificationEvent) + 'static) {
        self.before_insert.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to before-delete.
    pub fn on_before_delete(&self, f: impl FnMut(&mut BeforeModificationEvent) + 'static) {
        self.before_delete.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to insert (text was inserted).
    pub fn on_insert(&self, f: impl FnMut(&mut ModificationEvent) + 'static) {
        self.insert.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to delete (text was deleted).
    pub fn on_delete(&self, f: impl FnMut(&mut ModificationEvent) + 'static) {
        self.delete.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to annotation changes.
    pub fn on_change_annotation(&self, f: impl FnMut(&mut ChangeAnnotationEvent) + 'static) {
        self.change_annotation.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to char-added.
    pub fn on_char_added(&self, f: impl FnMut(&mut CharAddedEvent) + 'static) {
        self.char_added.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to margin clicks.
    pub fn on_margin_click(&self, f: impl FnMut(&mut MarginClickEvent) + 'static) {
        self.margin_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to margin right-clicks.
    pub fn on_margin_right_click(&self, f: impl FnMut(&mut MarginClickEvent) + 'static) {
        self.margin_right_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to double-clicks.
    pub fn on_double_click(&self, f: impl FnMut(&mut DoubleClickEvent) + 'static) {
        self.double_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to hotspot clicks.
    pub fn on_hotspot_click(&self, f: impl FnMut(&mut HotspotClickEvent) + 'static) {
        self.hotspot_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to hotspot double-clicks.
    pub fn on_hotspot_double_click(&self, f: impl FnMut(&mut HotspotClickEvent) + 'static) {
        self.hotspot_double_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to hotspot release-clicks.
    pub fn on_hotspot_release_click(&self, f: impl FnMut(&mut HotspotClickEvent) + 'static) {
        self.hotspot_release_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to indicator clicks.
    pub fn on_indicator_click(&self, f: impl FnMut(&mut IndicatorClickEvent) + 'static) {
        self.indicator_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to indicator releases.
    pub fn on_indicator_release(&self, f: impl FnMut(&mut IndicatorReleaseEvent) + 'static) {
        self.indicator_release.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to dwell-start.
    pub fn on_dwell_start(&self, f: impl FnMut(&mut DwellEvent) + 'static) {
        self.dwell_start.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to dwell-end.
    pub fn on_dwell_end(&self, f: impl FnMut(&mut DwellEvent) + 'static) {
        self.dwell_end.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to auto-completion selection.
    pub fn on_autoc_selection(&self, f: impl FnMut(&mut AutoCSelectionEvent) + 'static) {
        self.autoc_selection.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to auto-completion completion.
    pub fn on_autoc_completed(&self, f: impl FnMut(&mut AutoCSelectionEvent) + 'static) {
        self.autoc_completed.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to auto-completion cancellation.
    pub fn on_autoc_cancelled(&self, f: impl FnMut() + 'static) {
        self.autoc_cancelled.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to auto-completion char-deleted.
    pub fn on_autoc_char_deleted(&self, f: impl FnMut() + 'static) {
        self.autoc_char_deleted.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to update-UI.
    pub fn on_update_ui(&self, f: impl FnMut(&mut UpdateUiEvent) + 'static) {
        self.update_ui.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to style-needed.
    pub fn on_style_needed(&self, f: impl FnMut(&mut StyleNeededEvent) + 'static) {
        self.style_needed.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to needs-shown.
    pub fn on_needs_shown(&self, f: impl FnMut(&mut NeedShownEvent) + 'static) {
        self.needs_shown.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to call-tip clicks.
    pub fn on_call_tip_click(&self, f: impl FnMut(&mut CallTipClickEvent) + 'static) {
        self.call_tip_click.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to save-point-reached.
    pub fn on_save_point_reached(&self, f: impl FnMut() + 'static) {
        self.save_point_reached.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to save-point-left.
    pub fn on_save_point_left(&self, f: impl FnMut() + 'static) {
        self.save_point_left.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to modify-attempt (edit attempted on a read-only document).
    pub fn on_modify_attempt(&self, f: impl FnMut() + 'static) {
        self.modify_attempt.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to zoom changes.
    pub fn on_zoom_changed(&self, f: impl FnMut() + 'static) {
        self.zoom_changed.borrow_mut().push(Box::new(f));
    }

    /// Subscribe to painted.
    pub fn on_painted(&self, f: impl FnMut() + 'static) {
        self.painted.borrow_mut().push(Box::new(f));
    }

    /// Whether a subscriber vetoed the most recent insert-check. Advisory
    /// only; the native edit proceeds unless the embedding intervenes.
    pub fn last_insert_check_rejected(&self) -> bool {
        self.insert_check_rejected.get()
    }
}

// ── Core ──────────────────────────────────────────────────────────────────────

/// The offset index plus the event machinery: everything the notify callback
/// touches. Owned behind `Rc` by the widget; tests drive it directly with a
/// fake document.
pub(crate) struct Core {
    pub(crate) lines: RefCell<LineIndex>,
    pub(crate) events: Events,
}

impl Core {
    pub(crate) fn new() -> Self {
        Self {
            lines: RefCell::new(LineIndex::new()),
            events: Events::default(),
        }
    }

    fn to_char(&self, doc: &dyn DocumentRead, byte_pos: isize) -> usize {
        let lines = self.lines.borrow();
        PositionTranslator::new(&lines, doc).byte_to_char(byte_pos.max(0) as usize)
    }

    /// Decode one notification snapshot and dispatch the matching typed
    /// event(s). Unrecognised codes are dropped; that is "no subscriber
    /// interested", not an error.
    pub(crate) fn process(&self, scn: &Notification, doc: &dyn DocumentRead) {
        if !(SCN_STYLENEEDED..=SCN_LAST).contains(&scn.code) {
            log::trace!("dropping notification with unrecognised code {}", scn.code);
            return;
        }

        // The offset index is the source of truth for line boundaries and is
        // mutated exactly once, here, before any observer can query it.
        if scn.code == SCN_MODIFIED {
            self.lines.borrow_mut().scn_modified(scn, doc);
        }

        raise_raw(&self.events.notification, scn);

        match scn.code {
            SCN_MODIFIED => self.modified_events(scn, doc),

            SCN_PAINTED => raise_unit(&self.events.painted),
            SCN_MODIFYATTEMPTRO => raise_unit(&self.events.modify_attempt),
            SCN_SAVEPOINTLEFT => raise_unit(&self.events.save_point_left),
            SCN_SAVEPOINTREACHED => raise_unit(&self.events.save_point_reached),
            SCN_ZOOM => raise_unit(&self.events.zoom_changed),
            SCN_AUTOCCANCELLED => raise_unit(&self.events.autoc_cancelled),
            SCN_AUTOCCHARDELETED => raise_unit(&self.events.autoc_char_deleted),

            SCN_STYLENEEDED => {
                let mut ev = StyleNeededEvent {
                    position: self.to_char(doc, scn.position),
                };
                raise(&self.events.style_needed, &mut ev);
            }

            SCN_CHARADDED | SCN_KEY => {
                // GDK reports some non-character virtual keys through this
                // channel; suppress anything in the reserved keyval range.
                if scn.ch != 0 && scn.ch < VIRTUAL_KEYVAL_FLOOR {
                    if let Some(ch) = char::from_u32(scn.ch as u32) {
                        let mut ev = CharAddedEvent { ch };
                        raise(&self.events.char_added, &mut ev);
                    }
                }
            }

            SCN_MARGINCLICK | SCN_MARGINRIGHTCLICK => {
                let mut ev = MarginClickEvent {
                    modifiers: KeyMod::from_bits_retain(scn.modifiers.max(0) as u32),
                    position: self.to_char(doc, scn.position),
                    margin: scn.margin.max(0) as usize,
                };
                if scn.code == SCN_MARGINCLICK {
                    raise(&self.events.margin_click, &mut ev);
                } else {
                    raise(&self.events.margin_right_click, &mut ev);
                }
            }

            SCN_UPDATEUI => {
                let mut ev = UpdateUiEvent {
                    change: UpdateChange::from_bits_retain(scn.updated),
                };
                raise(&self.events.update_ui, &mut ev);
            }

            SCN_DOUBLECLICK => {
                let mut ev = DoubleClickEvent {
                    modifiers: KeyMod::from_bits_retain(scn.modifiers.max(0) as u32),
                    position: self.to_char(doc, scn.position),
                    line: scn.line.max(0) as usize,
                };
                raise(&self.events.double_click, &mut ev);
            }

            SCN_HOTSPOTCLICK | SCN_HOTSPOTDOUBLECLICK | SCN_HOTSPOTRELEASECLICK => {
                let mut ev = HotspotClickEvent {
                    modifiers: KeyMod::from_bits_retain(scn.modifiers.max(0) as u32),
                    position: self.to_char(doc, scn.position),
                };
                match scn.code {
                    SCN_HOTSPOTCLICK => raise(&self.events.hotspot_click, &mut ev),
                    SCN_HOTSPOTDOUBLECLICK => raise(&self.events.hotspot_double_click, &mut ev),
                    _ => raise(&self.events.hotspot_release_click, &mut ev),
                }
            }

            SCN_INDICATORCLICK => {
                let mut ev = IndicatorClickEvent {
                    modifiers: KeyMod::from_bits_retain(scn.modifiers.max(0) as u32),
                    position: self.to_char(doc, scn.position),
                };
                raise(&self.events.indicator_click, &mut ev);
            }

            SCN_INDICATORRELEASE => {
                let mut ev = IndicatorReleaseEvent {
                    position: self.to_char(doc, scn.position),
                };
                raise(&self.events.indicator_release, &mut ev);
            }

            SCN_DWELLSTART | SCN_DWELLEND => {
                let mut ev = DwellEvent {
                    position: if scn.position < 0 {
                        None
                    } else {
                        Some(self.to_char(doc, scn.position))
                    },
                    x: scn.x,
                    y: scn.y,
                };
                if scn.code == SCN_DWELLSTART {
                    raise(&self.events.dwell_start, &mut ev);
                } else {
                    raise(&self.events.dwell_end, &mut ev);
                }
            }

            SCN_AUTOCSELECTION | SCN_AUTOCCOMPLETED => {
                let mut ev = AutoCSelectionEvent {
                    position: self.to_char(doc, scn.position),
                    text: scn.decoded_text(),
                    ch: if scn.ch == 0 {
                        None
                    } else {
                        char::from_u32(scn.ch as u32)
                    },
                    method: ListCompletionMethod::from_raw(scn.list_completion_method),
                };
                if scn.code == SCN_AUTOCSELECTION {
                    raise(&self.events.autoc_selection, &mut ev);
                } else {
                    raise(&self.events.autoc_completed, &mut ev);
                }
            }

            SCN_NEEDSHOWN => {
                let position = self.to_char(doc, scn.position);
                let end = self.to_char(doc, scn.position + scn.length.max(0));
                let mut ev = NeedShownEvent {
                    position,
                    length: end - position,
                };
                raise(&self.events.needs_shown, &mut ev);
            }

            SCN_CALLTIPCLICK => {
                let mut ev = CallTipClickEvent {
                    arrow: CallTipArrow::from_position(scn.position),
                };
                raise(&self.events.call_tip_click, &mut ev);
            }

            // Recognised codes with no typed event (focus, macro recording,
            // user lists, URI drops, auto-completion highlight changes) stop
            // at the raw notification above.
            _ => {}
        }
    }

    /// Phase order within one modified record is fixed: insert-check, then
    /// before-insert xor before-delete, then insert xor delete, then
    /// annotation-change. Later phases depend on cache state written by
    /// earlier phases of the same record.
    fn modified_events(&self, scn: &Notification, doc: &dyn DocumentRead) {
        let mt = ModificationType::from_bits_retain(scn.modification_type);

        if mt.contains(ModificationType::INSERT_CHECK) {
            let mut ev = InsertCheckEvent {
                position: self.to_char(doc, scn.position),
                text: scn.decoded_text(),
                accept: true,
            };
            raise(&self.events.insert_check, &mut ev);
            self.events.insert_check_rejected.set(!ev.accept);
            *self.events.pending.borrow_mut() = Some(PendingEdit {
                position: ev.position,
                text: ev.text,
            });
        }

        let source = ModificationSource::from_mask(scn.modification_type);

        if mt.intersects(ModificationType::BEFORE_INSERT | ModificationType::BEFORE_DELETE) {
            let (position, text) = self.pending_or_compute(scn, doc);
            let mut ev = BeforeModificationEvent {
                source,
                position,
                text,
            };
            if mt.contains(ModificationType::BEFORE_INSERT) {
                raise(&self.events.before_insert, &mut ev);
            } else {
                raise(&self.events.before_delete, &mut ev);
            }
            *self.events.pending.borrow_mut() = Some(PendingEdit {
                position: ev.position,
                text: ev.text,
            });
        }

        if mt.intersects(ModificationType::INSERT_TEXT | ModificationType::DELETE_TEXT) {
            let (position, text) = self.pending_or_compute(scn, doc);
            let mut ev = ModificationEvent {
                source,
                position,
                text,
                lines_added: scn.lines_added,
            };
            if mt.contains(ModificationType::INSERT_TEXT) {
                raise(&self.events.insert, &mut ev);
            } else {
                raise(&self.events.delete, &mut ev);
            }
            // Always clear the cache, whether or not this phase consumed it.
            self.events.pending.borrow_mut().take();
        }

        if mt.contains(ModificationType::CHANGE_ANNOTATION) {
            let mut ev = ChangeAnnotationEvent {
                line: scn.line.max(0) as usize,
            };
            raise(&self.events.change_annotation, &mut ev);
        }
    }

    /// The cached (position, text) pair from an earlier phase of this edit,
    /// or the conversions done now if no phase cached them yet.
    fn pending_or_compute(&self, scn: &Notification, doc: &dyn DocumentRead) -> (usize, String) {
        if let Some(pending) = &*self.events.pending.borrow() {
            return (pending.position, pending.text.clone());
        }
        let position = self.to_char(doc, scn.position);
        let text = if scn.text.is_some() {
            scn.decoded_text()
        } else {
            // Before-delete records may omit the text; read the doomed range
            // from the document instead.
            let start = scn.position.max(0) as usize;
            let end = (start + scn.length.max(0) as usize).min(doc.byte_length());
            let mut buf = Vec::new();
            doc.read_bytes(start, end, &mut buf);
            String::from_utf8(buf).unwrap_or_default()
        };
        (position, text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SCN_FOCUSIN;
    use crate::position::fake::FakeDoc;
    use std::rc::Rc;

    fn core_for(text: &str) -> (Core, FakeDoc) {
        let doc = FakeDoc::new(text);
        let core = Core::new();
        core.lines.borrow_mut().rebuild_from(&doc);
        (core, doc)
    }

    fn insert_record(position: usize, text: &str, lines_added: isize) -> Notification {
        Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::INSERT_TEXT | ModificationType::PERFORMED_USER)
                .bits(),
            position: position as isize,
            length: text.len() as isize,
            lines_added,
            text: Some(text.as_bytes().to_vec()),
            ..Notification::default()
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    // ── End-to-end: "abc", insert "X" at byte 1 ───────────────────────────────

    #[test]
    fn simple_insert_updates_index_and_raises_insert() {
        let (core, mut doc) = core_for("abc");
        {
            let lines = core.lines.borrow();
            let tr = PositionTranslator::new(&lines, &doc);
            assert_eq!(tr.char_at(1), 'b');
        }

        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_insert(move |e| {
            s.borrow_mut()
                .push(format!("insert {} {:?} {}", e.position, e.text, e.lines_added));
        });

        doc.insert(1, "X");
        core.process(&insert_record(1, "X", 0), &doc);

        assert_eq!(*seen.borrow(), vec!["insert 1 \"X\" 0"]);
        let lines = core.lines.borrow();
        assert_eq!(lines.line_start(0), 0);
        assert_eq!(lines.document_byte_length(), 4);
        let tr = PositionTranslator::new(&lines, &doc);
        assert_eq!(tr.char_at(1), 'X');
    }

    // ── Phase order and cache sharing ─────────────────────────────────────────

    #[test]
    fn combined_record_fires_phases_in_order_with_shared_cache() {
        let (core, mut doc) = core_for("aé");

        let seen = log();
        let s1 = Rc::clone(&seen);
        core.events.on_insert_check(move |e| {
            s1.borrow_mut()
                .push(format!("check {} {:?}", e.position, e.text));
        });
        let s2 = Rc::clone(&seen);
        core.events.on_before_insert(move |e| {
            s2.borrow_mut()
                .push(format!("before {} {:?}", e.position, e.text));
        });
        let s3 = Rc::clone(&seen);
        core.events.on_insert(move |e| {
            s3.borrow_mut()
                .push(format!("insert {} {:?}", e.position, e.text));
        });

        // One record carrying all three phases, inserting "Z" after "aé":
        // byte position 3 is character position 2.
        doc.insert(3, "Z");
        let scn = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::INSERT_CHECK
                | ModificationType::BEFORE_INSERT
                | ModificationType::INSERT_TEXT
                | ModificationType::PERFORMED_USER)
                .bits(),
            position: 3,
            length: 1,
            text: Some(b"Z".to_vec()),
            ..Notification::default()
        };
        core.process(&scn, &doc);

        assert_eq!(
            *seen.borrow(),
            vec!["check 2 \"Z\"", "before 2 \"Z\"", "insert 2 \"Z\""]
        );
        // The cache is cleared once the insert phase fires.
        assert!(core.events.pending.borrow().is_none());
    }

    #[test]
    fn before_phase_caches_for_the_insert_record() {
        let (core, mut doc) = core_for("é");

        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_before_insert(move |e| {
            s.borrow_mut().push(format!("before {}", e.position));
        });

        // Before-insert fires pre-edit; position byte 2 is char 1.
        let before = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::BEFORE_INSERT | ModificationType::PERFORMED_USER)
                .bits(),
            position: 2,
            length: 1,
            text: Some(b"x".to_vec()),
            ..Notification::default()
        };
        core.process(&before, &doc);
        assert_eq!(
            *core.events.pending.borrow(),
            Some(PendingEdit {
                position: 1,
                text: "x".into()
            })
        );

        let s = Rc::clone(&seen);
        core.events.on_insert(move |e| {
            s.borrow_mut().push(format!("insert {}", e.position));
        });
        doc.insert(2, "x");
        core.process(&insert_record(2, "x", 0), &doc);

        assert_eq!(*seen.borrow(), vec!["before 1", "insert 1"]);
        assert!(core.events.pending.borrow().is_none());
    }

    #[test]
    fn cache_side_effects_survive_with_zero_subscribers() {
        let (core, mut doc) = core_for("ab");

        let check = Notification {
            code: SCN_MODIFIED,
            modification_type: ModificationType::INSERT_CHECK.bits(),
            position: 1,
            length: 1,
            text: Some(b"Q".to_vec()),
            ..Notification::default()
        };
        core.process(&check, &doc);
        assert!(core.events.pending.borrow().is_some());

        doc.insert(1, "Q");
        core.process(&insert_record(1, "Q", 0), &doc);
        assert!(core.events.pending.borrow().is_none());
    }

    #[test]
    fn delete_uses_state_cached_before_the_edit() {
        let (core, mut doc) = core_for("héllo");

        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_before_delete(move |e| {
            s.borrow_mut()
                .push(format!("before-delete {} {:?}", e.position, e.text));
        });
        let s = Rc::clone(&seen);
        core.events.on_delete(move |e| {
            s.borrow_mut()
                .push(format!("delete {} {:?}", e.position, e.text));
        });

        // Delete "éll" — bytes [1, 5), chars [1, 4). The before record omits
        // the text pointer, so it is read from the still-intact document.
        let before = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::BEFORE_DELETE | ModificationType::PERFORMED_USER)
                .bits(),
            position: 1,
            length: 4,
            ..Notification::default()
        };
        core.process(&before, &doc);

        doc.delete(1, 4);
        let deleted = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::DELETE_TEXT | ModificationType::PERFORMED_USER)
                .bits(),
            position: 1,
            length: 4,
            ..Notification::default()
        };
        core.process(&deleted, &doc);

        assert_eq!(
            *seen.borrow(),
            vec!["before-delete 1 \"éll\"", "delete 1 \"éll\""]
        );
        assert!(core.events.pending.borrow().is_none());
    }

    #[test]
    fn source_of_change_reaches_modification_payloads() {
        let (core, mut doc) = core_for("ab");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_delete(move |e| {
            s.borrow_mut().push(format!("{:?}", e.source));
        });

        doc.delete(0, 1);
        let scn = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::DELETE_TEXT
                | ModificationType::PERFORMED_UNDO
                | ModificationType::LAST_STEP_IN_UNDO_REDO)
                .bits(),
            position: 0,
            length: 1,
            text: Some(b"a".to_vec()),
            ..Notification::default()
        };
        core.process(&scn, &doc);
        assert_eq!(*seen.borrow(), vec!["Undo"]);
    }

    #[test]
    fn change_annotation_fires_last() {
        let (core, mut doc) = core_for("ab\ncd");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_insert(move |_| s.borrow_mut().push("insert".into()));
        let s = Rc::clone(&seen);
        core.events
            .on_change_annotation(move |e| s.borrow_mut().push(format!("annotation {}", e.line)));

        doc.insert(0, "x");
        let scn = Notification {
            code: SCN_MODIFIED,
            modification_type: (ModificationType::INSERT_TEXT
                | ModificationType::CHANGE_ANNOTATION)
                .bits(),
            position: 0,
            length: 1,
            line: 1,
            text: Some(b"x".to_vec()),
            ..Notification::default()
        };
        core.process(&scn, &doc);
        assert_eq!(*seen.borrow(), vec!["insert", "annotation 1"]);
    }

    // ── Veto is advisory ──────────────────────────────────────────────────────

    #[test]
    fn insert_check_veto_is_recorded_not_enforced() {
        let (core, doc) = core_for("ab");
        core.events.on_insert_check(|e| e.reject());

        let check = Notification {
            code: SCN_MODIFIED,
            modification_type: ModificationType::INSERT_CHECK.bits(),
            position: 0,
            length: 1,
            text: Some(b"x".to_vec()),
            ..Notification::default()
        };
        core.process(&check, &doc);
        assert!(core.events.last_insert_check_rejected());
    }

    #[test]
    fn insert_check_accept_resets_flag() {
        let (core, doc) = core_for("ab");
        let check = Notification {
            code: SCN_MODIFIED,
            modification_type: ModificationType::INSERT_CHECK.bits(),
            position: 0,
            length: 1,
            text: Some(b"x".to_vec()),
            ..Notification::default()
        };
        core.process(&check, &doc);
        assert!(!core.events.last_insert_check_rejected());
    }

    // ── Unknown and unexposed codes ───────────────────────────────────────────

    #[test]
    fn unrecognised_codes_produce_no_invocations() {
        let (core, doc) = core_for("ab\ncd");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_notification(move |scn| {
            s.borrow_mut().push(format!("raw {}", scn.code));
        });
        let s = Rc::clone(&seen);
        core.events.on_insert(move |_| s.borrow_mut().push("insert".into()));

        let starts_before = core.lines.borrow().starts();
        for code in [0u32, 1999, 2033, 9999] {
            core.process(
                &Notification {
                    code,
                    ..Notification::default()
                },
                &doc,
            );
        }
        assert!(seen.borrow().is_empty());
        assert_eq!(core.lines.borrow().starts(), starts_before);
    }

    #[test]
    fn recognised_codes_without_typed_event_still_reach_raw_subscribers() {
        let (core, doc) = core_for("ab");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_notification(move |scn| {
            s.borrow_mut().push(format!("raw {}", scn.code));
        });
        core.process(
            &Notification {
                code: SCN_FOCUSIN,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["raw 2028"]);
    }

    // ── Char-added ────────────────────────────────────────────────────────────

    #[test]
    fn char_added_dispatches_printable_characters() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events
            .on_char_added(move |e| s.borrow_mut().push(format!("{}", e.ch)));

        core.process(
            &Notification {
                code: SCN_CHARADDED,
                ch: 65,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["A"]);
    }

    #[test]
    fn char_added_suppresses_reserved_keyvals() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events
            .on_char_added(move |e| s.borrow_mut().push(format!("{}", e.ch)));

        for ch in [0, 60_000, 64_769] {
            for code in [SCN_CHARADDED, SCN_KEY] {
                core.process(
                    &Notification {
                        code,
                        ch,
                        ..Notification::default()
                    },
                    &doc,
                );
            }
        }
        assert!(seen.borrow().is_empty());
    }

    // ── Mouse events ──────────────────────────────────────────────────────────

    #[test]
    fn margin_clicks_route_by_code_and_translate_positions() {
        // Line 1 starts at byte 3 but character 2.
        let (core, doc) = core_for("é\nx");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_margin_click(move |e| {
            s.borrow_mut()
                .push(format!("left {} {} {:?}", e.position, e.margin, e.modifiers));
        });
        let s = Rc::clone(&seen);
        core.events.on_margin_right_click(move |e| {
            s.borrow_mut().push(format!("right {}", e.position));
        });

        let scn = Notification {
            code: SCN_MARGINCLICK,
            position: 3,
            margin: 1,
            modifiers: (KeyMod::SHIFT | KeyMod::CTRL).bits() as i32,
            ..Notification::default()
        };
        core.process(&scn, &doc);
        let scn = Notification {
            code: SCN_MARGINRIGHTCLICK,
            position: 3,
            margin: 1,
            ..Notification::default()
        };
        core.process(&scn, &doc);

        assert_eq!(
            *seen.borrow(),
            vec!["left 2 1 KeyMod(SHIFT | CTRL)", "right 2"]
        );
    }

    #[test]
    fn hotspot_release_gets_its_own_event() {
        let (core, doc) = core_for("abc");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_hotspot_click(move |e| {
            s.borrow_mut().push(format!("click {}", e.position));
        });
        let s = Rc::clone(&seen);
        core.events.on_hotspot_double_click(move |e| {
            s.borrow_mut().push(format!("double {}", e.position));
        });
        let s = Rc::clone(&seen);
        core.events.on_hotspot_release_click(move |e| {
            s.borrow_mut().push(format!("release {}", e.position));
        });

        for code in [SCN_HOTSPOTCLICK, SCN_HOTSPOTDOUBLECLICK, SCN_HOTSPOTRELEASECLICK] {
            core.process(
                &Notification {
                    code,
                    position: 1,
                    ..Notification::default()
                },
                &doc,
            );
        }
        assert_eq!(*seen.borrow(), vec!["click 1", "double 1", "release 1"]);
    }

    #[test]
    fn double_click_carries_line_and_position() {
        let (core, doc) = core_for("ab\ncd");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_double_click(move |e| {
            s.borrow_mut().push(format!("{} {}", e.position, e.line));
        });
        core.process(
            &Notification {
                code: SCN_DOUBLECLICK,
                position: 4,
                line: 1,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["4 1"]);
    }

    #[test]
    fn indicator_click_and_release() {
        let (core, doc) = core_for("abc");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_indicator_click(move |e| {
            s.borrow_mut().push(format!("click {}", e.position));
        });
        let s = Rc::clone(&seen);
        core.events.on_indicator_release(move |e| {
            s.borrow_mut().push(format!("release {}", e.position));
        });

        core.process(
            &Notification {
                code: SCN_INDICATORCLICK,
                position: 2,
                ..Notification::default()
            },
            &doc,
        );
        core.process(
            &Notification {
                code: SCN_INDICATORRELEASE,
                position: 2,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["click 2", "release 2"]);
    }

    #[test]
    fn dwell_without_text_reports_no_position() {
        let (core, doc) = core_for("abc");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_dwell_start(move |e| {
            s.borrow_mut()
                .push(format!("{:?} {} {}", e.position, e.x, e.y));
        });
        core.process(
            &Notification {
                code: SCN_DWELLSTART,
                position: -1,
                x: 10,
                y: 20,
                ..Notification::default()
            },
            &doc,
        );
        core.process(
            &Notification {
                code: SCN_DWELLSTART,
                position: 2,
                x: 1,
                y: 2,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["None 10 20", "Some(2) 1 2"]);
    }

    // ── Remaining typed events ────────────────────────────────────────────────

    #[test]
    fn update_ui_decodes_change_mask() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_update_ui(move |e| {
            s.borrow_mut().push(format!("{:?}", e.change));
        });
        core.process(
            &Notification {
                code: SCN_UPDATEUI,
                updated: (UpdateChange::CONTENT | UpdateChange::SELECTION).bits(),
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["UpdateChange(CONTENT | SELECTION)"]);
    }

    #[test]
    fn style_needed_translates_position() {
        let (core, doc) = core_for("é€x");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_style_needed(move |e| {
            s.borrow_mut().push(format!("{}", e.position));
        });
        core.process(
            &Notification {
                code: SCN_STYLENEEDED,
                position: 5,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["2"]);
    }

    #[test]
    fn needs_shown_translates_position_and_length() {
        let (core, doc) = core_for("é€x\nyz");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_needs_shown(move |e| {
            s.borrow_mut().push(format!("{} {}", e.position, e.length));
        });
        // Bytes [2, 7) cover "€x\n" — characters [1, 4).
        core.process(
            &Notification {
                code: SCN_NEEDSHOWN,
                position: 2,
                length: 5,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["1 3"]);
    }

    #[test]
    fn autoc_selection_decodes_fields() {
        let (core, doc) = core_for("ab");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_autoc_selection(move |e| {
            s.borrow_mut().push(format!(
                "{} {:?} {:?} {:?}",
                e.position, e.text, e.ch, e.method
            ));
        });
        core.process(
            &Notification {
                code: SCN_AUTOCSELECTION,
                position: 1,
                ch: 0,
                text: Some(b"word".to_vec()),
                list_completion_method: 3,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["1 \"word\" None Tab"]);
    }

    #[test]
    fn call_tip_click_decodes_arrow() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_call_tip_click(move |e| {
            s.borrow_mut().push(format!("{:?}", e.arrow));
        });
        core.process(
            &Notification {
                code: SCN_CALLTIPCLICK,
                position: 2,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["Down"]);
    }

    #[test]
    fn unit_events_fire() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_save_point_reached(move || s.borrow_mut().push("reached".into()));
        let s = Rc::clone(&seen);
        core.events.on_save_point_left(move || s.borrow_mut().push("left".into()));
        let s = Rc::clone(&seen);
        core.events.on_modify_attempt(move || s.borrow_mut().push("attempt".into()));
        let s = Rc::clone(&seen);
        core.events.on_zoom_changed(move || s.borrow_mut().push("zoom".into()));
        let s = Rc::clone(&seen);
        core.events.on_painted(move || s.borrow_mut().push("painted".into()));

        for code in [
            SCN_SAVEPOINTREACHED,
            SCN_SAVEPOINTLEFT,
            SCN_MODIFYATTEMPTRO,
            SCN_ZOOM,
            SCN_PAINTED,
        ] {
            core.process(
                &Notification {
                    code,
                    ..Notification::default()
                },
                &doc,
            );
        }
        assert_eq!(
            *seen.borrow(),
            vec!["reached", "left", "attempt", "zoom", "painted"]
        );
    }

    // ── Subscriber mechanics ──────────────────────────────────────────────────

    #[test]
    fn handlers_fire_in_registration_order() {
        let (core, doc) = core_for("");
        let seen = log();
        let s = Rc::clone(&seen);
        core.events.on_painted(move || s.borrow_mut().push("first".into()));
        let s = Rc::clone(&seen);
        core.events.on_painted(move || s.borrow_mut().push("second".into()));

        core.process(
            &Notification {
                code: SCN_PAINTED,
                ..Notification::default()
            },
            &doc,
        );
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn handler_registered_during_dispatch_fires_next_time() {
        let (core, doc) = core_for("");
        let core = Rc::new(core);
        let seen = log();

        let s = Rc::clone(&seen);
        let inner_core = Rc::clone(&core);
        core.events.on_painted(move || {
            s.borrow_mut().push("outer".into());
            let s2 = Rc::clone(&s);
            inner_core
                .events
                .on_painted(move || s2.borrow_mut().push("added".into()));
        });

        let scn = Notification {
            code: SCN_PAINTED,
            ..Notification::default()
        };
        core.process(&scn, &doc);
        assert_eq!(*seen.borrow(), vec!["outer"]);
        // The original and the first mid-dispatch registration run next time.
        core.process(&scn, &doc);
        assert_eq!(*seen.borrow(), vec!["outer", "outer", "added"]);
    }

    #[test]
    fn modified_with_no_subscribers_still_updates_the_index() {
        let (core, mut doc) = core_for("ab");
        doc.insert(0, "x\n");
        core.process(&insert_record(0, "x\n", 1), &doc);
        assert_eq!(core.lines.borrow().starts(), vec![0, 2, 4]);
    }
}
