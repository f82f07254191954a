use crate::types::PrincipalKind;

/// Lifecycle of one kind's search dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    /// Untouched since the wizard opened or was last reset.
    #[default]
    Idle,
    /// Input focused; the dropdown shows locally filtered entries.
    Focused,
    /// A remote search is in flight; the dropdown stays visible.
    Searching,
    /// Dismissed by a selection or an outside interaction.
    Closed,
}

impl PickerState {
    pub fn is_open(&self) -> bool {
        matches!(self, PickerState::Focused | PickerState::Searching)
    }
}

#[derive(Debug, Clone, Default)]
struct KindPicker {
    state: PickerState,
    query: String,
}

/// Dropdown state for the three principal pickers.
///
/// At most one picker is open at a time: focusing one dismisses whichever
/// other picker was open.
#[derive(Debug, Clone, Default)]
pub struct PickerPanel {
    user: KindPicker,
    group: KindPicker,
    role: KindPicker,
}

impl PickerPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: PrincipalKind) -> &KindPicker {
        match kind {
            PrincipalKind::User => &self.user,
            PrincipalKind::Group => &self.group,
            PrincipalKind::Role => &self.role,
        }
    }

    fn slot_mut(&mut self, kind: PrincipalKind) -> &mut KindPicker {
        match kind {
            PrincipalKind::User => &mut self.user,
            PrincipalKind::Group => &mut self.group,
            PrincipalKind::Role => &mut self.role,
        }
    }

    pub fn state(&self, kind: PrincipalKind) -> PickerState {
        self.slot(kind).state
    }

    pub fn query(&self, kind: PrincipalKind) -> &str {
        &self.slot(kind).query
    }

    /// The kind whose dropdown is open, if any.
    pub fn open_kind(&self) -> Option<PrincipalKind> {
        PrincipalKind::ALL.into_iter().find(|kind| self.state(*kind).is_open())
    }

    /// Focus a kind's input: its dropdown opens, any other open one closes.
    pub fn focus(&mut self, kind: PrincipalKind) {
        for other in PrincipalKind::ALL {
            if other != kind && self.slot(other).state.is_open() {
                self.slot_mut(other).state = PickerState::Closed;
            }
        }
        if self.slot(kind).state != PickerState::Searching {
            self.slot_mut(kind).state = PickerState::Focused;
        }
    }

    /// Record typed input for a kind. Typing implies focus.
    pub fn set_query(&mut self, kind: PrincipalKind, text: impl Into<String>) {
        self.focus(kind);
        self.slot_mut(kind).query = text.into();
    }

    /// A debounced search for this kind left the gate and is now in flight.
    /// A picker the user already dismissed stays dismissed.
    pub fn begin_search(&mut self, kind: PrincipalKind) {
        if self.slot(kind).state.is_open() {
            self.slot_mut(kind).state = PickerState::Searching;
        }
    }

    /// The in-flight search finished, successfully or not.
    pub fn finish_search(&mut self, kind: PrincipalKind) {
        if self.slot(kind).state == PickerState::Searching {
            self.slot_mut(kind).state = PickerState::Focused;
        }
    }

    /// A selection was made from this kind's dropdown: close it and clear the
    /// input.
    pub fn select(&mut self, kind: PrincipalKind) {
        let slot = self.slot_mut(kind);
        slot.state = PickerState::Closed;
        slot.query.clear();
    }

    /// An outside interaction dismisses whatever is open.
    pub fn dismiss_all(&mut self) {
        for kind in PrincipalKind::ALL {
            if self.slot(kind).state.is_open() {
                self.slot_mut(kind).state = PickerState::Closed;
            }
        }
    }

    /// Back to the pristine state the wizard opens with.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
