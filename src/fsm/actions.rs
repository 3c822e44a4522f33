//! Side-effect requests returned by a transition.
//!
//! A transition never touches hardware; it returns an [`ActionSet`] and the
//! dispatcher turns each set [`Action`] into exactly one collaborator call.
//! Several actions may fire on the same transition.

use core::fmt;

/// A single side-effect request.
///
/// Declaration order is the dispatch order: the backlight is re-asserted
/// only after the alarm audio has been silenced, and the redraw comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    BacklightOff = 0b0000_0001,
    StopTimer = 0b0000_0010,
    AlarmStop = 0b0000_0100,
    StartTimer = 0b0000_1000,
    AlarmStart = 0b0001_0000,
    BacklightOn = 0b0010_0000,
    UpdateUi = 0b0100_0000,
    ToggleFlash = 0b1000_0000,
}

impl Action {
    /// Every action, in dispatch order.
    pub const ALL: [Action; 8] = [
        Action::BacklightOff,
        Action::StopTimer,
        Action::AlarmStop,
        Action::StartTimer,
        Action::AlarmStart,
        Action::BacklightOn,
        Action::UpdateUi,
        Action::ToggleFlash,
    ];

    const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BacklightOff => "backlight-off",
            Self::StopTimer => "stop-timer",
            Self::AlarmStop => "alarm-stop",
            Self::StartTimer => "start-timer",
            Self::AlarmStart => "alarm-start",
            Self::BacklightOn => "backlight-on",
            Self::UpdateUi => "update-ui",
            Self::ToggleFlash => "toggle-flash",
        };
        f.write_str(name)
    }
}

/// Set of [`Action`]s produced by one transition.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a fixed list (duplicates collapse).
    pub const fn of(actions: &[Action]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].mask();
            i += 1;
        }
        Self(bits)
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.mask();
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Set actions in dispatch order.
    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl core::ops::BitOr for ActionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign<Action> for ActionSet {
    fn bitor_assign(&mut self, rhs: Action) {
        self.insert(rhs);
    }
}

impl From<Action> for ActionSet {
    fn from(action: Action) -> Self {
        Self(action.mask())
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
