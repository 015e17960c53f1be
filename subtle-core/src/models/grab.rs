use super::{ClientFlags, Gravity};
use crate::utils::modmask_lookup::{self, ModMask};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// A keysym.
    Key(u32),
    /// A pointer button number.
    Button(u32),
}

/// An input together with the modifiers held while it fired.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    pub input: Input,
    pub modifiers: ModMask,
}

impl Chord {
    #[must_use]
    pub fn new(input: Input, modifiers: ModMask) -> Self {
        Self {
            input,
            modifiers: modifiers.clean(),
        }
    }

    /// Parse chords like `W-S-Return` or `W-B1`. Key names are resolved to
    /// keysyms with `keysym`.
    pub fn parse(chord: &str, keysym: impl Fn(&str) -> Option<u32>) -> Option<Self> {
        let parts: Vec<&str> = chord.split('-').map(str::trim).collect();
        let (key, mods) = parts.split_last()?;
        if let Some(unknown) = mods.iter().find(|m| !modmask_lookup::is_mod(m)) {
            tracing::warn!("Unknown modifier {unknown} in chord {chord}");
            return None;
        }
        let modifiers = modmask_lookup::into_modmask(mods);
        let input = match key.strip_prefix('B').map(str::parse::<u32>) {
            Some(Ok(button)) if (1..=5).contains(&button) => Input::Button(button),
            _ => Input::Key(keysym(key)?),
        };
        Some(Self::new(input, modifiers))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StackDirection {
    Above,
    Below,
}

/// What a grab does when its chord fires.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrabAction {
    /// Run a shell command in a detached session.
    Exec(String),
    /// Invoke a named script hook.
    Script(String),
    ViewJump(usize),
    ScreenJump(usize),
    Reload,
    Quit,
    WindowMove,
    WindowResize,
    WindowToggle(ClientFlags),
    WindowStack(StackDirection),
    WindowSelect(Direction),
    WindowGravity(Gravity),
    WindowScreen(usize),
    /// Shrink the client to its header bar, or expand it again.
    WindowCollapse,
    /// Percentage of its gravity cell the client claims, 0 to share equally.
    WindowWeight(u8),
    WindowKill,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grab {
    pub chord: Chord,
    pub action: GrabAction,
}

/// All grabs in registration order.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Grabs {
    list: Vec<Grab>,
}

impl Grabs {
    pub fn add(&mut self, chord: Chord, action: GrabAction) {
        if self.find(&chord).is_some() {
            tracing::debug!("Chord {chord:?} is already bound; the first binding wins");
        }
        self.list.push(Grab { chord, action });
    }

    /// The first grab registered for `chord`.
    pub fn find(&self, chord: &Chord) -> Option<&Grab> {
        self.list.iter().find(|g| g.chord == *chord)
    }

    pub fn chords(&self) -> Vec<Chord> {
        let mut chords: Vec<Chord> = Vec::with_capacity(self.list.len());
        for grab in &self.list {
            if !chords.contains(&grab.chord) {
                chords.push(grab.chord);
            }
        }
        chords
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keysym(name: &str) -> Option<u32> {
        match name {
            "Return" => Some(0xff0d),
            "a" => Some(0x61),
            _ => None,
        }
    }

    #[test]
    fn first_registered_grab_wins() {
        let mut grabs = Grabs::default();
        let chord = Chord::new(Input::Key(36), ModMask::empty());
        grabs.add(chord, GrabAction::Exec("first".to_owned()));
        grabs.add(chord, GrabAction::Exec("second".to_owned()));
        let grab = grabs.find(&chord).unwrap();
        assert_eq!(grab.action, GrabAction::Exec("first".to_owned()));
        assert_eq!(grabs.chords(), vec![chord]);
    }

    #[test]
    fn lookup_requires_the_exact_modifiers() {
        let mut grabs = Grabs::default();
        grabs.add(
            Chord::new(Input::Key(36), ModMask::Super),
            GrabAction::Reload,
        );
        assert!(grabs.find(&Chord::new(Input::Key(36), ModMask::empty())).is_none());
        assert!(grabs
            .find(&Chord::new(Input::Key(36), ModMask::Super | ModMask::Shift))
            .is_none());
        assert!(grabs
            .find(&Chord::new(Input::Key(36), ModMask::Super | ModMask::NumLock))
            .is_some());
    }

    #[test]
    fn parses_key_and_button_chords() {
        assert_eq!(
            Chord::parse("W-S-Return", keysym),
            Some(Chord::new(Input::Key(0xff0d), ModMask::Super | ModMask::Shift))
        );
        assert_eq!(
            Chord::parse("A-B3", keysym),
            Some(Chord::new(Input::Button(3), ModMask::Alt))
        );
        assert_eq!(
            Chord::parse("a", keysym),
            Some(Chord::new(Input::Key(0x61), ModMask::empty()))
        );
    }

    #[test]
    fn rejects_unknown_keys_and_modifiers() {
        assert_eq!(Chord::parse("W-nope", keysym), None);
        assert_eq!(Chord::parse("Hyper-a", keysym), None);
    }
}
