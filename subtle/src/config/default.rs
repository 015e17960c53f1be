use super::Config;
use subtle_core::config::{GrabConfig, TagConfig, ViewConfig};
use subtle_core::models::{ClientFlags, Direction, GrabAction, Gravity, StackDirection};

const TAGS: [(&str, Option<&str>); 4] = [
    ("terms", Some("xterm")),
    ("www", Some("firefox")),
    ("dev", None),
    ("float", Some("gimp")),
];

fn default_terminal() -> &'static str {
    // Prefer the user's terminal when the session advertises one.
    if std::env::var("TERMINAL").is_ok_and(|t| !t.is_empty()) {
        return "$TERMINAL";
    }
    "xterm"
}

fn grab(chord: &str, action: GrabAction) -> GrabConfig {
    GrabConfig {
        chord: chord.to_owned(),
        action,
    }
}

impl Default for Config {
    fn default() -> Self {
        let tags = TAGS
            .iter()
            .map(|(name, matching)| TagConfig {
                name: (*name).to_owned(),
                matching: matching.map(str::to_owned),
                gravity: None,
            })
            .collect();

        let views = TAGS
            .iter()
            .map(|(name, _)| ViewConfig {
                name: (*name).to_owned(),
                tags: vec![(*name).to_owned()],
            })
            .collect::<Vec<_>>();

        let mut grabs = vec![
            // Mod + Return => open a terminal
            grab("W-Return", GrabAction::Exec(default_terminal().to_owned())),
            // Mod + Ctrl + r => reload the configuration
            grab("W-C-r", GrabAction::Reload),
            // Mod + Ctrl + q => quit
            grab("W-C-q", GrabAction::Quit),
            grab("W-B1", GrabAction::WindowMove),
            grab("W-B3", GrabAction::WindowResize),
            grab("W-S-k", GrabAction::WindowKill),
            grab("W-f", GrabAction::WindowToggle(ClientFlags::FULL)),
            grab("W-S-f", GrabAction::WindowToggle(ClientFlags::FLOAT)),
            grab("W-s", GrabAction::WindowToggle(ClientFlags::STICK)),
            grab("W-c", GrabAction::WindowCollapse),
            grab("W-w", GrabAction::WindowWeight(66)),
            grab("W-S-w", GrabAction::WindowWeight(0)),
            grab("W-r", GrabAction::WindowStack(StackDirection::Above)),
            grab("W-S-r", GrabAction::WindowStack(StackDirection::Below)),
            grab("W-Left", GrabAction::WindowSelect(Direction::Left)),
            grab("W-Right", GrabAction::WindowSelect(Direction::Right)),
            grab("W-Up", GrabAction::WindowSelect(Direction::Up)),
            grab("W-Down", GrabAction::WindowSelect(Direction::Down)),
        ];

        // Mod + n => jump to view n
        grabs.extend(
            (0..views.len()).map(|i| grab(&format!("W-{}", i + 1), GrabAction::ViewJump(i))),
        );

        // Mod + keypad => gravity of the keypad cell
        grabs.extend((1..=9_u8).filter_map(|id| {
            let gravity = Gravity::try_from(id).ok()?;
            Some(grab(&format!("W-KP_{id}"), GrabAction::WindowGravity(gravity)))
        }));

        Self {
            panel_height: 18,
            log_level: "info".to_owned(),
            tags,
            views,
            grabs,
            widgets: vec![],
        }
    }
}
