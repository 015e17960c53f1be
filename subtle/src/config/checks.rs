use super::Config;
use std::collections::HashSet;
use subtle_core::models::Chord;
use tracing_subscriber::EnvFilter;

impl Config {
    /// Every problem found in the configuration, empty when it is sound.
    ///
    /// Key names are only resolved against a running display, so `keysym`
    /// decides which names count as known keys.
    pub fn check(&self, keysym: impl Fn(&str) -> Option<u32>) -> Vec<String> {
        let mut problems = Vec::new();
        self.check_log_level(&mut problems);
        self.check_tags(&mut problems);
        self.check_views(&mut problems);
        self.check_grabs(keysym, &mut problems);
        if self.panel_height < 0 {
            problems.push(format!("panel_height {} is negative", self.panel_height));
        }
        problems
    }

    fn check_log_level(&self, problems: &mut Vec<String>) {
        if let Err(err) = EnvFilter::builder().parse(&self.log_level) {
            problems.push(format!("Log level `{}` is invalid: {err}", self.log_level));
        }
    }

    fn check_tags(&self, problems: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for tag in &self.tags {
            if tag.name.is_empty() {
                problems.push("A tag has no name".to_owned());
            } else if !seen.insert(tag.name.as_str()) {
                problems.push(format!("Tag `{}` is defined twice", tag.name));
            }
        }
        // Tags live in a 64 bit mask.
        if self.tags.len() > 64 {
            problems.push(format!("{} tags defined, at most 64 fit", self.tags.len()));
        }
    }

    fn check_views(&self, problems: &mut Vec<String>) {
        if self.views.is_empty() {
            problems.push("No views defined".to_owned());
        }
        let tags: HashSet<&str> = self.tags.iter().map(|t| t.name.as_str()).collect();
        let mut seen = HashSet::new();
        for view in &self.views {
            if !seen.insert(view.name.as_str()) {
                problems.push(format!("View `{}` is defined twice", view.name));
            }
            for tag in view.tags.iter().filter(|t| !tags.contains(t.as_str())) {
                problems.push(format!("View `{}` shows unknown tag `{tag}`", view.name));
            }
        }
    }

    fn check_grabs(&self, keysym: impl Fn(&str) -> Option<u32>, problems: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for grab in &self.grabs {
            match Chord::parse(&grab.chord, &keysym) {
                Some(chord) => {
                    if !seen.insert(chord) {
                        problems.push(format!(
                            "Chord `{}` is bound more than once, only the first binding is used",
                            grab.chord
                        ));
                    }
                }
                None => problems.push(format!("Chord `{}` is not valid", grab.chord)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtle_core::config::{GrabConfig, ViewConfig};
    use subtle_core::models::GrabAction;

    fn keysym(name: &str) -> Option<u32> {
        match name {
            "Return" => Some(0xff0d),
            "q" => Some(0x71),
            _ => None,
        }
    }

    /// Accepts any key name, giving each a distinct keysym.
    fn lenient(name: &str) -> Option<u32> {
        Some(name.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b))))
    }

    #[test]
    fn default_config_is_sound() {
        assert_eq!(Config::default().check(lenient), Vec::<String>::new());
    }

    #[test]
    fn views_must_name_known_tags() {
        let mut config = Config::default();
        config.views.push(ViewConfig {
            name: "misc".to_owned(),
            tags: vec!["nope".to_owned()],
        });
        let problems = config.check(lenient);
        assert_eq!(problems, vec!["View `misc` shows unknown tag `nope`"]);
    }

    #[test]
    fn bad_and_duplicate_chords_are_reported() {
        let config = Config {
            grabs: vec![
                GrabConfig {
                    chord: "W-Return".to_owned(),
                    action: GrabAction::Reload,
                },
                GrabConfig {
                    chord: "Mod4-Return".to_owned(),
                    action: GrabAction::Quit,
                },
                GrabConfig {
                    chord: "X-q".to_owned(),
                    action: GrabAction::Quit,
                },
                GrabConfig {
                    chord: "W-nokey".to_owned(),
                    action: GrabAction::Quit,
                },
            ],
            ..Config::default()
        };
        let problems = config.check(keysym);
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("Mod4-Return"));
        assert!(problems[1].contains("X-q"));
        assert!(problems[2].contains("W-nokey"));
    }

    #[test]
    fn invalid_log_level_is_reported() {
        let config = Config {
            log_level: "subtle=loud".to_owned(),
            ..Config::default()
        };
        assert_eq!(config.check(lenient).len(), 1);
    }
}
