use crate::models::{Gravity, GrabAction};
use serde::{Deserialize, Serialize};

/// A tag and the clients it claims on creation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TagConfig {
    pub name: String,
    /// New clients whose class or caption contains this text get the tag.
    #[serde(default, rename = "match")]
    pub matching: Option<String>,
    /// Gravity given to matching clients.
    #[serde(default)]
    pub gravity: Option<Gravity>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub name: String,
    /// Names of the tags the view shows.
    pub tags: Vec<String>,
}

/// A chord string such as `W-S-Return` bound to an action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GrabConfig {
    pub chord: String,
    pub action: GrabAction,
}

pub trait Config {
    fn tags(&self) -> Vec<TagConfig>;

    fn views(&self) -> Vec<ViewConfig>;

    fn grabs(&self) -> Vec<GrabConfig>;

    /// Widget definitions handed to the script host on startup and reload.
    fn widgets(&self) -> Vec<String>;

    /// Height of the panel and of collapsed clients.
    fn header_height(&self) -> i32;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[allow(clippy::module_name_repetitions)]
    #[derive(Default, Clone)]
    pub struct TestConfig {
        pub tags: Vec<TagConfig>,
        pub views: Vec<ViewConfig>,
        pub grabs: Vec<GrabConfig>,
        pub widgets: Vec<String>,
    }

    impl TestConfig {
        /// One tag per name and one view showing each tag.
        pub fn with_tags(names: &[&str]) -> Self {
            Self {
                tags: names
                    .iter()
                    .map(|n| TagConfig {
                        name: (*n).to_owned(),
                        ..TagConfig::default()
                    })
                    .collect(),
                views: names
                    .iter()
                    .map(|n| ViewConfig {
                        name: (*n).to_owned(),
                        tags: vec![(*n).to_owned()],
                    })
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl Config for TestConfig {
        fn tags(&self) -> Vec<TagConfig> {
            self.tags.clone()
        }
        fn views(&self) -> Vec<ViewConfig> {
            self.views.clone()
        }
        fn grabs(&self) -> Vec<GrabConfig> {
            self.grabs.clone()
        }
        fn widgets(&self) -> Vec<String> {
            self.widgets.clone()
        }
        fn header_height(&self) -> i32 {
            16
        }
    }
}

#[cfg(test)]
pub use tests::TestConfig;
