//! Presentation markers
//!
//! Widget presentation state is held as a [`MarkerSet`], a small bit set of
//! [`Marker`] flags. The set is the single source of truth: class names on a
//! node are a one-way projection of it (see [`MarkerClasses::project`]) and
//! are never read back, so a getter derived from the set cannot drift from
//! what the styling layer sees.

use serde::Deserialize;
use smallvec::SmallVec;

/// A boolean presentation flag expressed as a class on the node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Element is not visible
    Hide,
    /// Visual emphasis
    Highlight,
    /// Entry animation active
    AnimateIn,
    /// Exit animation active
    AnimateOut,
}

impl Marker {
    /// Every marker, in projection order
    pub const ALL: [Marker; 4] = [
        Marker::Hide,
        Marker::Highlight,
        Marker::AnimateIn,
        Marker::AnimateOut,
    ];

    fn bit(self) -> u8 {
        match self {
            Marker::Hide => 1 << 0,
            Marker::Highlight => 1 << 1,
            Marker::AnimateIn => 1 << 2,
            Marker::AnimateOut => 1 << 3,
        }
    }
}

/// Set of active markers
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkerSet(u8);

impl MarkerSet {
    /// The empty set (visible, no emphasis, no animation)
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    /// Add a marker, returning `true` if it was absent
    pub fn insert(&mut self, marker: Marker) -> bool {
        let was_absent = !self.contains(marker);
        self.0 |= marker.bit();
        was_absent
    }

    /// Remove a marker, returning `true` if it was present
    pub fn remove(&mut self, marker: Marker) -> bool {
        let was_present = self.contains(marker);
        self.0 &= !marker.bit();
        was_present
    }

    /// Insert or remove depending on `present`
    pub fn set(&mut self, marker: Marker, present: bool) -> bool {
        if present {
            self.insert(marker)
        } else {
            self.remove(marker)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate active markers in projection order
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        Marker::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl std::fmt::Debug for MarkerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut set = MarkerSet::empty();
        for marker in iter {
            set.insert(marker);
        }
        set
    }
}

/// Class names used to express markers on a node
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkerClasses {
    pub hide: String,
    pub highlight: String,
    pub animate_in: String,
    pub animate_out: String,
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            hide: "hide".to_string(),
            highlight: "highlight".to_string(),
            animate_in: "animate-in".to_string(),
            animate_out: "animate-out".to_string(),
        }
    }
}

impl MarkerClasses {
    /// Class name for a marker
    pub fn class_name(&self, marker: Marker) -> &str {
        match marker {
            Marker::Hide => &self.hide,
            Marker::Highlight => &self.highlight,
            Marker::AnimateIn => &self.animate_in,
            Marker::AnimateOut => &self.animate_out,
        }
    }

    /// Project a marker set onto `(class, present)` pairs
    ///
    /// Every marker appears exactly once, so applying the projection both
    /// adds the active classes and removes the inactive ones.
    pub fn project(&self, set: MarkerSet) -> SmallVec<[(&str, bool); 4]> {
        Marker::ALL
            .into_iter()
            .map(|marker| (self.class_name(marker), set.contains(marker)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_report_changes() {
        let mut set = MarkerSet::empty();
        assert!(set.is_empty());

        assert!(set.insert(Marker::Hide));
        assert!(!set.insert(Marker::Hide));
        assert!(set.contains(Marker::Hide));
        assert!(!set.contains(Marker::Highlight));

        assert!(set.remove(Marker::Hide));
        assert!(!set.remove(Marker::Hide));
        assert!(set.is_empty());
    }

    #[test]
    fn test_markers_are_independent() {
        let mut set: MarkerSet = [Marker::Highlight, Marker::AnimateIn].into_iter().collect();
        set.set(Marker::AnimateIn, false);

        assert!(set.contains(Marker::Highlight));
        assert!(!set.contains(Marker::AnimateIn));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Marker::Highlight]);
    }

    #[test]
    fn test_projection_covers_every_marker() {
        let classes = MarkerClasses::default();
        let set: MarkerSet = [Marker::Hide, Marker::AnimateOut].into_iter().collect();

        let projected = classes.project(set);
        assert_eq!(
            projected.as_slice(),
            &[
                ("hide", true),
                ("highlight", false),
                ("animate-in", false),
                ("animate-out", true),
            ]
        );
    }

    #[test]
    fn test_custom_class_names() {
        let classes = MarkerClasses {
            hide: "cf-hidden".to_string(),
            ..MarkerClasses::default()
        };
        assert_eq!(classes.class_name(Marker::Hide), "cf-hidden");
        assert_eq!(classes.class_name(Marker::AnimateIn), "animate-in");
    }
}
