//! Storable identifier classification
//!
//! Picks the animation records out of a person's record ids and pairs each
//! with the control record that governs the same target.

use std::slice;

/// Suffix marking an animation record id
pub const ANIMATION_SUFFIX: &str = "Animation";

const CONTROL_SUFFIX: &str = "Control";

// These ids already contain "Control"; their control record drops the suffix.
const CONTROL_NAMED_ANIMATIONS: [&str; 3] = [
    "eyeTargetControlAnimation",
    "lNippleControlAnimation",
    "rNippleControlAnimation",
];

/// Whether `id` names an animation record
#[inline]
#[must_use]
pub fn is_animation_id(id: &str) -> bool {
    id.ends_with(ANIMATION_SUFFIX)
}

/// Control record id paired with an animation record id
///
/// ```
/// use mocap_splice::control_id_of;
///
/// assert_eq!(control_id_of("headAnimation"), "headControl");
/// assert_eq!(control_id_of("eyeTargetControlAnimation"), "eyeTargetControl");
/// ```
#[must_use]
pub fn control_id_of(animation_id: &str) -> String {
    if CONTROL_NAMED_ANIMATIONS.contains(&animation_id) {
        animation_id.replace(ANIMATION_SUFFIX, "")
    } else {
        animation_id.replace(ANIMATION_SUFFIX, CONTROL_SUFFIX)
    }
}

/// One animation record id and its control record id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationPair {
    animation_id: String,
    control_id: String,
}

impl AnimationPair {
    /// Pair an animation id with its derived control id
    #[must_use]
    pub fn new(animation_id: impl Into<String>) -> Self {
        let animation_id = animation_id.into();
        let control_id = control_id_of(&animation_id);
        Self {
            animation_id,
            control_id,
        }
    }

    /// Animation record id
    #[inline]
    #[must_use]
    pub fn animation_id(&self) -> &str {
        &self.animation_id
    }

    /// Control record id
    #[inline]
    #[must_use]
    pub fn control_id(&self) -> &str {
        &self.control_id
    }
}

/// Classified animation ids of one person, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationIds {
    pairs: Vec<AnimationPair>,
}

impl AnimationIds {
    /// Keep the ids ending in `Animation`, preserving order
    pub fn classify<I, S>(record_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs = record_ids
            .into_iter()
            .filter(|id| is_animation_id(id.as_ref()))
            .map(|id| AnimationPair::new(id.as_ref()))
            .collect();
        Self { pairs }
    }

    /// Pairs in classification order
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, AnimationPair> {
        self.pairs.iter()
    }

    /// Animation ids in classification order
    pub fn animation_ids(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(AnimationPair::animation_id)
    }

    /// Whether `id` is a classified animation or control id
    #[must_use]
    pub fn covers(&self, id: &str) -> bool {
        self.pairs
            .iter()
            .any(|p| p.animation_id == id || p.control_id == id)
    }

    /// Number of classified ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was classified
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a> IntoIterator for &'a AnimationIds {
    type Item = &'a AnimationPair;
    type IntoIter = slice::Iter<'a, AnimationPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
