/// The device/browser classification vocabulary. Each tag is paired with a
/// `non<tag>` negation, and both spellings are valid file name segments.
pub const USER_AGENT_TAGS: [&str; 13] = [
    "touch", "ie", "chrome", "phantom", "safari", "ios", "iphone", "ipad", "touchpad", "android",
    "opera", "firefox", "seamonkey",
];

const TAG_COUNT: usize = USER_AGENT_TAGS.len();
const SLOT_COUNT: usize = TAG_COUNT * 2;

/// Fixed-shape boolean set over the doubled vocabulary (tags first, their
/// negations after).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagSet {
    flags: [bool; SLOT_COUNT],
}

impl TagSet {
    /// Marks `name` when it belongs to the vocabulary; returns whether it was
    /// recognized.
    pub fn set(&mut self, name: &str) -> bool {
        match slot_index(name) {
            Some(slot) => {
                self.flags[slot] = true;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        slot_index(name).is_some_and(|slot| self.flags[slot])
    }

    /// For every base tag not set, sets its paired negation, so a classified
    /// requester covers the full doubled vocabulary.
    pub fn fill_negations(&mut self) {
        for tag in 0..TAG_COUNT {
            if !self.flags[tag] {
                self.flags[tag + TAG_COUNT] = true;
            }
        }
    }
}

fn slot_index(name: &str) -> Option<usize> {
    if let Some(position) = USER_AGENT_TAGS.iter().position(|tag| *tag == name) {
        return Some(position);
    }
    let base = name.strip_prefix("non")?;
    USER_AGENT_TAGS
        .iter()
        .position(|tag| *tag == base)
        .map(|position| position + TAG_COUNT)
}

/// Scoring adjustment between a requester's full-coverage set and a variant's
/// sparse file-name-derived set: +0.001 for each slot both carry, -0.00001
/// for each slot exactly one carries. A correctly tagged variant thereby
/// slightly outranks an untagged sibling, and a wrongly tagged one slightly
/// underranks it.
pub fn tag_affinity(requester: &TagSet, variant: &TagSet) -> f64 {
    let mut delta = 0.0;
    for slot in 0..SLOT_COUNT {
        match (requester.flags[slot], variant.flags[slot]) {
            (true, true) => delta += 0.001,
            (true, false) | (false, true) => delta -= 0.00001,
            (false, false) => {}
        }
    }
    delta
}

/// Maps a user-agent string to the base tag set. Pluggable so hosts can swap
/// in a real browser-sniffing library; the engine fills in the negations.
pub trait UserAgentClassifier: Send + Sync {
    fn classify(&self, user_agent: &str) -> TagSet;
}

/// Default classifier: case-insensitive substring heuristics over well-known
/// user-agent markers.
pub struct SubstringClassifier;

impl UserAgentClassifier for SubstringClassifier {
    fn classify(&self, user_agent: &str) -> TagSet {
        let ua = user_agent.to_ascii_lowercase();
        let mut tags = TagSet::default();
        if ua.contains("iphone") {
            tags.set("iphone");
            tags.set("ios");
            tags.set("touch");
        }
        if ua.contains("ipad") {
            tags.set("ipad");
            tags.set("ios");
            tags.set("touch");
        }
        if ua.contains("android") {
            tags.set("android");
            tags.set("touch");
        }
        if ua.contains("touchpad") || ua.contains("hp-tablet") {
            tags.set("touchpad");
            tags.set("touch");
        }
        if ua.contains("msie") || ua.contains("trident") {
            tags.set("ie");
            if ua.contains("touch") {
                tags.set("touch");
            }
        }
        if ua.contains("phantomjs") {
            tags.set("phantom");
        }
        if ua.contains("opera") || ua.contains(" opr/") {
            tags.set("opera");
        }
        if ua.contains("seamonkey") {
            tags.set("seamonkey");
        } else if ua.contains("firefox") {
            tags.set("firefox");
        }
        if ua.contains("chrome") {
            tags.set("chrome");
        } else if ua.contains("safari") {
            tags.set("safari");
        }
        tags
    }
}
