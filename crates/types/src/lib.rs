//! Shared leaf types for the tuidom runtime.
//!
//! This crate defines the vocabulary every other crate speaks: event kinds,
//! event payloads, node identifiers and the small closed sets the renderer
//! must recognize (boolean property attributes, vector-graphics tags, the
//! reserved event-attribute prefix). All types are pure data with no
//! external dependencies, so they are usable in any context (node model,
//! live target, input mapping, tests).

use std::fmt;

/// Reserved prefix marking an attribute name as an event binding
/// (`onclick`, `onkeydown`, ...).
pub const EVENT_PREFIX: &str = "on";

/// Explicit identity attribute, checked first when locating a live node
/// for removal.
pub const DATA_ID_ATTR: &str = "data-id";

/// Plain id attribute, the second removal lookup.
pub const ID_ATTR: &str = "id";

/// Class attribute; its first token participates in the third removal
/// lookup (tag + class).
pub const CLASS_ATTR: &str = "class";

/// Attributes assigned as live properties rather than serialized
/// attributes.
pub const PROPERTY_ATTRS: [&str; 2] = ["checked", "disabled"];

/// Tags created in the vector-graphics namespace.
pub const VECTOR_TAGS: [&str; 5] = ["svg", "circle", "path", "line", "rect"];

/// True if `name` belongs to the fixed boolean-property set.
pub fn is_property_attr(name: &str) -> bool {
    PROPERTY_ATTRS.contains(&name)
}

/// True if `tag` must be created in the vector-graphics namespace.
pub fn is_vector_tag(tag: &str) -> bool {
    VECTOR_TAGS.contains(&tag)
}

/// Creation namespace for live elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Default,
    Vector,
}

impl Namespace {
    /// Select the namespace for a tag name.
    pub fn for_tag(tag: &str) -> Self {
        if is_vector_tag(tag) {
            Namespace::Vector
        } else {
            Namespace::Default
        }
    }
}

/// Process-unique identifier assigned to every live node at creation.
///
/// Ids are never reused; tests rely on them to assert identity
/// preservation across keyed reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of event kinds the runtime dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    Input,
    Change,
    Submit,
    Focus,
    Blur,
    KeyDown,
    KeyUp,
}

impl EventKind {
    /// Parse an event kind from its lowercase name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "click" => Some(EventKind::Click),
            "dblclick" => Some(EventKind::DblClick),
            "mousedown" => Some(EventKind::MouseDown),
            "mouseup" => Some(EventKind::MouseUp),
            "input" => Some(EventKind::Input),
            "change" => Some(EventKind::Change),
            "submit" => Some(EventKind::Submit),
            "focus" => Some(EventKind::Focus),
            "blur" => Some(EventKind::Blur),
            "keydown" => Some(EventKind::KeyDown),
            "keyup" => Some(EventKind::KeyUp),
            _ => None,
        }
    }

    /// Lowercase event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Submit => "submit",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
        }
    }

    /// Parse an event kind from an attribute name carrying the reserved
    /// prefix: the prefix is stripped and the remainder lowercased
    /// (`onClick` -> `click`).
    ///
    /// # Examples
    ///
    /// ```
    /// use tuidom_types::EventKind;
    ///
    /// assert_eq!(EventKind::from_attr_name("onClick"), Some(EventKind::Click));
    /// assert_eq!(EventKind::from_attr_name("onkeydown"), Some(EventKind::KeyDown));
    /// assert_eq!(EventKind::from_attr_name("class"), None);
    /// ```
    pub fn from_attr_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(EVENT_PREFIX)?;
        EventKind::from_str(&rest.to_lowercase())
    }

    /// Canonical attribute name for this kind (`on` + lowercase name).
    pub fn attr_name(&self) -> String {
        format!("{}{}", EVENT_PREFIX, self.as_str())
    }
}

/// A key press or release as seen by the ambient input surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// Key name: single characters as-is (`"a"`, `"1"`), named keys in
    /// their conventional form (`"Enter"`, `"Left"`, `"Backspace"`).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// Payload carried by a [`UiEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventDetail {
    #[default]
    None,
    /// Current text value (input / change events).
    Text(String),
    /// Key data (keydown / keyup events).
    Key(KeyPress),
}

/// An event delivered to listeners, either on a live node or on the
/// ambient input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub kind: EventKind,
    pub detail: EventDetail,
}

impl UiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            detail: EventDetail::None,
        }
    }

    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    pub fn submit() -> Self {
        Self::new(EventKind::Submit)
    }

    pub fn input(value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Input,
            detail: EventDetail::Text(value.into()),
        }
    }

    pub fn change(value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Change,
            detail: EventDetail::Text(value.into()),
        }
    }

    pub fn key_down(key: KeyPress) -> Self {
        Self {
            kind: EventKind::KeyDown,
            detail: EventDetail::Key(key),
        }
    }

    pub fn key_up(key: KeyPress) -> Self {
        Self {
            kind: EventKind::KeyUp,
            detail: EventDetail::Key(key),
        }
    }

    /// Text payload, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Key payload, if any.
    pub fn key(&self) -> Option<&KeyPress> {
        match &self.detail {
            EventDetail::Key(k) => Some(k),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_round_trips_through_names() {
        for kind in [
            EventKind::Click,
            EventKind::Input,
            EventKind::Submit,
            EventKind::KeyDown,
            EventKind::KeyUp,
        ] {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn attr_name_parsing_strips_prefix_and_case() {
        assert_eq!(EventKind::from_attr_name("onClick"), Some(EventKind::Click));
        assert_eq!(EventKind::from_attr_name("onINPUT"), Some(EventKind::Input));
        assert_eq!(EventKind::from_attr_name("onKeyDown"), Some(EventKind::KeyDown));
        // No prefix, or unknown event name.
        assert_eq!(EventKind::from_attr_name("click"), None);
        assert_eq!(EventKind::from_attr_name("onwarp"), None);
    }

    #[test]
    fn canonical_attr_names_are_lowercase() {
        assert_eq!(EventKind::Click.attr_name(), "onclick");
        assert_eq!(EventKind::KeyUp.attr_name(), "onkeyup");
    }

    #[test]
    fn property_and_vector_sets() {
        assert!(is_property_attr("checked"));
        assert!(is_property_attr("disabled"));
        assert!(!is_property_attr("class"));

        assert_eq!(Namespace::for_tag("svg"), Namespace::Vector);
        assert_eq!(Namespace::for_tag("circle"), Namespace::Vector);
        assert_eq!(Namespace::for_tag("div"), Namespace::Default);
    }

    #[test]
    fn ui_event_accessors() {
        let ev = UiEvent::input("hello");
        assert_eq!(ev.text(), Some("hello"));
        assert!(ev.key().is_none());

        let ev = UiEvent::key_down(KeyPress::new("Enter"));
        assert_eq!(ev.key().map(|k| k.key.as_str()), Some("Enter"));
        assert!(ev.text().is_none());
    }
}
