//! The built-in widget kinds and their default styles.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use phf::phf_map;
use vss::{StyleMap, style};

use super::WidgetVariant;

/// A native widget type with a built-in default style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Button,
    Label,
    Entry,
    Frame,
    Text,
    Checkbox,
    RadioButton,
    ProgressBar,
    Listbox,
    Scrollbar,
    Canvas,
}

static KINDS_BY_NAME: phf::Map<&'static str, WidgetKind> = phf_map! {
    "button" => WidgetKind::Button,
    "label" => WidgetKind::Label,
    "entry" => WidgetKind::Entry,
    "frame" => WidgetKind::Frame,
    "text" => WidgetKind::Text,
    "checkbox" => WidgetKind::Checkbox,
    "checkbutton" => WidgetKind::Checkbox,
    "radiobutton" => WidgetKind::RadioButton,
    "progressbar" => WidgetKind::ProgressBar,
    "listbox" => WidgetKind::Listbox,
    "scrollbar" => WidgetKind::Scrollbar,
    "canvas" => WidgetKind::Canvas,
};

static DEFAULT_STYLES: Lazy<IndexMap<WidgetKind, StyleMap>> = Lazy::new(|| {
    let label_like = style! {
        "bg" => "SystemWindow",
        "fg" => "SystemWindowText",
        "font" => ("TkDefaultFont", 9, "normal"),
        "anchor" => "w",
    };
    let toggle = label_like.clone().merged(style! { "cursor" => "hand2" });

    IndexMap::from([
        (
            WidgetKind::Button,
            style! {
                "bg" => "#e1e1e1",
                "fg" => "#000000",
                "font" => ("Segoe UI", 10),
                "relief" => "flat",
                "border_width" => 0,
                "padding" => (12, 6),
                "cursor" => "hand2",
            },
        ),
        (WidgetKind::Label, label_like),
        (
            WidgetKind::Entry,
            style! {
                "bg" => "white",
                "fg" => "#333333",
                "font" => ("TkDefaultFont", 9, "normal"),
                "border_width" => 1,
                "relief" => "solid",
                "focused_border_color" => "#0078d4",
                "placeholder_fg" => "#999999",
            },
        ),
        (
            WidgetKind::Frame,
            style! {
                "bg" => "SystemWindow",
                "relief" => "flat",
                "border_width" => 0,
            },
        ),
        (
            WidgetKind::Text,
            style! {
                "bg" => "white",
                "fg" => "#333333",
                "font" => ("Consolas", 10, "normal"),
                "border_width" => 1,
                "relief" => "solid",
                "wrap" => "word",
            },
        ),
        (WidgetKind::Checkbox, toggle.clone()),
        (WidgetKind::RadioButton, toggle),
        (
            WidgetKind::ProgressBar,
            style! {
                "bg" => "#f0f0f0",
                "fg" => "#0078d4",
                "border_width" => 1,
                "relief" => "solid",
                "width" => 200,
                "height" => 20,
            },
        ),
        (
            WidgetKind::Listbox,
            style! {
                "bg" => "white",
                "fg" => "#333333",
                "font" => ("TkDefaultFont", 9, "normal"),
                "border_width" => 1,
                "relief" => "solid",
                "selectbackground" => "#0078d4",
                "selectforeground" => "white",
                "highlightthickness" => 0,
            },
        ),
        (
            WidgetKind::Scrollbar,
            style! {
                "bg" => "#f0f0f0",
                "troughcolor" => "#e0e0e0",
                "activebackground" => "#d0d0d0",
                "highlightthickness" => 0,
                "width" => 16,
            },
        ),
        (
            WidgetKind::Canvas,
            style! {
                "bg" => "white",
                "highlightthickness" => 0,
                "relief" => "flat",
            },
        ),
    ])
});

impl WidgetKind {
    pub const ALL: [WidgetKind; 11] = [
        WidgetKind::Button,
        WidgetKind::Label,
        WidgetKind::Entry,
        WidgetKind::Frame,
        WidgetKind::Text,
        WidgetKind::Checkbox,
        WidgetKind::RadioButton,
        WidgetKind::ProgressBar,
        WidgetKind::Listbox,
        WidgetKind::Scrollbar,
        WidgetKind::Canvas,
    ];

    /// Looks a kind up by type name, case-insensitively.
    pub fn from_type_name(name: &str) -> Option<Self> {
        KINDS_BY_NAME.get(name.trim().to_lowercase().as_str()).copied()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            WidgetKind::Button => "button",
            WidgetKind::Label => "label",
            WidgetKind::Entry => "entry",
            WidgetKind::Frame => "frame",
            WidgetKind::Text => "text",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::RadioButton => "radiobutton",
            WidgetKind::ProgressBar => "progressbar",
            WidgetKind::Listbox => "listbox",
            WidgetKind::Scrollbar => "scrollbar",
            WidgetKind::Canvas => "canvas",
        }
    }

    /// Whether pointer presses mean anything to this kind.
    pub fn is_clickable(&self) -> bool {
        matches!(
            self,
            WidgetKind::Button | WidgetKind::Checkbox | WidgetKind::RadioButton
        )
    }
}

impl WidgetVariant for WidgetKind {
    fn type_name(&self) -> &str {
        WidgetKind::type_name(self)
    }

    fn default_style(&self) -> StyleMap {
        DEFAULT_STYLES.get(self).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_defaults() {
        for kind in WidgetKind::ALL {
            assert!(!kind.default_style().is_empty(), "{:?} has no default style", kind);
            assert_eq!(WidgetKind::from_type_name(kind.type_name()), Some(kind));
        }
    }

    #[test]
    fn test_type_name_lookup() {
        assert_eq!(WidgetKind::from_type_name("Button"), Some(WidgetKind::Button));
        assert_eq!(WidgetKind::from_type_name("checkbutton"), Some(WidgetKind::Checkbox));
        assert_eq!(WidgetKind::from_type_name("treeview"), None);
    }
}
