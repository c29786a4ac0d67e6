//! Host item naming conventions, kept in one place.
//!
//! | Name                          | Meaning                     |
//! |-------------------------------|-----------------------------|
//! | `_template:<id>:<suffix>`     | output template             |
//! | `_<anything else>`            | ignored                     |
//! | contains `Input Comp`         | ignored                     |
//! | `<3 chars>::<crew>`           | source to process           |
//! | anything else                 | left over, marked for removal |

/// Prefix of template composition names
pub const TEMPLATE_PREFIX: &str = "_template:";

/// Marker for the host's own precomps
pub const INPUT_COMP_MARKER: &str = "Input Comp";

/// Separator that identifies a source, expected right after the event code
pub const SOURCE_SEPARATOR: &str = "::";

/// Character position of [`SOURCE_SEPARATOR`] in source names
pub const SOURCE_SEPARATOR_POSITION: usize = 3;

/// What the batch does with a host item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemClass {
    Template { id: String },
    Source,
    Ignored,
    Remove,
}

/// Classify a host item by name; rules are checked in table order
pub fn classify_item(name: &str) -> ItemClass {
    if name.starts_with(TEMPLATE_PREFIX) {
        ItemClass::Template { id: name_field(name, 1).to_string() }
    } else if name.starts_with('_') || name.contains(INPUT_COMP_MARKER) {
        ItemClass::Ignored
    } else if separator_position(name) == Some(SOURCE_SEPARATOR_POSITION) {
        ItemClass::Source
    } else {
        ItemClass::Remove
    }
}

/// The `index`th `:`-separated field, or `""` when there is none
pub fn name_field(name: &str, index: usize) -> &str {
    name.split(':').nth(index).unwrap_or("")
}

/// Name of the composition made from a source and a template:
/// `M1a::Smith` + `_template:legacy:_2x` gives `Smith_2x`
pub fn variant_name(source_name: &str, template_name: &str) -> String {
    format!("{}{}", name_field(source_name, 2), name_field(template_name, 2))
}

// Position in UTF-16 units, as the host counts string positions
fn separator_position(name: &str) -> Option<usize> {
    name.find(SOURCE_SEPARATOR)
        .map(|byte| name[..byte].encode_utf16().count())
}
