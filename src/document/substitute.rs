//! Field substitution: template + participant name → document instance.
//!
//! Substitution is pure. The template is deep-cloned, the clone's name-role
//! field is edited, and the original is never touched, so repeated and
//! concurrent calls against the same template cannot interfere.

use super::{DocumentInstance, GraphicObject, TemplateDocument};

/// Produce a rendering-ready instance with the name-role field's text
/// replaced by `name`, verbatim.
///
/// No trimming, no truncation, no font re-fitting: whatever the caller
/// passes is what gets drawn. Only the first tagged field is touched; a
/// validated document has at most one. A document with zero tagged fields
/// yields a clone identical to the input; that silent no-op is part of the
/// contract, and callers guard against it upstream.
pub fn substitute(template: &TemplateDocument, name: &str) -> DocumentInstance {
    let mut document = template.clone();
    let mut replaced = false;

    for object in &mut document.objects {
        if let GraphicObject::TextField(field) = object {
            if field.is_name_field() {
                field.text = name.to_string();
                replaced = true;
                break;
            }
        }
    }

    if !replaced {
        log::warn!("document has no name-role field; '{}' was not substituted", name);
    }

    DocumentInstance::new(document, name)
}
