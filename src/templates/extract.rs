use std::collections::HashSet;

use tracing::debug;

use crate::models::{
    parameter::{ParamId, ParameterSlot},
    template::{ComponentKind, Template, TemplateComponent, TemplateExample},
};

/// Components that can carry runtime parameters, in send order.
pub const PARAMETER_COMPONENTS: [ComponentKind; 2] = [ComponentKind::Header, ComponentKind::Body];

/// Distinct placeholder identifiers referenced by `text`.
///
/// Positional identifiers come first in ascending order, named ones follow in
/// the order they first appear. Braced text that is neither all digits nor an
/// identifier is not a placeholder.
pub fn scan_placeholders(text: &str) -> Vec<ParamId> {
    let mut positional: Vec<u32> = Vec::new();
    let mut named: Vec<String> = Vec::new();
    let mut seen: HashSet<ParamId> = HashSet::new();

    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find("{{") {
        let open = cursor + offset;
        let inner_start = open + 2;

        let Some(close) = text[inner_start..].find("}}") else {
            break;
        };
        let inner_end = inner_start + close;

        match ParamId::parse(&text[inner_start..inner_end]) {
            Some(id) => {
                if seen.insert(id.clone()) {
                    match id {
                        ParamId::Positional(index) => positional.push(index),
                        ParamId::Named(name) => named.push(name),
                    }
                }
                cursor = inner_end + 2;
            }
            // `{{{1}}}` must still find `{{1}}`, so only step past one brace.
            None => cursor = open + 1,
        }
    }

    positional.sort_unstable();

    positional
        .into_iter()
        .map(ParamId::Positional)
        .chain(named.into_iter().map(ParamId::Named))
        .collect()
}

/// Parameter slots for every placeholder in the template's HEADER and BODY.
pub fn extract_slots(template: &Template) -> Vec<ParameterSlot> {
    let slots: Vec<ParameterSlot> = PARAMETER_COMPONENTS
        .iter()
        .filter_map(|kind| template.component(*kind))
        .flat_map(component_slots)
        .collect();

    debug!(
        template_name = %template.name,
        language = %template.language,
        slot_count = slots.len(),
        "Extracted template parameters"
    );

    slots
}

pub fn component_slots(component: &TemplateComponent) -> Vec<ParameterSlot> {
    if !PARAMETER_COMPONENTS.contains(&component.kind) || !component.is_text() {
        return Vec::new();
    }

    let Some(text) = component.text.as_deref() else {
        return Vec::new();
    };

    scan_placeholders(text)
        .into_iter()
        .map(|id| {
            let example = component
                .example
                .as_ref()
                .and_then(|example| resolve_example(component.kind, &id, example));
            ParameterSlot::new(component.kind, id, example)
        })
        .collect()
}

fn resolve_example(kind: ComponentKind, id: &ParamId, example: &TemplateExample) -> Option<String> {
    match id {
        ParamId::Named(name) => {
            let named = match kind {
                ComponentKind::Header => &example.header_text_named_params,
                _ => &example.body_text_named_params,
            };
            named
                .iter()
                .find(|param| &param.param_name == name)
                .map(|param| param.example.clone())
        }
        ParamId::Positional(index) => {
            let position = usize::try_from(*index).ok()?.checked_sub(1)?;
            match kind {
                ComponentKind::Header => example.header_text.get(position).cloned(),
                _ => example.body_text.first()?.get(position).cloned(),
            }
        }
    }
}
