use tracing::debug;

use crate::{
    errors::SenderError,
    models::{
        parameter::{ParamId, ParameterValues},
        request::{OutgoingRequest, RequestComponent, TextParameter},
        validation::validate_phone_number,
    },
    templates::{
        extract::{PARAMETER_COMPONENTS, extract_slots},
        group::TemplateCatalog,
    },
};

/// Checks that need no template data: destination digits, then a chosen
/// language. Returns the trimmed language code.
pub fn validate_selection<'a>(
    to: &str,
    language_code: Option<&'a str>,
) -> Result<&'a str, SenderError> {
    validate_phone_number(to)?;

    language_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| SenderError::validation("Please select a language"))
}

/// Validates the selection and builds the send request.
///
/// Checks run in order: destination digits, language chosen, template pair
/// present in `catalog`, then no positional gaps in any emitted component.
/// The first failure is returned and nothing is built.
pub fn assemble_request(
    to: &str,
    template_name: &str,
    language_code: Option<&str>,
    catalog: &TemplateCatalog,
    values: &ParameterValues,
) -> Result<OutgoingRequest, SenderError> {
    let language_code = validate_selection(to, language_code)?;

    let template = catalog.find(template_name, language_code).ok_or_else(|| {
        SenderError::validation(format!(
            "Template {} is not available in language {}",
            template_name, language_code
        ))
    })?;

    let slots = extract_slots(template);

    let mut components = Vec::new();
    for kind in PARAMETER_COMPONENTS {
        let component_slots: Vec<_> = slots.iter().filter(|slot| slot.component == kind).collect();

        if !component_slots
            .iter()
            .any(|slot| values.filled(&slot.key()).is_some())
        {
            continue;
        }

        // Positional parameters bind by list position, so a gap would shift
        // every later value onto the wrong placeholder.
        let mut parameters = Vec::with_capacity(component_slots.len());
        for slot in component_slots {
            match (&slot.id, values.filled(&slot.key())) {
                (ParamId::Positional(_), Some(value)) => {
                    parameters.push(TextParameter::positional(value))
                }
                (ParamId::Positional(index), None) => {
                    return Err(SenderError::validation(format!(
                        "Please fill in {} parameter {{{{{}}}}}",
                        kind.wire_name(),
                        index
                    )));
                }
                (ParamId::Named(name), Some(value)) => {
                    parameters.push(TextParameter::named(name, value))
                }
                (ParamId::Named(_), None) => {}
            }
        }

        components.push(RequestComponent {
            kind: kind.wire_name().to_string(),
            parameters,
        });
    }

    debug!(
        template_name,
        language_code,
        component_count = components.len(),
        "Assembled template request"
    );

    Ok(OutgoingRequest {
        to: to.to_string(),
        template_name: template_name.to_string(),
        language_code: language_code.to_string(),
        components,
    })
}
