use crate::{
    errors::SenderError,
    models::request::{SmsRequest, TemplateCreateRequest},
};

pub const MAX_BUTTON_TEXT_LEN: usize = 25;
pub const MAX_TEMPLATE_COMPONENTS: usize = 4;

type Result<T = ()> = std::result::Result<T, SenderError>;

pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_phone_number(number: &str) -> Result {
    if !is_digits(number) {
        return Err(SenderError::validation(
            "Please enter a valid phone number (digits only)",
        ));
    }

    Ok(())
}

pub fn validate_template_name(name: &str) -> Result {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(SenderError::validation(
            "Template name can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

pub fn validate_template_components(request: &TemplateCreateRequest) -> Result {
    let count = |kind: &str| {
        request
            .components
            .iter()
            .filter(|c| c.kind.eq_ignore_ascii_case(kind))
            .count()
    };

    if count("BODY") == 0 {
        return Err(SenderError::validation(
            "Template must have at least one BODY component",
        ));
    }

    if count("HEADER") > 1 {
        return Err(SenderError::validation(
            "Template can have at most one HEADER component",
        ));
    }

    if count("FOOTER") > 1 {
        return Err(SenderError::validation(
            "Template can have at most one FOOTER component",
        ));
    }

    if request.components.len() > MAX_TEMPLATE_COMPONENTS {
        return Err(SenderError::validation(format!(
            "Template can have at most {} components",
            MAX_TEMPLATE_COMPONENTS
        )));
    }

    for component in &request.components {
        let Some(buttons) = &component.buttons else {
            continue;
        };

        if !component.kind.eq_ignore_ascii_case("BUTTONS") {
            return Err(SenderError::validation(format!(
                "Buttons are only allowed on a BUTTONS component, found on {}",
                component.kind
            )));
        }

        for button in buttons {
            let len = button.text.trim().chars().count();
            if len == 0 {
                return Err(SenderError::validation("Button text cannot be empty"));
            }
            if len > MAX_BUTTON_TEXT_LEN {
                return Err(SenderError::validation(format!(
                    "Button text cannot exceed {} characters",
                    MAX_BUTTON_TEXT_LEN
                )));
            }
        }
    }

    Ok(())
}

/// Validates a create request and normalizes its name to lowercase.
pub fn prepare_template_create(mut request: TemplateCreateRequest) -> Result<TemplateCreateRequest> {
    validate_template_name(&request.name)?;
    validate_template_components(&request)?;

    request.name = request.name.to_lowercase();
    Ok(request)
}

pub fn validate_sms(request: &SmsRequest) -> Result {
    let digits = request
        .phone_number
        .strip_prefix('+')
        .unwrap_or(&request.phone_number);

    if !is_digits(digits) {
        return Err(SenderError::validation(
            "Please enter a valid phone number (digits, optionally prefixed with +)",
        ));
    }

    if request.message.trim().is_empty() {
        return Err(SenderError::validation("Message cannot be empty"));
    }

    Ok(())
}
