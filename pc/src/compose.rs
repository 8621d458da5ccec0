//! Composing templates and free text into one instruction

use std::borrow::Borrow;

use crate::template::PromptTemplate;

/// Opens a prompt built from more than one template
pub const COMBINED_PREAMBLE: &str = "Please apply the following edits to this image:";

/// Joins free text to the template sections that follow it
pub const ADDITIONAL_EDITS_LINE: &str = "Additionally, please apply these edits:";

/// Merge templates into one prompt
///
/// No templates gives an empty string and a single template gives its content
/// untouched. Two or more get a preamble and an upper-cased section header each.
pub fn combine<T: Borrow<PromptTemplate>>(templates: &[T]) -> String {
    match templates {
        [] => String::new(),
        [single] => {
            let single: &PromptTemplate = single.borrow();
            single.content.clone()
        }
        many => {
            let mut combined = format!("{}\n\n", COMBINED_PREAMBLE);
            push_sections(&mut combined, many);
            combined.trim_end().to_string()
        }
    }
}

/// Free text first, then the templates as sections
///
/// Without templates the text is returned exactly as given.
pub fn compose_with_custom_text<T: Borrow<PromptTemplate>>(custom_text: &str, templates: &[T]) -> String {
    if templates.is_empty() {
        return custom_text.to_string();
    }

    let mut combined = format!("{}\n\n{}\n\n", custom_text, ADDITIONAL_EDITS_LINE);
    push_sections(&mut combined, templates);
    combined.trim().to_string()
}

/// Pick the composition for whatever the user supplied
///
/// Any non-empty custom text is used, even if it is only whitespace. A blank
/// result means there is nothing to send.
pub fn compose_prompt<T: Borrow<PromptTemplate>>(custom_text: &str, templates: &[T]) -> String {
    let has_text = !custom_text.is_empty();

    match (has_text, templates.is_empty()) {
        (true, false) => compose_with_custom_text(custom_text, templates),
        (true, true) => custom_text.to_string(),
        (false, false) => combine(templates),
        (false, true) => String::new(),
    }
}

fn push_sections<T: Borrow<PromptTemplate>>(out: &mut String, templates: &[T]) {
    for template in templates {
        let template: &PromptTemplate = template.borrow();
        out.push_str(&template.display_name().to_uppercase());
        out.push_str("\n\n");
        out.push_str(&template.content);
        out.push_str("\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn template(stem: &str, content: &str) -> PromptTemplate {
        PromptTemplate::from_source("test", format!("test/{stem}.md"), content)
    }

    #[test]
    fn test_combine_empty() {
        let none: Vec<PromptTemplate> = vec![];
        assert_eq!(combine(&none), "");
    }

    #[test]
    fn test_combine_single_is_raw_content() {
        let t = template("warm-tones", "Make the colors warmer.");
        assert_eq!(combine(&[&t]), t.content);
        assert!(!combine(&[&t]).contains("WARM TONES"));
    }

    #[test]
    fn test_combine_many() {
        let warm = template("warm-tones", "Make the colors warmer.");
        let sketch = template("pencil_sketch", "Turn it into a sketch.");

        let combined = combine(&[warm, sketch]);
        assert_eq!(
            combined,
            "Please apply the following edits to this image:\n\n\
             WARM TONES\n\nMake the colors warmer.\n\n\
             PENCIL SKETCH\n\nTurn it into a sketch."
        );
    }

    #[test]
    fn test_combine_keeps_input_order() {
        let a = template("alpha", "A.");
        let b = template("beta", "B.");

        let combined = combine(&[&b, &a]);
        let beta = combined.find("BETA").unwrap();
        let alpha = combined.find("ALPHA").unwrap();
        assert!(beta < alpha);
    }

    #[test]
    fn test_custom_text_without_templates() {
        let none: Vec<PromptTemplate> = vec![];
        assert_eq!(compose_with_custom_text("Make it blue", &none), "Make it blue");
        assert_eq!(compose_with_custom_text("  spaced  ", &none), "  spaced  ");
    }

    #[test]
    fn test_custom_text_with_templates() {
        let t = template("film-grain", "Add subtle film grain.");
        let composed = compose_with_custom_text("Remove the car.", &[&t]);
        assert_eq!(
            composed,
            "Remove the car.\n\nAdditionally, please apply these edits:\n\n\
             FILM GRAIN\n\nAdd subtle film grain."
        );
    }

    #[test]
    fn test_compose_prompt_selection() {
        let t = template("warm", "Warmer.");
        let none: Vec<&PromptTemplate> = vec![];

        assert_eq!(compose_prompt("Make it blue", &none), "Make it blue");
        assert_eq!(compose_prompt("", &[&t]), "Warmer.");
        assert_eq!(compose_prompt("", &none), "");
        assert!(compose_prompt("Blue", &[&t]).starts_with("Blue\n\nAdditionally"));
    }

    #[test]
    fn test_compose_prompt_whitespace_text_is_kept() {
        let t = template("warm", "Warmer.");
        let none: Vec<&PromptTemplate> = vec![];

        assert_eq!(
            compose_prompt("   ", &[&t]),
            "Additionally, please apply these edits:\n\nWARM\n\nWarmer."
        );
        assert_eq!(compose_prompt("   ", &none), "   ");
        assert_eq!(compose_prompt("\n", &none), "\n");
    }

    proptest! {
        #[test]
        fn prop_combine_has_no_trailing_whitespace(
            bodies in prop::collection::vec("[a-zA-Z .]{0,40}", 2..6)
        ) {
            let templates: Vec<PromptTemplate> = bodies
                .iter()
                .enumerate()
                .map(|(i, b)| template(&format!("t{i}"), b))
                .collect();

            let combined = combine(&templates);
            prop_assert!(combined.starts_with(COMBINED_PREAMBLE));
            prop_assert_eq!(combined.trim_end(), combined.as_str());
            for i in 0..templates.len() {
                let header = format!("T{}", i);
                prop_assert!(combined.contains(&header));
            }
        }
    }
}
