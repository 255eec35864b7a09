//! Mustache-style prompt rendering.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern compiles"));

/// Substitute `{{name}}` placeholders from the given bindings. A placeholder
/// with no binding is left intact: the unresolved marker in the output is the
/// signal of a missing binding.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            match vars.iter().find(|(name, _)| *name == key) {
                Some((_, value)) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_bound_placeholders() {
        let out = render_template(
            "{{subject}} {{unit}} 단원의 실험",
            &[("subject", "물리"), ("unit", "운동")],
        );
        assert_eq!(out, "물리 운동 단원의 실험");
    }

    #[test]
    fn unbound_placeholders_stay_intact() {
        let out = render_template("주제: {{topic}} / 의도: {{intent}}", &[("topic", "힘")]);
        assert_eq!(out, "주제: 힘 / 의도: {{intent}}");
    }

    #[test]
    fn repeated_placeholders_all_substitute() {
        let out = render_template("{{a}}-{{a}}", &[("a", "x")]);
        assert_eq!(out, "x-x");
    }
}
