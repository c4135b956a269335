//! `{{NAME}}` placeholder substitution for SQL scripts.
//!
//! This is a trusted-input templating primitive, not a SQL-safety boundary.
//! Values are inserted verbatim, without quoting or escaping; callers validate
//! identifiers before rendering. Tokens with no mapping stay in the text and
//! surface later as warehouse errors when the statement runs.

/// Replace every `{{NAME}}` occurrence of each mapped placeholder.
pub fn render_template<'a, I>(template: &str, placeholders: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    placeholders
        .into_iter()
        .fold(template.to_string(), |rendered, (name, value)| {
            rendered.replace(&placeholder_token(name), value)
        })
}

/// The literal token for a placeholder name.
pub fn placeholder_token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        let rendered = render_template(
            "CREATE SCHEMA {{GOLD_SCHEMA}}; SELECT * FROM {{GOLD_SCHEMA}}.t",
            [("GOLD_SCHEMA", "G1")],
        );
        assert_eq!(rendered, "CREATE SCHEMA G1; SELECT * FROM G1.t");
    }

    #[test]
    fn leaves_unmapped_tokens_verbatim() {
        let rendered = render_template(
            "SELECT * FROM {{GOLD_SCHEMA}}.a JOIN {{OTHER}}.b",
            [("GOLD_SCHEMA", "G1")],
        );
        assert_eq!(rendered, "SELECT * FROM G1.a JOIN {{OTHER}}.b");
    }

    #[test]
    fn renders_several_placeholders() {
        let rendered = render_template(
            "{{GOLD_SCHEMA}}|{{SILVER_SCHEMA}}|{{MASTER_SCHEMA}}",
            [
                ("GOLD_SCHEMA", "gold"),
                ("SILVER_SCHEMA", "silver"),
                ("MASTER_SCHEMA", "master"),
            ],
        );
        assert_eq!(rendered, "gold|silver|master");
    }

    #[test]
    fn token_uses_double_braces() {
        assert_eq!(placeholder_token("SCHEMA_NAME"), "{{SCHEMA_NAME}}");
    }
}
