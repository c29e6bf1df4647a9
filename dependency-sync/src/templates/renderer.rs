//! Template renderer.

use crate::changes::{describe_changes, DependencyChange};
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    // Register the eq helper for conditionals
    hbs.register_helper("eq", Box::new(eq_helper));

    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq ecosystem "npm")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Everything pull request, commit and issue templates can refer to.
#[derive(Debug, Clone)]
pub struct ChangeSummary<'a> {
    /// Repository name.
    pub repository: &'a str,

    /// Logical title prefix.
    pub prefix: &'a str,

    /// Full pull request title.
    pub title: &'a str,

    /// Changes being published.
    pub changes: &'a [DependencyChange],

    /// Changes deferred to the pending updates issue.
    pub deferred: &'a [DependencyChange],
}

impl ChangeSummary<'_> {
    fn to_value(&self) -> Value {
        json!({
            "repository": self.repository,
            "prefix": self.prefix,
            "title": self.title,
            "summary": describe_changes(self.changes),
            "changes": self.changes,
            "deferred": self.deferred,
        })
    }
}

/// Template renderer for pull request, commit and issue text.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders `template` against a change summary.
    ///
    /// Used for pull request bodies, comments and commit messages.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(
        &self,
        template: &str,
        summary: &ChangeSummary<'_>,
    ) -> Result<String, super::TemplateError> {
        self.render_template(template, &summary.to_value())
    }

    /// Renders the pending updates issue body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_issue_body(
        &self,
        template: &str,
        repository: &str,
    ) -> Result<String, super::TemplateError> {
        self.render_template(template, &json!({ "repository": repository }))
    }

    /// Renders a template with the given data.
    fn render_template(
        &self,
        template: &str,
        data: &Value,
    ) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
