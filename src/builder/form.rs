//! Builders for sections and whole forms.

use crate::builder::error::BuildError;
use crate::builder::field::FieldBuilder;
use crate::config::FormConfig;
use crate::controller::{FormController, SectionController, ViewIdAllocator};
use crate::model::FormModel;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for a [`SectionController`]
pub struct SectionBuilder {
    name: String,
    title: Option<String>,
    fields: Vec<FieldBuilder>,
}

impl SectionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            fields: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a field; fields are displayed in the order added
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<SectionController, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptySectionName);
        }

        let mut section = SectionController::new(self.name);
        if let Some(title) = self.title {
            section = section.with_title(title);
        }
        for field in self.fields {
            section.add_element(field.build()?);
        }
        Ok(section)
    }
}

/// Builder for a complete [`FormController`].
///
/// Unlike [`FormController::add_section`], building checks that section
/// names are unique and that no field name appears twice on the form.
#[derive(Default)]
pub struct FormBuilder {
    sections: Vec<SectionBuilder>,
    config: FormConfig,
    view_ids: Option<Arc<ViewIdAllocator>>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Allocate view ids from `view_ids` instead of the process-wide allocator
    pub fn view_ids(mut self, view_ids: Arc<ViewIdAllocator>) -> Self {
        self.view_ids = Some(view_ids);
        self
    }

    /// Build the form over `model`.
    pub fn build(self, model: FormModel) -> Result<FormController, BuildError> {
        if self.sections.is_empty() {
            return Err(BuildError::EmptyForm);
        }

        self.check_unique_names()?;

        let mut form = FormController::new(model).with_config(self.config);
        if let Some(view_ids) = self.view_ids {
            form = form.with_view_ids(view_ids);
        }
        for section in self.sections {
            form.add_section(section.build()?);
        }
        tracing::debug!(
            sections = form.sections().len(),
            elements = form.number_of_elements(),
            "form built"
        );
        Ok(form)
    }

    fn check_unique_names(&self) -> Result<(), BuildError> {
        let mut section_names = HashSet::new();
        let mut field_names = HashSet::new();
        for section in &self.sections {
            if !section_names.insert(section.name.as_str()) {
                return Err(BuildError::DuplicateSection {
                    name: section.name.clone(),
                });
            }
            for field in &section.fields {
                if !field_names.insert(field.name()) {
                    return Err(BuildError::DuplicateField {
                        name: field.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, MapBackend};
    use crate::validation::RequiredPolicy;

    fn model() -> FormModel {
        FormModel::new(
            MapBackend::new()
                .with_field("first", FieldType::Text)
                .with_field("last", FieldType::Text)
                .with_field("age", FieldType::Integer),
        )
    }

    #[test]
    fn builds_sections_and_fields_in_order() {
        let form = FormBuilder::new()
            .section(
                SectionBuilder::new("name")
                    .title("Your name")
                    .field(FieldBuilder::new("first", "First name").required())
                    .field(FieldBuilder::new("last", "Last name")),
            )
            .section(SectionBuilder::new("details").field(FieldBuilder::new("age", "Age")))
            .build(model())
            .unwrap();

        let names: Vec<String> = form.sections().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["name", "details"]);
        assert_eq!(form.number_of_elements(), 3);
        assert_eq!(
            form.get_section("name").unwrap().title(),
            Some("Your name")
        );
        assert_eq!(form.model().listener_count(), 1);
    }

    #[test]
    fn built_fields_are_bound_to_the_model() {
        let form = FormBuilder::new()
            .section(SectionBuilder::new("s").field(FieldBuilder::new("first", "First")))
            .build(model())
            .unwrap();

        form.model().set_value("first", Some("Grace".into()));

        let first = form.get_element("first").unwrap();
        assert_eq!(first.value(), Some("Grace".into()));
        assert_eq!(first.displayed_value(), Some("Grace".into()));
    }

    #[test]
    fn rejects_duplicate_sections() {
        let result = FormBuilder::new()
            .section(SectionBuilder::new("a"))
            .section(SectionBuilder::new("a"))
            .build(model());

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateSection {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn rejects_duplicate_fields_across_sections() {
        let result = FormBuilder::new()
            .section(SectionBuilder::new("a").field(FieldBuilder::new("first", "First")))
            .section(SectionBuilder::new("b").field(FieldBuilder::new("first", "Again")))
            .build(model());

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateField {
                name: "first".to_string()
            })
        );
    }

    #[test]
    fn rejects_empty_form_and_empty_section_name() {
        assert_eq!(FormBuilder::new().build(model()).err(), Some(BuildError::EmptyForm));
        assert_eq!(
            FormBuilder::new()
                .section(SectionBuilder::new(""))
                .build(model())
                .err(),
            Some(BuildError::EmptySectionName)
        );
    }

    #[test]
    fn config_is_applied() {
        let config = FormConfig {
            required_policy: RequiredPolicy::RunAllRules,
            treat_blank_as_empty: true,
        };
        let form = FormBuilder::new()
            .config(config)
            .section(SectionBuilder::new("a"))
            .build(model())
            .unwrap();

        assert_eq!(form.config(), config);
    }
}
