//! Registration Form
//!
//! This example binds a form to a plain serde struct and walks through an
//! editing session.
//!
//! Key concepts:
//! - Sections and fields declared with the builders
//! - Raw user input parsed into the struct's field types
//! - Every failing rule reported, in display order
//! - A text view factory standing in for a UI toolkit
//!
//! Run with: cargo run --example registration_form

use formwire::builder::{BuildError, FieldBuilder, FormBuilder, SectionBuilder};
use formwire::controller::{FieldController, FieldKind, SectionController, ViewFactory, ViewId};
use formwire::model::{FieldType, FormModel, SerdeBackend};
use formwire::validation::ErrorSummaryDisplay;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Registration {
    username: String,
    email: String,
    age: Option<i64>,
    plan: String,
    newsletter: bool,
}

// Renders each controller as one line of text
struct TextViews;

impl ViewFactory for TextViews {
    type Handle = String;

    fn create_section_view(&mut self, section: &SectionController, id: ViewId) -> String {
        format!("[{id}] == {} ==", section.title().unwrap_or(section.name()))
    }

    fn create_field_view(&mut self, field: &FieldController, id: ViewId) -> String {
        let marker = if field.is_required() { "*" } else { " " };
        let error = field.error().map(|e| format!("  <- {e}")).unwrap_or_default();
        format!("[{id}] {marker}{:<12} {}{error}", field.label(), field.display_text())
    }
}

fn main() -> Result<(), BuildError> {
    println!("=== Registration Form ===\n");

    let model = FormModel::new(
        SerdeBackend::new(Registration {
            plan: "free".to_string(),
            ..Registration::default()
        })
        .with_type_hint("age", FieldType::Integer),
    );

    let mut form = FormBuilder::new()
        .section(
            SectionBuilder::new("account")
                .title("Account")
                .field(
                    FieldBuilder::new("username", "Username")
                        .required()
                        .min_length(3)
                        .max_length(16)
                        .pattern("[a-z0-9_]+"),
                )
                .field(FieldBuilder::new("email", "E-mail").required().email()),
        )
        .section(
            SectionBuilder::new("profile")
                .title("Profile")
                .field(FieldBuilder::new("age", "Age").kind(FieldKind::Integer).range(13.0, 120.0))
                .field(FieldBuilder::new("plan", "Plan").kind(FieldKind::Selection {
                    options: vec!["free".into(), "pro".into()],
                }))
                .field(FieldBuilder::new("newsletter", "Newsletter").kind(FieldKind::Bool)),
        )
        .build(model.clone())?;

    let mut views = TextViews;

    println!("1. Empty form:");
    form.show_validation_errors();
    for line in form.recreate_views(&mut views) {
        println!("   {line}");
    }

    println!("\n2. User types some input:");
    let inputs = [
        ("username", "Ada!"),
        ("email", "ada@example"),
        ("age", "nine"),
        ("plan", "enterprise"),
    ];
    for (name, raw) in inputs {
        if let Some(field) = form.get_element(name) {
            field.set_input(raw);
        }
    }
    form.reset_validation_errors();
    form.show_validation_errors();
    for line in form.recreate_views(&mut views) {
        println!("   {line}");
    }

    println!("\n3. All problems, as a summary banner:");
    let summary = ErrorSummaryDisplay::default();
    form.set_validation_errors_display_method(summary.clone());
    form.show_validation_errors();
    for message in summary.messages() {
        println!("   - {message}");
    }

    println!("\n4. User fixes the input:");
    let fixes = [
        ("username", "ada_l"),
        ("email", "ada@example.com"),
        ("age", "36"),
        ("plan", "pro"),
        ("newsletter", "yes"),
    ];
    for (name, raw) in fixes {
        if let Some(field) = form.get_element(name) {
            field.set_input(raw);
        }
    }
    println!("   valid: {}", form.is_valid_input());

    if let Some(registration) = model.backing::<Registration>() {
        println!("   stored: {registration:?}");
    }

    Ok(())
}
