//! Per-field validation and display state.

use crate::config::FormConfig;
use crate::controller::view::ViewId;
use crate::model::{FieldType, FieldValue, FormModel};
use crate::validation::{
    into_errors, ErrorKind, FieldInfo, InputValidator, RequiredPolicy, RuleCheck, ValidationError,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use stillwater::validation::Validation;

/// Native type of a field, which decides how stored values are coerced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
    Number,
    Bool,
    Date,
    Time,
    /// One value out of a fixed list.
    Selection { options: Vec<String> },
    /// Any subset of a fixed list.
    MultiSelection { options: Vec<String> },
    /// Path of a resource loaded by an external collaborator (e.g. an image).
    Attachment,
    /// Shows the model value without accepting input; never validated.
    Display,
}

impl FieldKind {
    pub fn native_type(&self) -> FieldType {
        match self {
            Self::Text | Self::Selection { .. } | Self::Attachment | Self::Display => {
                FieldType::Text
            }
            Self::Integer => FieldType::Integer,
            Self::Number => FieldType::Number,
            Self::Bool => FieldType::Bool,
            Self::Date => FieldType::Date,
            Self::Time => FieldType::Time,
            Self::MultiSelection { .. } => FieldType::List,
        }
    }

    fn check_options(&self, value: &FieldValue) -> Result<(), ErrorKind> {
        let (options, chosen): (&[String], Vec<&str>) = match (self, value) {
            (Self::Selection { options }, FieldValue::Text(text)) => {
                (options.as_slice(), vec![text.as_str()])
            }
            (Self::MultiSelection { options }, FieldValue::List(items)) => {
                (options.as_slice(), items.iter().map(String::as_str).collect())
            }
            _ => return Ok(()),
        };
        match chosen.into_iter().find(|c| !options.iter().any(|o| o == c)) {
            Some(unknown) => Err(ErrorKind::InvalidOption {
                value: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Capability of elements whose input can be validated.
///
/// The form aggregates errors only from elements that expose it.
pub trait Validatable {
    fn validate_input(&self) -> Vec<ValidationError>;
}

/// What the view layer currently shows for a field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayState {
    /// Model value as of the last refresh.
    pub value: Option<FieldValue>,
    /// Visible error message, if any.
    pub error: Option<String>,
    /// Raw input that could not be parsed into the field's type.
    pub pending_input: Option<String>,
}

/// Owns one named field: its rules, its coercion and its display state.
///
/// A field reads and writes its value through the [`FormModel`] it is bound
/// to; the owning form binds it when the field's section is added.
pub struct FieldController {
    name: String,
    label: String,
    required: bool,
    kind: FieldKind,
    rules: Vec<Box<dyn InputValidator>>,
    model: RefCell<Option<FormModel>>,
    config: Cell<FormConfig>,
    state: RefCell<DisplayState>,
    view_id: Cell<Option<ViewId>>,
}

impl FieldController {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            kind: FieldKind::default(),
            rules: Vec::new(),
            model: RefCell::new(None),
            config: Cell::new(FormConfig::default()),
            state: RefCell::new(DisplayState::default()),
            view_id: Cell::new(None),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Append a rule; rules run in the order they were added.
    pub fn with_rule(mut self, rule: impl InputValidator + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub(crate) fn push_rule(&mut self, rule: Box<dyn InputValidator>) {
        self.rules.push(rule);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn bind_model(&self, model: &FormModel) {
        *self.model.borrow_mut() = Some(model.clone());
    }

    pub(crate) fn bind(&self, model: &FormModel, config: FormConfig) {
        self.bind_model(model);
        self.config.set(config);
    }

    pub fn model(&self) -> Option<FormModel> {
        self.model.borrow().clone()
    }

    /// Current model value for this field's name.
    pub fn value(&self) -> Option<FieldValue> {
        self.model
            .borrow()
            .as_ref()
            .and_then(|model| model.get_value(&self.name))
    }

    /// Write a typed value to the model. Discards any unparsed input.
    pub fn set_value(&self, value: Option<FieldValue>) {
        self.state.borrow_mut().pending_input = None;
        let model = self.model();
        match model {
            Some(model) => model.set_value(&self.name, value),
            None => tracing::warn!(field = %self.name, "field is not bound to a model"),
        }
    }

    /// Accept raw user input.
    ///
    /// The input is parsed into the backing field's type (falling back to
    /// the field kind's native type). Input that does not parse is kept as
    /// pending and reported by the next validation pass.
    pub fn set_input(&self, raw: &str) {
        let target = self
            .model()
            .and_then(|model| model.backing_type(&self.name))
            .unwrap_or_else(|| self.kind.native_type());
        match parse_input(raw, target) {
            Ok(value) => self.set_value(value),
            Err(error) => {
                tracing::debug!(field = %self.name, error = %error, "input does not parse");
                self.state.borrow_mut().pending_input = Some(raw.to_string());
            }
        }
    }

    /// The stored value converted to the field's native type.
    pub fn coerced_value(&self) -> Result<Option<FieldValue>, ErrorKind> {
        match self.value() {
            None => Ok(None),
            Some(value) => {
                let value = coerce(value, self.kind.native_type())?;
                self.kind.check_options(&value)?;
                Ok(Some(value))
            }
        }
    }

    /// Evaluate every rule, accumulating all failures.
    ///
    /// An empty required field yields the required error first; under
    /// [`RequiredPolicy::ShortCircuit`] nothing else is reported for it.
    pub fn validate(&self) -> RuleCheck {
        let info = FieldInfo {
            name: &self.name,
            label: &self.label,
        };
        let config = self.config.get();
        let input = self.current_input();
        let mut checks = Vec::new();

        let empty = self.is_empty_input(input.as_ref(), config);
        if self.required && empty {
            checks.push(info.fail(ErrorKind::Required));
            if config.required_policy == RequiredPolicy::ShortCircuit {
                return accumulate(checks);
            }
        }

        let value = match input.filter(|_| !empty) {
            None => None,
            Some(value) => {
                let coerced = coerce(value, self.kind.native_type())
                    .and_then(|value| self.kind.check_options(&value).map(|_| value));
                match coerced {
                    Ok(value) => Some(value),
                    Err(kind) => {
                        checks.push(info.fail(kind));
                        return accumulate(checks);
                    }
                }
            }
        };

        for rule in &self.rules {
            checks.push(rule.validate(value.as_ref(), &info));
        }
        accumulate(checks)
    }

    /// Re-read the model value into the display state.
    ///
    /// Unparsed input is discarded once the model value differs from the
    /// one last shown, since the model then holds newer data than the input.
    pub fn refresh(&self) {
        let value = self.value();
        let mut state = self.state.borrow_mut();
        if state.value != value {
            state.pending_input = None;
        }
        state.value = value;
    }

    /// The model wrote this field: drop unparsed input and re-read.
    pub(crate) fn model_changed(&self) {
        self.state.borrow_mut().pending_input = None;
        self.refresh();
    }

    pub fn displayed_value(&self) -> Option<FieldValue> {
        self.state.borrow().value.clone()
    }

    /// Text the view should show: pending input wins over the model value.
    pub fn display_text(&self) -> String {
        let state = self.state.borrow();
        match (&state.pending_input, &state.value) {
            (Some(raw), _) => raw.clone(),
            (None, Some(value)) => value.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn display_state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Set or clear (`None`) the visible error.
    pub fn set_error(&self, message: Option<String>) {
        self.state.borrow_mut().error = message;
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.view_id.get()
    }

    pub(crate) fn set_view_id(&self, id: ViewId) {
        self.view_id.set(Some(id));
    }

    /// `None` for display-only fields.
    pub fn as_validatable(&self) -> Option<&dyn Validatable> {
        match self.kind {
            FieldKind::Display => None,
            _ => Some(self),
        }
    }

    pub fn is_validatable(&self) -> bool {
        self.as_validatable().is_some()
    }

    fn current_input(&self) -> Option<FieldValue> {
        let pending = self.state.borrow().pending_input.clone();
        pending.map(FieldValue::Text).or_else(|| self.value())
    }

    fn is_empty_input(&self, value: Option<&FieldValue>, config: FormConfig) -> bool {
        match value {
            None => true,
            Some(FieldValue::Text(text)) if config.treat_blank_as_empty => text.trim().is_empty(),
            Some(value) => value.is_empty(),
        }
    }
}

impl Validatable for FieldController {
    fn validate_input(&self) -> Vec<ValidationError> {
        into_errors(self.validate())
    }
}

impl fmt::Debug for FieldController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldController")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("rules", &self.rules.len())
            .field("state", &self.state.borrow())
            .finish()
    }
}

fn accumulate(checks: Vec<RuleCheck>) -> RuleCheck {
    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

/// Convert a stored value to `target`.
pub fn coerce(value: FieldValue, target: FieldType) -> Result<FieldValue, ErrorKind> {
    let invalid = ErrorKind::InvalidFormat { expected: target };
    if value.field_type() == target {
        return Ok(value);
    }
    match (value, target) {
        (FieldValue::Text(text), _) => parse_input(&text, target)?.ok_or(invalid),
        (FieldValue::Integer(n), FieldType::Number) => Ok(FieldValue::Number(n as f64)),
        // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound
        (FieldValue::Number(n), FieldType::Integer)
            if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
        {
            Ok(FieldValue::Integer(n as i64))
        }
        (value, FieldType::Text) if value.field_type() != FieldType::List => {
            Ok(FieldValue::Text(value.to_string()))
        }
        _ => Err(invalid),
    }
}

/// Parse raw input into `target`. Empty input means "no value".
pub fn parse_input(raw: &str, target: FieldType) -> Result<Option<FieldValue>, ErrorKind> {
    let invalid = || ErrorKind::InvalidFormat { expected: target };
    let trimmed = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = match target {
        FieldType::Text => FieldValue::Text(raw.to_string()),
        FieldType::Integer => FieldValue::Integer(trimmed.parse().map_err(|_| invalid())?),
        FieldType::Number => match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => return Err(invalid()),
        },
        FieldType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => FieldValue::Bool(true),
            "false" | "no" | "0" => FieldValue::Bool(false),
            _ => return Err(invalid()),
        },
        FieldType::Date => FieldValue::Date(
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?,
        ),
        FieldType::Time => FieldValue::Time(
            NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                .map_err(|_| invalid())?,
        ),
        FieldType::List => FieldValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MapBackend;
    use crate::validation::{MaxLength, MinLength, Predicate};
    use std::rc::Rc;

    fn bound(field: FieldController, backend: MapBackend) -> (FieldController, FormModel) {
        let model = FormModel::new(backend);
        field.bind_model(&model);
        (field, model)
    }

    fn kinds(field: &FieldController) -> Vec<ErrorKind> {
        field
            .validate_input()
            .into_iter()
            .map(|e| e.kind().clone())
            .collect()
    }

    #[test]
    fn required_short_circuits_other_rules() {
        let field = FieldController::new("name", "Name")
            .with_required(true)
            .with_rule(Predicate::new("always_fails", |_| false))
            .with_rule(Predicate::new("also_fails", |_| false));
        let (field, _model) = bound(field, MapBackend::new().with_field("name", FieldType::Text));

        assert_eq!(kinds(&field), vec![ErrorKind::Required]);
    }

    #[test]
    fn run_all_rules_policy_reports_everything() {
        let field = FieldController::new("name", "Name")
            .with_required(true)
            .with_rule(Predicate::new("always_fails", |_| false));
        let (field, model) = bound(field, MapBackend::new().with_field("name", FieldType::Text));
        field.bind(
            &model,
            FormConfig {
                required_policy: RequiredPolicy::RunAllRules,
                ..FormConfig::default()
            },
        );

        assert_eq!(
            kinds(&field),
            vec![
                ErrorKind::Required,
                ErrorKind::Custom {
                    key: "always_fails".to_string(),
                    args: vec![],
                }
            ]
        );
    }

    #[test]
    fn all_rule_failures_are_reported_in_order() {
        let field = FieldController::new("code", "Code")
            .with_rule(MinLength(5))
            .with_rule(Predicate::new("no_digits", |v| {
                !v.and_then(FieldValue::as_text)
                    .is_some_and(|t| t.chars().any(|c| c.is_ascii_digit()))
            }))
            .with_rule(MaxLength(10));
        let (field, _model) = bound(field, MapBackend::new().with_value("code", "a1"));

        assert_eq!(
            kinds(&field),
            vec![
                ErrorKind::TooShort { min: 5 },
                ErrorKind::Custom {
                    key: "no_digits".to_string(),
                    args: vec![],
                }
            ]
        );
    }

    #[test]
    fn empty_text_counts_as_missing() {
        let field = FieldController::new("name", "Name").with_required(true);
        let (field, _model) = bound(field, MapBackend::new().with_value("name", ""));
        assert_eq!(kinds(&field), vec![ErrorKind::Required]);
    }

    #[test]
    fn blank_text_is_empty_only_when_configured() {
        let field = FieldController::new("name", "Name").with_required(true);
        let (field, model) = bound(field, MapBackend::new().with_value("name", "   "));
        assert!(field.validate_input().is_empty());

        field.bind(
            &model,
            FormConfig {
                treat_blank_as_empty: true,
                ..FormConfig::default()
            },
        );
        assert_eq!(kinds(&field), vec![ErrorKind::Required]);
    }

    #[test]
    fn unparsable_input_becomes_a_validation_error() {
        let field = FieldController::new("age", "Age").with_kind(FieldKind::Integer);
        let (field, model) = bound(field, MapBackend::new().with_field("age", FieldType::Integer));

        field.set_input("forty");

        assert_eq!(model.get_value("age"), None);
        assert_eq!(field.display_text(), "forty");
        assert_eq!(
            kinds(&field),
            vec![ErrorKind::InvalidFormat {
                expected: FieldType::Integer
            }]
        );

        field.set_input("40");
        assert_eq!(model.get_value("age"), Some(FieldValue::Integer(40)));
        assert!(field.validate_input().is_empty());
    }

    #[test]
    fn stored_text_is_coerced_to_native_type() {
        let field = FieldController::new("born", "Born").with_kind(FieldKind::Date);
        let (field, _model) = bound(field, MapBackend::new().with_value("born", "1815-12-10"));

        assert_eq!(
            field.coerced_value(),
            Ok(Some(FieldValue::Date(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap())))
        );
        assert!(field.validate_input().is_empty());
    }

    #[test]
    fn selection_rejects_unknown_options() {
        let field = FieldController::new("color", "Color").with_kind(FieldKind::Selection {
            options: vec!["red".into(), "green".into()],
        });
        let (field, model) = bound(field, MapBackend::new().with_value("color", "blue"));

        assert_eq!(
            kinds(&field),
            vec![ErrorKind::InvalidOption {
                value: "blue".to_string()
            }]
        );
        model.set_value("color", Some("red".into()));
        assert!(field.validate_input().is_empty());
    }

    #[test]
    fn refresh_is_idempotent_and_leaves_model_alone() {
        let field = FieldController::new("name", "Name");
        let (field, model) = bound(field, MapBackend::new().with_value("name", "Ada"));
        let writes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&writes);
        let _subscription = model.subscribe(move |_| counter.set(counter.get() + 1));

        field.refresh();
        let first = field.display_state();
        field.refresh();

        assert_eq!(field.display_state(), first);
        assert_eq!(field.displayed_value(), Some(FieldValue::from("Ada")));
        assert_eq!(writes.get(), 0);
    }

    #[test]
    fn model_write_replaces_unparsed_input() {
        let field = FieldController::new("age", "Age").with_kind(FieldKind::Integer);
        let (field, model) = bound(field, MapBackend::new().with_field("age", FieldType::Integer));

        field.set_input("forty");
        model.set_value("age", Some(FieldValue::Integer(40)));
        field.refresh();

        assert_eq!(field.display_text(), "40");
        assert_eq!(field.display_state().pending_input, None);
        assert!(field.validate_input().is_empty());
    }

    #[test]
    fn refresh_keeps_unparsed_input_while_model_is_unchanged() {
        let field = FieldController::new("age", "Age").with_kind(FieldKind::Integer);
        let (field, _model) = bound(field, MapBackend::new().with_field("age", FieldType::Integer));

        field.set_input("forty");
        field.refresh();

        assert_eq!(field.display_text(), "forty");
        assert_eq!(
            kinds(&field),
            vec![ErrorKind::InvalidFormat {
                expected: FieldType::Integer
            }]
        );
    }

    #[test]
    fn non_finite_numbers_are_not_accepted() {
        for raw in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                parse_input(raw, FieldType::Number),
                Err(ErrorKind::InvalidFormat {
                    expected: FieldType::Number
                })
            );
        }

        let field = FieldController::new("score", "Score")
            .with_required(true)
            .with_kind(FieldKind::Number)
            .with_rule(crate::validation::Range::new(0.0, 10.0));
        let (field, model) = bound(field, MapBackend::new().with_field("score", FieldType::Number));
        field.set_input("NaN");

        assert_eq!(model.get_value("score"), None);
        assert_eq!(
            kinds(&field),
            vec![ErrorKind::InvalidFormat {
                expected: FieldType::Number
            }]
        );
    }

    #[test]
    fn whole_numbers_outside_i64_do_not_coerce() {
        let invalid = Err(ErrorKind::InvalidFormat {
            expected: FieldType::Integer,
        });
        assert_eq!(coerce(FieldValue::Number(1e20), FieldType::Integer), invalid);
        assert_eq!(coerce(FieldValue::Number(-1e20), FieldType::Integer), invalid);
        assert_eq!(
            coerce(FieldValue::Number(9_007_199_254_740_992.0), FieldType::Integer),
            Ok(FieldValue::Integer(9_007_199_254_740_992))
        );
        assert_eq!(
            coerce(FieldValue::Number(f64::NAN), FieldType::Integer),
            invalid
        );
    }

    #[test]
    fn set_error_none_clears() {
        let field = FieldController::new("name", "Name");
        field.set_error(Some("Name is required".to_string()));
        assert_eq!(field.error().as_deref(), Some("Name is required"));
        field.set_error(None);
        assert_eq!(field.error(), None);
    }

    #[test]
    fn unbound_field_reads_nothing() {
        let field = FieldController::new("name", "Name").with_required(true);
        assert_eq!(field.value(), None);
        field.set_value(Some("x".into()));
        assert_eq!(kinds(&field), vec![ErrorKind::Required]);
    }

    #[test]
    fn display_fields_are_not_validatable() {
        let field = FieldController::new("total", "Total").with_kind(FieldKind::Display);
        assert!(field.as_validatable().is_none());
        assert!(FieldController::new("name", "Name").as_validatable().is_some());
    }

    #[test]
    fn coercion_between_numbers() {
        assert_eq!(
            coerce(FieldValue::Integer(2), FieldType::Number),
            Ok(FieldValue::Number(2.0))
        );
        assert_eq!(
            coerce(FieldValue::Number(2.5), FieldType::Integer),
            Err(ErrorKind::InvalidFormat {
                expected: FieldType::Integer
            })
        );
        assert_eq!(
            coerce(FieldValue::Bool(true), FieldType::Text),
            Ok(FieldValue::from("true"))
        );
    }

    #[test]
    fn parse_input_handles_each_type() {
        assert_eq!(parse_input("", FieldType::Integer), Ok(None));
        assert_eq!(parse_input(" 7 ", FieldType::Integer), Ok(Some(FieldValue::Integer(7))));
        assert_eq!(parse_input("yes", FieldType::Bool), Ok(Some(FieldValue::Bool(true))));
        assert_eq!(
            parse_input("09:30", FieldType::Time),
            Ok(Some(FieldValue::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())))
        );
        assert_eq!(
            parse_input("a, b,,c", FieldType::List),
            Ok(Some(FieldValue::List(vec!["a".into(), "b".into(), "c".into()])))
        );
    }
}
