//! Ordered, named groups of fields.

use crate::config::FormConfig;
use crate::controller::field::FieldController;
use crate::controller::view::ViewId;
use crate::model::FormModel;
use std::cell::Cell;
use std::rc::Rc;

/// An ordered group of fields. Insertion order is display order.
#[derive(Debug)]
pub struct SectionController {
    name: String,
    title: Option<String>,
    elements: Vec<Rc<FieldController>>,
    view_id: Cell<Option<ViewId>>,
}

impl SectionController {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            elements: Vec::new(),
            view_id: Cell::new(None),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_element(mut self, field: FieldController) -> Self {
        self.add_element(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Append a field and return the shared handle to it.
    pub fn add_element(&mut self, field: FieldController) -> Rc<FieldController> {
        let field = Rc::new(field);
        self.elements.push(Rc::clone(&field));
        field
    }

    /// First field named `name`, in insertion order.
    pub fn get_element(&self, name: &str) -> Option<&Rc<FieldController>> {
        self.elements.iter().find(|field| field.name() == name)
    }

    /// The live element list, not a copy.
    pub fn elements(&self) -> &[Rc<FieldController>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn refresh(&self) {
        for field in &self.elements {
            field.refresh();
        }
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.view_id.get()
    }

    pub(crate) fn set_view_id(&self, id: ViewId) {
        self.view_id.set(Some(id));
    }

    pub(crate) fn bind(&self, model: &FormModel, config: FormConfig) {
        for field in &self.elements {
            field.bind(model, config);
        }
    }
}

/// First field named `name` across `sections`, scanning sections then fields
/// in declared order.
pub fn find_element<'a>(
    sections: &'a [SectionController],
    name: &str,
) -> Option<&'a Rc<FieldController>> {
    sections
        .iter()
        .find_map(|section| section.get_element(name))
}
